//! Extraction side of the pipeline: from raw provider chat messages to
//! priced, categorized product records.

pub mod category;
pub mod completeness;
pub mod error;
pub mod filter;
pub mod lexicon;
pub mod lines;
pub mod pipeline;
pub mod pricing;
pub mod source;
pub(crate) mod text;
pub mod types;

pub use category::{category_icon, normalize_category};
pub use completeness::{is_complete, CompletenessChecker, CompletenessIssue};
pub use error::{ParserError, SourceError};
pub use filter::MessageFilter;
pub use lines::{parse, parse_report, LineParser, ParseReport, SkippedLine};
pub use pipeline::{extract_provider, ExtractionConfig, ProviderExtraction, SkipReason};
pub use pricing::{price, price_record};
pub use source::{DirectorySource, MessageSource};
pub use text::fold_upper;
pub use types::{FilterVerdict, FilteredMessage, MessageHandle, RawMessage, VerdictReason};
