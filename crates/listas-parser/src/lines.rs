//! Line Parser: turns a filtered message into [`ProductRecord`]s.
//!
//! The walk is a single pass with one piece of state, the current category.
//! A line is tried as a category header first and as a product second, so
//! a product name never becomes a category. Anything else is prose and is
//! dropped without touching the current category.

use std::str::FromStr;
use std::sync::LazyLock;

use listas_core::{ProductRecord, DEFAULT_CATEGORY};
use regex::Regex;
use rust_decimal::Decimal;

use crate::category::normalize_category;
use crate::error::ParserError;
use crate::lexicon::{
    CATEGORY_BULLET, CATEGORY_CONTAINS_EXCLUSIONS, CATEGORY_EXACT_EXCLUSIONS,
    CATEGORY_PREFIX_EXCLUSIONS, COMMENT_PREFIXES, MAX_CATEGORY_CHARS,
};
use crate::text::{fold_upper, has_digit, has_greeting, is_all_upper};

/// `<name> - $<amount>`, anchored on the last hyphen before the currency
/// sign. The greedy name group keeps internal hyphens in the name.
static PRODUCT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+)-\s*(?:[Uu]\$[Ss]|\$)\s*(?P<token>\S*)")
        .expect("valid product line regex")
});

/// A product-shaped line that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number within the message.
    pub line_no: usize,
    pub line: String,
    pub error: ParserError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub records: Vec<ProductRecord>,
    pub skipped: Vec<SkippedLine>,
    /// Canonical categories in the order their headers appeared.
    pub categories: Vec<String>,
}

enum LineKind {
    Category(String),
    Product(Result<ProductRecord, ParserError>),
    Noise,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineParser {
    /// Provider greeting phrases; header lines are never read as categories.
    pub extra_greetings: Vec<String>,
}

impl LineParser {
    #[must_use]
    pub fn new(extra_greetings: Vec<String>) -> Self {
        Self { extra_greetings }
    }

    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<ProductRecord> {
        self.parse_report(text).records
    }

    /// Parses `text`, keeping track of skipped product lines and the
    /// category headers seen.
    #[must_use]
    pub fn parse_report(&self, text: &str) -> ParseReport {
        let mut report = ParseReport::default();
        let mut current_category = DEFAULT_CATEGORY.to_string();

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(COMMENT_PREFIXES) {
                continue;
            }

            match self.classify(line, &current_category) {
                LineKind::Category(category) => {
                    tracing::trace!(line = idx + 1, category = %category, "category header");
                    if !report.categories.contains(&category) {
                        report.categories.push(category.clone());
                    }
                    current_category = category;
                }
                LineKind::Product(Ok(record)) => report.records.push(record),
                LineKind::Product(Err(error)) => {
                    tracing::debug!(line = idx + 1, error = %error, "dropping product line");
                    report.skipped.push(SkippedLine {
                        line_no: idx + 1,
                        line: line.to_string(),
                        error,
                    });
                }
                LineKind::Noise => {}
            }
        }

        report
    }

    fn classify(&self, line: &str, current_category: &str) -> LineKind {
        if self.is_category_line(line) {
            return LineKind::Category(normalize_category(line));
        }

        let Some(caps) = PRODUCT_LINE.captures(line) else {
            return LineKind::Noise;
        };

        let name = caps["name"].trim().trim_start_matches('•').trim();
        if name.is_empty() {
            return LineKind::Noise;
        }

        let token = &caps["token"];
        let Some(cost) = parse_amount(token) else {
            return LineKind::Product(Err(ParserError::MalformedPriceToken {
                line: line.to_string(),
                token: token.to_string(),
            }));
        };

        if cost <= Decimal::ZERO {
            return LineKind::Product(Err(ParserError::NonPositiveCost { cost }));
        }

        LineKind::Product(Ok(ProductRecord {
            raw_name: name.to_string(),
            cost,
            category: current_category.to_string(),
        }))
    }

    fn is_category_line(&self, line: &str) -> bool {
        let shaped = line.starts_with(CATEGORY_BULLET)
            || (is_all_upper(line) && !line.contains('$') && !has_digit(line));
        if !shaped || line.chars().count() >= MAX_CATEGORY_CHARS {
            return false;
        }

        let folded = fold_upper(line);
        !CATEGORY_EXACT_EXCLUSIONS.contains(&folded.as_str())
            && !CATEGORY_CONTAINS_EXCLUSIONS
                .iter()
                .any(|p| folded.contains(p))
            && !CATEGORY_PREFIX_EXCLUSIONS
                .iter()
                .any(|p| folded.starts_with(p))
            && !has_greeting(&folded, &self.extra_greetings)
    }
}

/// Parses the leading number of a price token.
///
/// A single `.` or `,` followed by exactly three digits groups thousands
/// (`"1.850"` is 1850); one or two trailing digits are decimals (`"45,50"`).
/// Trailing punctuation or emoji is tolerated (`"400🔥"`, `"400.-"`). Letters
/// glued to the number make the token malformed.
fn parse_amount(token: &str) -> Option<Decimal> {
    let end = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(token.len());
    let (number, suffix) = token.split_at(end);
    if suffix.chars().any(char::is_alphanumeric) {
        return None;
    }

    let number = number.trim_end_matches(['.', ',']);
    if number.is_empty() || number.matches(['.', ',']).count() > 1 {
        return None;
    }

    let normalized = match number.split_once(['.', ',']) {
        Some((whole, fraction)) if fraction.len() == 3 && !whole.is_empty() => {
            format!("{whole}{fraction}")
        }
        _ => number.replace(',', "."),
    };
    Decimal::from_str(&normalized).ok()
}

/// Parses `text` with no provider-specific phrases.
#[must_use]
pub fn parse(text: &str) -> Vec<ProductRecord> {
    LineParser::default().parse(text)
}

/// Like [`parse`], returning the full [`ParseReport`].
#[must_use]
pub fn parse_report(text: &str) -> ParseReport {
    LineParser::default().parse_report(text)
}

#[cfg(test)]
#[path = "lines_test.rs"]
mod tests;
