//! Message types exchanged between the message source, the filter and the
//! pipeline.
//!
//! ## Observed shape of provider messages
//!
//! ### Header
//! A genuine daily list opens with a greeting such as
//! `"BUEN DIA TE DEJO LA LISTA DE HOY"`, sometimes with the accent
//! (`"BUEN DÍA"`) and sometimes followed by emoji on the same line.
//!
//! ### Availability lists
//! Providers often post a second long message the same morning that lists
//! models and colors with no prices (`"LISTA DE MODELOS Y COLORES DEL DÍA"`).
//! It carries many brand names and no `$`, which is what the filter keys on.
//!
//! ### Truncation
//! The chat client collapses long messages behind a "Read more" control.
//! A capture taken before expansion ends mid-word or with `...`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Opaque reference a [`crate::MessageSource`] understands for re-fetching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(String);

impl MessageHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Content-derived handle for sources that have no natural identifier.
    #[must_use]
    pub fn fingerprint(text: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(text.as_bytes())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A captured chat message. Immutable once produced by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Provider display name (e.g. `"GcGroup"`).
    pub provider: String,
    pub handle: MessageHandle,
    pub text: String,
    pub retrieved_at: DateTime<Utc>,
}

impl RawMessage {
    /// Length in characters, not bytes.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    /// Carries a "today" header and at least one currency marker.
    PriceList,
    /// Models-and-colors list with no prices.
    AvailabilityOnly,
    /// Accepted only by the emergency fallback.
    Stale,
    NoMatch,
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictReason::PriceList => write!(f, "price_list"),
            VerdictReason::AvailabilityOnly => write!(f, "availability_only"),
            VerdictReason::Stale => write!(f, "stale"),
            VerdictReason::NoMatch => write!(f, "no_match"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterVerdict {
    pub accepted: bool,
    pub reason: VerdictReason,
}

impl FilterVerdict {
    #[must_use]
    pub fn accept(reason: VerdictReason) -> Self {
        Self {
            accepted: true,
            reason,
        }
    }

    #[must_use]
    pub fn reject(reason: VerdictReason) -> Self {
        Self {
            accepted: false,
            reason,
        }
    }
}

/// The candidate chosen by [`crate::filter::MessageFilter::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredMessage {
    pub message: RawMessage,
    pub verdict: FilterVerdict,
}
