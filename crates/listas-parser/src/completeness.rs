//! Completeness Checker: detects captures truncated by the chat client.

use serde::{Deserialize, Serialize};

use crate::filter::DEFAULT_MIN_MESSAGE_CHARS;
use crate::text::{fold_upper, has_brand_token, has_digit, has_greeting};

/// Last-token length at or below which a non-numeric tail looks cut off.
const SUSPICIOUS_TAIL_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessIssue {
    TrailingEllipsis,
    TruncatedTail,
    MissingHeader,
    MissingBrand,
    TooShort,
}

impl std::fmt::Display for CompletenessIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletenessIssue::TrailingEllipsis => write!(f, "trailing_ellipsis"),
            CompletenessIssue::TruncatedTail => write!(f, "truncated_tail"),
            CompletenessIssue::MissingHeader => write!(f, "missing_header"),
            CompletenessIssue::MissingBrand => write!(f, "missing_brand"),
            CompletenessIssue::TooShort => write!(f, "too_short"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletenessChecker {
    pub extra_greetings: Vec<String>,
    pub min_message_chars: usize,
}

impl Default for CompletenessChecker {
    fn default() -> Self {
        Self {
            extra_greetings: Vec::new(),
            min_message_chars: DEFAULT_MIN_MESSAGE_CHARS,
        }
    }
}

impl CompletenessChecker {
    /// Returns every heuristic that `text` fails. An empty list means complete.
    #[must_use]
    pub fn assess(&self, text: &str) -> Vec<CompletenessIssue> {
        let mut issues = Vec::new();
        let trimmed = text.trim_end();

        if trimmed.ends_with('…') || trimmed.ends_with("...") {
            issues.push(CompletenessIssue::TrailingEllipsis);
        } else if tail_looks_truncated(trimmed) {
            issues.push(CompletenessIssue::TruncatedTail);
        }

        let folded = fold_upper(text);
        if !has_greeting(&folded, &self.extra_greetings) {
            issues.push(CompletenessIssue::MissingHeader);
        }
        if !has_brand_token(&folded) {
            issues.push(CompletenessIssue::MissingBrand);
        }
        if text.chars().count() < self.min_message_chars {
            issues.push(CompletenessIssue::TooShort);
        }

        issues
    }

    #[must_use]
    pub fn is_complete(&self, text: &str) -> bool {
        self.assess(text).is_empty()
    }
}

/// Checks `text` against the default thresholds.
#[must_use]
pub fn is_complete(text: &str) -> bool {
    CompletenessChecker::default().is_complete(text)
}

/// Trailing emoji and punctuation are decoration, so the last token is taken
/// after stripping them.
fn tail_looks_truncated(trimmed: &str) -> bool {
    let Some(last_line) = trimmed.lines().rev().find(|l| !l.trim().is_empty()) else {
        return false;
    };

    let last_token = last_line
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '$'))
        .filter(|t| !t.is_empty())
        .next_back();

    last_token.is_some_and(|token| {
        token.chars().count() <= SUSPICIOUS_TAIL_CHARS && !has_digit(token) && !token.contains('$')
    })
}
