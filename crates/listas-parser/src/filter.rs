//! Message Filter: picks today's price list out of a provider's candidates.

use listas_core::ProviderConfig;

use crate::lexicon::{AVAILABILITY_BRAND_LINE_THRESHOLD, AVAILABILITY_MARKERS, LIST_WORD};
use crate::text::{fold_upper, has_brand_token, has_currency_marker, has_greeting};
use crate::types::{FilterVerdict, FilteredMessage, RawMessage, VerdictReason};

/// Default minimum length for the emergency fallback, in characters.
pub const DEFAULT_MIN_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFilter {
    /// Provider-specific header phrases, on top of the shared lexicon.
    pub extra_greetings: Vec<String>,
    pub min_message_chars: usize,
    pub emergency_fallback: bool,
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            extra_greetings: Vec::new(),
            min_message_chars: DEFAULT_MIN_MESSAGE_CHARS,
            emergency_fallback: true,
        }
    }
}

impl MessageFilter {
    #[must_use]
    pub fn for_provider(
        provider: &ProviderConfig,
        min_message_chars: usize,
        emergency_fallback: bool,
    ) -> Self {
        Self {
            extra_greetings: provider.greeting_phrases.clone(),
            min_message_chars,
            emergency_fallback,
        }
    }

    /// Classifies one candidate.
    ///
    /// Exclusion is checked before acceptance, so an availability list that
    /// happens to carry a "today" header is still rejected.
    #[must_use]
    pub fn evaluate(&self, message: &RawMessage) -> FilterVerdict {
        let folded = fold_upper(&message.text);

        if AVAILABILITY_MARKERS.iter().any(|m| folded.contains(m)) {
            return FilterVerdict::reject(VerdictReason::AvailabilityOnly);
        }

        let has_currency = has_currency_marker(&folded);
        if !has_currency {
            let brand_lines = folded.lines().filter(|l| has_brand_token(l)).count();
            if brand_lines > AVAILABILITY_BRAND_LINE_THRESHOLD {
                return FilterVerdict::reject(VerdictReason::AvailabilityOnly);
            }
        }

        if has_currency && has_greeting(&folded, &self.extra_greetings) {
            FilterVerdict::accept(VerdictReason::PriceList)
        } else {
            FilterVerdict::reject(VerdictReason::NoMatch)
        }
    }

    /// Chooses the message to parse, or `None` when the provider should be
    /// skipped for the day.
    ///
    /// Among several accepted candidates the longest wins. When none is
    /// accepted and the emergency fallback is enabled, the longest candidate
    /// that was not excluded as an availability list, contains `LISTA` and
    /// exceeds `min_message_chars` is taken with [`VerdictReason::Stale`].
    #[must_use]
    pub fn select(&self, candidates: &[RawMessage]) -> Option<FilteredMessage> {
        let verdicts: Vec<(&RawMessage, FilterVerdict)> = candidates
            .iter()
            .map(|candidate| {
                let verdict = self.evaluate(candidate);
                tracing::debug!(
                    provider = %candidate.provider,
                    handle = %candidate.handle,
                    chars = candidate.char_len(),
                    accepted = verdict.accepted,
                    reason = %verdict.reason,
                    "candidate evaluated"
                );
                (candidate, verdict)
            })
            .collect();

        if let Some((message, verdict)) = verdicts
            .iter()
            .filter(|(_, v)| v.accepted)
            .max_by_key(|(m, _)| m.char_len())
        {
            return Some(FilteredMessage {
                message: (*message).clone(),
                verdict: *verdict,
            });
        }

        if !self.emergency_fallback {
            return None;
        }

        let fallback = verdicts
            .iter()
            .filter(|(_, v)| v.reason != VerdictReason::AvailabilityOnly)
            .map(|(m, _)| *m)
            .filter(|m| m.char_len() > self.min_message_chars)
            .filter(|m| fold_upper(&m.text).contains(LIST_WORD))
            .max_by_key(|m| m.char_len())?;

        tracing::warn!(
            provider = %fallback.provider,
            handle = %fallback.handle,
            chars = fallback.char_len(),
            "no candidate carried today's header; accepting emergency fallback"
        );

        Some(FilteredMessage {
            message: fallback.clone(),
            verdict: FilterVerdict::accept(VerdictReason::Stale),
        })
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
