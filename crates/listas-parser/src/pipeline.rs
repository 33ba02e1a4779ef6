//! Per-provider extraction: source, filter, completeness, parse, price.
//!
//! Everything a run needs is passed in explicitly; the pipeline keeps no
//! state between providers, so one provider's failure cannot leak into the
//! next.

use chrono::NaiveDate;
use listas_core::{AppConfig, PricedProduct, PricingConfig, ProductRecord, ProviderConfig};
use thiserror::Error;

use crate::completeness::{CompletenessChecker, CompletenessIssue};
use crate::error::ParserError;
use crate::filter::MessageFilter;
use crate::lines::{LineParser, ParseReport};
use crate::pricing::price_record;
use crate::source::MessageSource;
use crate::types::{FilterVerdict, FilteredMessage, RawMessage, VerdictReason};

/// Why a provider produced nothing today. Counted, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("message source returned no candidates")]
    SourceUnavailable,

    #[error("no candidate passed the message filter")]
    FilterRejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub pricing: PricingConfig,
    pub min_message_chars: usize,
    pub emergency_fallback: bool,
}

impl ExtractionConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            pricing: config.pricing,
            min_message_chars: config.min_message_chars,
            emergency_fallback: config.emergency_fallback,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderExtraction {
    /// The chosen message; its text is the best capture available.
    pub message: FilteredMessage,
    /// `false` when the text still failed the completeness check after the
    /// single re-fetch.
    pub complete: bool,
    pub issues: Vec<CompletenessIssue>,
    pub report: ParseReport,
    pub priced: Vec<PricedProduct>,
    /// Records the price formula refused.
    pub unpriced: Vec<(ProductRecord, ParserError)>,
}

/// Runs the extraction pipeline for one provider and day.
///
/// # Errors
///
/// Returns a [`SkipReason`] when the provider has nothing to parse today.
pub fn extract_provider<S: MessageSource + ?Sized>(
    source: &S,
    provider: &ProviderConfig,
    day: NaiveDate,
    config: &ExtractionConfig,
) -> Result<ProviderExtraction, SkipReason> {
    let candidates = match source.fetch_candidates(provider, day) {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(provider = %provider.name, error = %e, "message source failed");
            return Err(SkipReason::SourceUnavailable);
        }
    };
    if candidates.is_empty() {
        return Err(SkipReason::SourceUnavailable);
    }

    let filter = MessageFilter::for_provider(
        provider,
        config.min_message_chars,
        config.emergency_fallback,
    );
    let Some(mut chosen) = filter.select(&candidates) else {
        tracing::info!(
            provider = %provider.name,
            candidates = candidates.len(),
            "no candidate accepted"
        );
        return Err(SkipReason::FilterRejected);
    };

    let checker = CompletenessChecker {
        extra_greetings: provider.greeting_phrases.clone(),
        min_message_chars: config.min_message_chars,
    };
    let (text, issues) = best_text(source, provider, &chosen, &filter, &checker);
    let complete = issues.is_empty();
    if !complete {
        tracing::warn!(
            provider = %provider.name,
            handle = %chosen.message.handle,
            issues = ?issues,
            "message still looks incomplete; parsing best available text"
        );
    }
    chosen.message.text = text;

    let report =
        LineParser::new(provider.greeting_phrases.clone()).parse_report(&chosen.message.text);

    let mut priced = Vec::with_capacity(report.records.len());
    let mut unpriced = Vec::new();
    for record in &report.records {
        match price_record(record.clone(), &config.pricing) {
            Ok(p) => priced.push(p),
            Err(e) => {
                tracing::warn!(
                    provider = %provider.name,
                    product = %record.raw_name,
                    error = %e,
                    "price formula rejected record"
                );
                unpriced.push((record.clone(), e));
            }
        }
    }

    tracing::info!(
        provider = %provider.name,
        reason = %chosen.verdict.reason,
        complete,
        products = priced.len(),
        skipped_lines = report.skipped.len(),
        "provider extracted"
    );

    Ok(ProviderExtraction {
        message: chosen,
        complete,
        issues,
        report,
        priced,
        unpriced,
    })
}

/// Applies the completeness check with its single allowed re-fetch.
///
/// The re-fetched text goes back through `filter` and is dropped if it no
/// longer qualifies. If it is still incomplete the longer of the two
/// captures wins.
fn best_text<S: MessageSource + ?Sized>(
    source: &S,
    provider: &ProviderConfig,
    chosen: &FilteredMessage,
    filter: &MessageFilter,
    checker: &CompletenessChecker,
) -> (String, Vec<CompletenessIssue>) {
    let original = &chosen.message.text;
    let issues = checker.assess(original);
    if issues.is_empty() {
        return (original.clone(), issues);
    }

    tracing::debug!(
        provider = %provider.name,
        handle = %chosen.message.handle,
        issues = ?issues,
        "message looks truncated; re-fetching"
    );

    let refetched = match source.fetch_full_text(provider, &chosen.message.handle) {
        Ok(Some(text)) => text,
        Ok(None) => return (original.clone(), issues),
        Err(e) => {
            tracing::warn!(provider = %provider.name, error = %e, "re-fetch failed");
            return (original.clone(), issues);
        }
    };

    let reverdict = filter.evaluate(&RawMessage {
        text: refetched.clone(),
        ..chosen.message.clone()
    });
    if !still_qualifies(&chosen.verdict, &reverdict) {
        tracing::warn!(
            provider = %provider.name,
            handle = %chosen.message.handle,
            reason = %reverdict.reason,
            "re-fetched text rejected by filter; keeping original"
        );
        return (original.clone(), issues);
    }

    let refetched_issues = checker.assess(&refetched);
    if refetched_issues.is_empty() || refetched.chars().count() > original.chars().count() {
        (refetched, refetched_issues)
    } else {
        (original.clone(), issues)
    }
}

/// An expansion never qualifies as an availability list. One that lost the
/// header only qualifies when the original itself came from the fallback.
fn still_qualifies(original: &FilterVerdict, refetched: &FilterVerdict) -> bool {
    match refetched.reason {
        VerdictReason::AvailabilityOnly => false,
        _ if refetched.accepted => true,
        _ => original.reason == VerdictReason::Stale,
    }
}
