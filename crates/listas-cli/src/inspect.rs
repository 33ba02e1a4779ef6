//! Read-only commands: `parse` and `providers`.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use listas_core::{load_providers, AppConfig, ProviderConfig};
use listas_parser::{
    price_record, CompletenessChecker, LineParser, MessageFilter, MessageHandle, RawMessage,
};

/// Parse one exported message and print what the pipeline would extract.
///
/// # Errors
///
/// Returns an error if the file cannot be read or `provider` is not in the
/// registry.
pub(crate) fn run_parse(
    config: &AppConfig,
    file: &Path,
    provider: Option<&str>,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let provider = match provider {
        Some(needle) => {
            let providers = load_providers(&config.providers_path)?;
            providers
                .find(needle)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("provider '{needle}' not found in registry"))?
        }
        None => ProviderConfig {
            name: "adhoc".to_string(),
            priority: u8::MAX,
            greeting_phrases: Vec::new(),
            notes: None,
            broadcast: true,
        },
    };

    let message = RawMessage {
        provider: provider.name.clone(),
        handle: MessageHandle::fingerprint(&text),
        text,
        retrieved_at: Utc::now(),
    };

    let filter = MessageFilter::for_provider(
        &provider,
        config.min_message_chars,
        config.emergency_fallback,
    );
    let verdict = filter.evaluate(&message);
    let checker = CompletenessChecker {
        extra_greetings: provider.greeting_phrases.clone(),
        min_message_chars: config.min_message_chars,
    };
    let issues = checker.assess(&message.text);

    println!(
        "filter: {} ({}), {} chars",
        if verdict.accepted { "accepted" } else { "rejected" },
        verdict.reason,
        message.char_len()
    );
    if issues.is_empty() {
        println!("completeness: ok");
    } else {
        let names: Vec<String> = issues.iter().map(ToString::to_string).collect();
        println!("completeness: {}", names.join(", "));
    }

    let report = LineParser::new(provider.greeting_phrases.clone()).parse_report(&message.text);
    let mut category = "";
    for record in &report.records {
        if record.category != category {
            category = &record.category;
            println!("\n[{category}]");
        }
        match price_record(record.clone(), &config.pricing) {
            Ok(priced) => println!(
                "  {:<40} cost {:>8}  price {:>6}",
                record.raw_name, record.cost, priced.sale_price
            ),
            Err(e) => println!("  {:<40} cost {:>8}  unpriced: {e}", record.raw_name, record.cost),
        }
    }

    for skipped in &report.skipped {
        println!("skipped line {}: {} ({})", skipped.line_no, skipped.line, skipped.error);
    }
    println!(
        "\n{} products, {} skipped lines, formula {}",
        report.records.len(),
        report.skipped.len(),
        config.pricing.describe()
    );

    Ok(())
}

/// List the registry with each provider's inbox status.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded.
pub(crate) fn run_providers(config: &AppConfig) -> anyhow::Result<()> {
    let providers = load_providers(&config.providers_path)?;

    let mut sorted: Vec<&ProviderConfig> = providers.providers.iter().collect();
    sorted.sort_by_key(|p| p.priority);

    for provider in sorted {
        let inbox = config.inbox_dir.join(provider.slug());
        println!(
            "{} {:<20} slug={:<20} greetings={} inbox={}",
            provider.priority,
            provider.name,
            provider.slug(),
            provider.greeting_phrases.len(),
            if inbox.is_dir() { "present" } else { "missing" }
        );
    }
    Ok(())
}
