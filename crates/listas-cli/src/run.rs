//! The daily `run` command.
//!
//! Providers are processed one after another against the same in-memory
//! catalog. Each provider's merge is saved before the next one starts, so a
//! provider that fails to persist leaves the others' updates in place.

mod runner;

use anyhow::Context;
use chrono::{Local, NaiveDate, Utc};
use listas_catalog::{
    broadcast_view, write_broadcast, write_raw_text, write_spreadsheet, CatalogMerger, CatalogStore,
    PrivateCatalog, PublicCatalog,
};
use listas_core::{load_providers, AppConfig, ProviderConfig, ProvidersFile};
use listas_parser::{extract_provider, DirectorySource, ExtractionConfig, MessageSource};

use self::runner::{ProviderOutcome, RunTotals};

/// Everything a provider run reads from; built once per command.
struct RunContext<'a> {
    config: &'a AppConfig,
    source: &'a dyn MessageSource,
    store: &'a CatalogStore,
    merger: CatalogMerger,
    extraction: ExtractionConfig,
    day: NaiveDate,
    dry_run: bool,
}

/// Resolves the providers to process: all of them, or the one named by
/// `filter`.
pub(crate) fn select_providers<'a>(
    providers: &'a ProvidersFile,
    filter: Option<&str>,
) -> anyhow::Result<Vec<&'a ProviderConfig>> {
    match filter {
        Some(needle) => {
            let provider = providers
                .find(needle)
                .ok_or_else(|| anyhow::anyhow!("provider '{needle}' not found in registry"))?;
            Ok(vec![provider])
        }
        None => {
            let mut all: Vec<&ProviderConfig> = providers.providers.iter().collect();
            all.sort_by_key(|p| p.priority);
            Ok(all)
        }
    }
}

/// Run the daily pipeline for every selected provider.
///
/// # Errors
///
/// Returns an error if the registry or the catalog cannot be loaded, if any
/// output could not be persisted, or if no provider produced an update.
/// Per-provider skips are logged and counted, not propagated.
pub(crate) fn run_daily(
    config: &AppConfig,
    provider_filter: Option<&str>,
    date: Option<NaiveDate>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let providers = load_providers(&config.providers_path)?;
    let selected = select_providers(&providers, provider_filter)?;
    let day = date.unwrap_or_else(|| Local::now().date_naive());

    let source = DirectorySource::new(&config.inbox_dir);
    let store = CatalogStore::new(&config.public_catalog_path, &config.private_catalog_path);
    let merger = CatalogMerger::new(&providers).with_formula(config.pricing.describe());
    let (mut public, mut private) = store
        .load_reconciled(&merger)
        .context("failed to load catalog")?;

    let ctx = RunContext {
        config,
        source: &source,
        store: &store,
        merger,
        extraction: ExtractionConfig::from_app_config(config),
        day,
        dry_run,
    };

    tracing::info!(%day, providers = selected.len(), dry_run, "starting run");

    let mut totals = RunTotals::default();
    for provider in &selected {
        let outcome = process_provider(&ctx, provider, &mut public, &mut private, &mut totals);
        totals.record(&provider.name, &outcome);
    }

    if totals.updated > 0 && !dry_run {
        let excluded = providers.broadcast_exclusions();
        write_outputs(config, day, &public, &private, &excluded, &mut totals);
    }

    println!(
        "{}{} of {} providers updated, {} products ({} new), {} incomplete, {} skipped, {} failed",
        if dry_run { "dry-run: " } else { "" },
        totals.updated,
        selected.len(),
        totals.products,
        totals.added,
        totals.incomplete,
        totals.source_unavailable + totals.filter_rejected + totals.empty,
        totals.failed
    );

    totals.verdict()
}

fn process_provider(
    ctx: &RunContext<'_>,
    provider: &ProviderConfig,
    public: &mut PublicCatalog,
    private: &mut PrivateCatalog,
    totals: &mut RunTotals,
) -> ProviderOutcome {
    let extraction = match extract_provider(ctx.source, provider, ctx.day, &ctx.extraction) {
        Ok(extraction) => extraction,
        Err(reason) => return ProviderOutcome::Skipped(reason),
    };

    if extraction.priced.is_empty() {
        return ProviderOutcome::Empty;
    }

    let merged = ctx.merger.merge(
        public.clone(),
        private.clone(),
        &extraction.priced,
        &provider.name,
        Utc::now(),
    );

    if ctx.dry_run {
        println!(
            "dry-run: {} would merge {} products ({} new, {} changed)",
            provider.name,
            extraction.priced.len(),
            merged.stats.added,
            merged.stats.updated
        );
    } else {
        if let Err(e) = ctx.store.save(&merged.public, &merged.private) {
            return ProviderOutcome::Failed(anyhow::Error::new(e).context("failed to save catalog"));
        }
        // Written only once the merge it describes has landed.
        if let Err(e) = write_raw_text(
            &ctx.config.output_dir,
            provider,
            &extraction.message.message.text,
            Local::now(),
        ) {
            totals.record_sink_failure("raw text", &e.into());
        }
    }

    let outcome = ProviderOutcome::Updated {
        products: extraction.priced.len(),
        stats: merged.stats,
        complete: extraction.complete,
    };
    *public = merged.public;
    *private = merged.private;
    outcome
}

fn write_outputs(
    config: &AppConfig,
    day: NaiveDate,
    public: &PublicCatalog,
    private: &PrivateCatalog,
    excluded: &[&str],
    totals: &mut RunTotals,
) {
    let shown = broadcast_view(public, private, excluded);
    match write_broadcast(&config.output_dir, &shown, day) {
        Ok(path) => println!("broadcast: {}", path.display()),
        Err(e) => totals.record_sink_failure("broadcast", &e.into()),
    }
    match write_spreadsheet(&config.output_dir, private, day) {
        Ok(path) => println!("spreadsheet: {}", path.display()),
        Err(e) => totals.record_sink_failure("spreadsheet", &e.into()),
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
