//! Regenerate the broadcast and the audit workbook from the stored catalog.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use listas_catalog::{
    broadcast_view, write_broadcast, write_spreadsheet, CatalogMerger, CatalogStore,
    PrivateCatalog, PublicCatalog,
};
use listas_core::{load_providers, AppConfig, ProvidersFile};

fn load_catalog(
    config: &AppConfig,
    providers: &ProvidersFile,
) -> anyhow::Result<(PublicCatalog, PrivateCatalog)> {
    let store = CatalogStore::new(&config.public_catalog_path, &config.private_catalog_path);
    if !store.public_path().exists() && !store.private_path().exists() {
        anyhow::bail!(
            "no catalog found at {}; run `listas run` first",
            store.public_path().display()
        );
    }
    store
        .load_reconciled(&CatalogMerger::new(providers))
        .context("failed to load catalog")
}

pub(crate) fn run_broadcast(config: &AppConfig, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let providers = load_providers(&config.providers_path)?;
    let (public, private) = load_catalog(config, &providers)?;
    let shown = broadcast_view(&public, &private, &providers.broadcast_exclusions());
    let day = date.unwrap_or_else(|| Local::now().date_naive());
    let path = write_broadcast(&config.output_dir, &shown, day)?;
    println!("broadcast: {} ({} products)", path.display(), shown.products.len());
    Ok(())
}

pub(crate) fn run_audit(config: &AppConfig, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let providers = load_providers(&config.providers_path)?;
    let (_, private) = load_catalog(config, &providers)?;
    let day = date.unwrap_or_else(|| Local::now().date_naive());
    let path = write_spreadsheet(&config.output_dir, &private, day)?;
    println!("spreadsheet: {} ({} rows)", path.display(), private.products.len());
    Ok(())
}
