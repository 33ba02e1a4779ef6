//! Catalog Merger: folds one provider's priced batch into both views.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use listas_core::{PricedProduct, ProvidersFile};

use crate::key::{image_name, normalize_key};
use crate::types::{CatalogEntry, PrivateCatalog, PublicCatalog, PublicProduct, CATALOG_VERSION};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// New `(key, provider)` entries.
    pub added: usize,
    /// Existing entries whose price, cost, margin or fee changed.
    pub updated: usize,
    /// Existing entries seen again with identical figures.
    pub unchanged: usize,
    /// Batch rows dropped in favour of a cheaper row with the same key.
    pub batch_duplicates: usize,
    /// Products whose name normalizes to an empty key.
    pub unkeyed: usize,
    /// Keys whose published provider changed.
    pub republished: usize,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub public: PublicCatalog,
    pub private: PrivateCatalog,
    pub stats: MergeStats,
}

/// Merges priced batches into the catalog views.
///
/// When several providers list the same key, the public view shows the
/// cheapest offer. Ties go to the provider with the lower priority number,
/// then to the provider name.
#[derive(Debug, Clone, Default)]
pub struct CatalogMerger {
    providers: ProvidersFile,
    formula: Option<String>,
}

impl CatalogMerger {
    #[must_use]
    pub fn new(providers: &ProvidersFile) -> Self {
        Self {
            providers: providers.clone(),
            formula: None,
        }
    }

    /// Records `formula` in the private metadata on every merge.
    #[must_use]
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    #[must_use]
    pub fn merge(
        &self,
        mut public: PublicCatalog,
        mut private: PrivateCatalog,
        products: &[PricedProduct],
        provider: &str,
        now: DateTime<Utc>,
    ) -> MergeOutcome {
        let mut stats = MergeStats::default();
        let batch = dedupe_batch(products, &mut stats);

        for (key, product) in &batch {
            let existing = private
                .products
                .iter_mut()
                .find(|e| e.key == *key && e.provider == provider);

            if let Some(entry) = existing {
                let changed = entry.price != product.sale_price
                    || entry.cost_price != product.cost()
                    || entry.margin_percent != product.margin_percent
                    || entry.flat_fee_usd != product.flat_fee_usd;
                entry.price = product.sale_price;
                entry.cost_price = product.cost();
                entry.margin_percent = product.margin_percent;
                entry.flat_fee_usd = product.flat_fee_usd;
                entry.last_updated = now;
                if changed {
                    stats.updated += 1;
                } else {
                    stats.unchanged += 1;
                }
            } else {
                private.products.push(CatalogEntry {
                    key: key.clone(),
                    name: product.name().to_string(),
                    price: product.sale_price,
                    cost_price: product.cost(),
                    category: product.category().to_string(),
                    provider: provider.to_string(),
                    margin_percent: product.margin_percent,
                    flat_fee_usd: product.flat_fee_usd,
                    last_updated: now,
                    published: false,
                });
                stats.added += 1;
            }
        }

        for (key, _) in &batch {
            if self.publish(key, &mut public, &mut private, provider, now) {
                stats.republished += 1;
            }
        }

        refresh_metadata(&mut public, &mut private, self.formula.as_deref(), now);

        tracing::debug!(
            provider,
            added = stats.added,
            updated = stats.updated,
            unchanged = stats.unchanged,
            republished = stats.republished,
            "catalog merged"
        );

        MergeOutcome {
            public,
            private,
            stats,
        }
    }

    /// Re-runs the election for every key in `private` and mirrors each
    /// published price into `public`, adding public rows that are missing.
    /// Used on catalogs read from disk, whose two views may disagree after a
    /// legacy migration. Returns the number of public rows corrected.
    pub fn reconcile(&self, public: &mut PublicCatalog, private: &mut PrivateCatalog) -> usize {
        let keys: BTreeSet<String> = private.products.iter().map(|e| e.key.clone()).collect();
        let mut corrected = 0;

        for key in &keys {
            let Some((winner, _)) = self.elect(key, private) else {
                continue;
            };
            let elected = &private.products[winner];
            if let Some(shown) = public.products.iter_mut().find(|p| p.key == *key) {
                if shown.price != elected.price {
                    shown.price = elected.price;
                    shown.last_updated = shown.last_updated.max(elected.last_updated);
                    corrected += 1;
                }
            } else {
                public.products.push(PublicProduct {
                    key: key.clone(),
                    name: elected.name.clone(),
                    price: elected.price,
                    category: elected.category.clone(),
                    image: image_name(key),
                    last_updated: elected.last_updated,
                });
                corrected += 1;
            }
        }

        if corrected > 0 {
            public.metadata.total_products = public.products.len();
            tracing::info!(corrected, "public view reconciled with published entries");
        }
        corrected
    }

    /// Flags the winning entry for `key` as published: lowest price, then
    /// provider priority, then provider name. Returns its index and whether
    /// the elected entry was not published before.
    fn elect(&self, key: &str, private: &mut PrivateCatalog) -> Option<(usize, bool)> {
        let winner = private
            .products
            .iter()
            .enumerate()
            .filter(|(_, e)| e.key == key)
            .min_by(|(_, a), (_, b)| {
                a.price
                    .cmp(&b.price)
                    .then_with(|| {
                        self.providers
                            .priority_of(&a.provider)
                            .cmp(&self.providers.priority_of(&b.provider))
                    })
                    .then_with(|| a.provider.cmp(&b.provider))
            })
            .map(|(idx, _)| idx)?;

        let mut republished = false;
        for (idx, entry) in private.products.iter_mut().enumerate() {
            if entry.key != key {
                continue;
            }
            let elected = idx == winner;
            if elected && !entry.published {
                republished = true;
            }
            entry.published = elected;
        }
        Some((winner, republished))
    }

    /// Re-elects the published entry for `key` and mirrors its price into
    /// the public view. Returns `true` when the elected provider changed.
    fn publish(
        &self,
        key: &str,
        public: &mut PublicCatalog,
        private: &mut PrivateCatalog,
        provider: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let Some((winner, republished)) = self.elect(key, private) else {
            return false;
        };

        let elected = &private.products[winner];
        if let Some(shown) = public.products.iter_mut().find(|p| p.key == key) {
            if shown.price != elected.price || elected.provider == provider {
                shown.last_updated = now;
            }
            shown.price = elected.price;
        } else {
            public.products.push(PublicProduct {
                key: key.to_string(),
                name: elected.name.clone(),
                price: elected.price,
                category: elected.category.clone(),
                image: image_name(key),
                last_updated: now,
            });
        }

        republished
    }
}

/// Keys the batch and keeps the cheapest row per key, in first-seen order.
fn dedupe_batch<'a>(
    products: &'a [PricedProduct],
    stats: &mut MergeStats,
) -> Vec<(String, &'a PricedProduct)> {
    let mut batch: Vec<(String, &PricedProduct)> = Vec::with_capacity(products.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for product in products {
        let key = normalize_key(product.name());
        if key.is_empty() {
            tracing::warn!(product = %product.name(), "product name has no usable key");
            stats.unkeyed += 1;
            continue;
        }

        if let Some(&pos) = index.get(&key) {
            stats.batch_duplicates += 1;
            if product.sale_price < batch[pos].1.sale_price {
                batch[pos].1 = product;
            }
        } else {
            index.insert(key.clone(), batch.len());
            batch.push((key, product));
        }
    }

    batch
}

fn refresh_metadata(
    public: &mut PublicCatalog,
    private: &mut PrivateCatalog,
    formula: Option<&str>,
    now: DateTime<Utc>,
) {
    public.metadata.total_products = public.products.len();
    public.metadata.last_updated = Some(now);
    public.metadata.version = CATALOG_VERSION.to_string();

    let providers: BTreeSet<&str> = private.products.iter().map(|e| e.provider.as_str()).collect();
    private.metadata.providers = providers.into_iter().map(str::to_string).collect();
    private.metadata.total_products = private.products.len();
    private.metadata.last_updated = Some(now);
    private.metadata.version = CATALOG_VERSION.to_string();
    if let Some(formula) = formula {
        private.metadata.formula = Some(formula.to_string());
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
