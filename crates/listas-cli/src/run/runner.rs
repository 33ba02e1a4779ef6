//! Per-provider outcomes and the run-level verdict.

use listas_catalog::MergeStats;
use listas_parser::SkipReason;

/// What happened to one provider during a run.
pub(crate) enum ProviderOutcome {
    /// Products were merged (and saved, unless dry-run).
    Updated {
        products: usize,
        stats: MergeStats,
        complete: bool,
    },
    /// A message was chosen but no line priced.
    Empty,
    Skipped(SkipReason),
    /// Persisting this provider's merge failed; the catalog on disk is
    /// unchanged for it.
    Failed(anyhow::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunTotals {
    pub updated: usize,
    pub empty: usize,
    pub source_unavailable: usize,
    pub filter_rejected: usize,
    pub failed: usize,
    pub incomplete: usize,
    pub products: usize,
    pub added: usize,
}

impl RunTotals {
    pub(crate) fn record(&mut self, provider: &str, outcome: &ProviderOutcome) {
        match outcome {
            ProviderOutcome::Updated {
                products,
                stats,
                complete,
            } => {
                self.updated += 1;
                self.products += products;
                self.added += stats.added;
                if !complete {
                    self.incomplete += 1;
                }
            }
            ProviderOutcome::Empty => {
                tracing::warn!(provider, "chosen message produced no priced products");
                self.empty += 1;
            }
            ProviderOutcome::Skipped(reason) => {
                tracing::info!(provider, reason = %reason, "provider skipped");
                match reason {
                    SkipReason::SourceUnavailable => self.source_unavailable += 1,
                    SkipReason::FilterRejected => self.filter_rejected += 1,
                }
            }
            ProviderOutcome::Failed(e) => {
                tracing::error!(provider, error = %format!("{e:#}"), "provider run failed");
                self.failed += 1;
            }
        }
    }

    /// Records a persistence failure outside any single provider, such as
    /// the broadcast or spreadsheet write.
    pub(crate) fn record_sink_failure(&mut self, sink: &str, error: &anyhow::Error) {
        tracing::error!(sink, error = %format!("{error:#}"), "writing output failed");
        self.failed += 1;
    }

    /// Fails when anything could not be persisted or when no provider
    /// produced an update.
    pub(crate) fn verdict(&self) -> anyhow::Result<()> {
        if self.failed > 0 {
            anyhow::bail!("{} persistence failure(s) during the run", self.failed);
        }
        if self.updated == 0 {
            anyhow::bail!(
                "no provider produced a catalog update ({} without source, {} rejected by filter, {} empty)",
                self.source_unavailable,
                self.filter_rejected,
                self.empty
            );
        }
        Ok(())
    }
}
