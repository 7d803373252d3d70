//! pipeline.rs - Fallback orchestrator
//!
//! Drives the acquisition sources in priority order, single pass, no
//! retries. The first source yielding a valid total wins; every error is
//! logged and treated as a miss. Both terminal outcomes end in exactly one
//! state-store write, so the timestamp always advances even when every
//! source failed.

use log::{info, warn};

use crate::config::ScraperConfig;
use crate::models::{ProgressRecord, RunOutcome};
use crate::sources::{DirectApiSource, PageScrapeSource, PushChannelSource, TotalSource};
use crate::store::StateStore;

pub struct Pipeline {
    sources: Vec<Box<dyn TotalSource>>,
}

impl Pipeline {
    /// Production ordering: push channel, then direct API, then page scrape.
    pub fn standard(config: &ScraperConfig) -> Self {
        Pipeline {
            sources: vec![
                Box::new(PushChannelSource::new(config)),
                Box::new(DirectApiSource::new(config)),
                Box::new(PageScrapeSource::new(config)),
            ],
        }
    }

    /// Custom source list, highest priority first.
    pub fn new(sources: Vec<Box<dyn TotalSource>>) -> Self {
        Pipeline { sources }
    }

    /// Try the sources in order and report the terminal state.
    pub async fn acquire(&self) -> RunOutcome {
        for source in &self.sources {
            info!("trying source: {}", source.name());

            match source.acquire().await {
                Ok(Some(acquired)) => {
                    info!(
                        "✓ source {} produced total {} (tag {})",
                        source.name(),
                        acquired.total,
                        acquired.source
                    );
                    return RunOutcome::Commit {
                        total: acquired.total,
                        source: acquired.source,
                    };
                }
                Ok(None) => {
                    info!("source {} saw nothing usable, falling back", source.name());
                }
                Err(e) => {
                    // optimistic pipeline: a failed source never blocks the run
                    warn!("✗ source {} failed, falling back: {}", source.name(), e);
                }
            }
        }

        RunOutcome::NoUpdate
    }

    /// One complete run: load the prior record, acquire, commit or touch,
    /// write exactly once. Returns the record as written.
    pub async fn run(&self, store: &StateStore) -> anyhow::Result<ProgressRecord> {
        let mut record = store.load();

        match self.acquire().await {
            RunOutcome::Commit { total, source } => {
                record.commit(total, &source);
                info!("committing total {} from {}", total, source);
            }
            RunOutcome::NoUpdate => {
                record.touch();
                info!(
                    "no update: keeping total {}, refreshing timestamp",
                    record.progress.total
                );
            }
        }

        store.save(&record)?;
        Ok(record)
    }
}
