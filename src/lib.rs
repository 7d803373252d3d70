//! OKKO Dronopad fundraising-total scraper
//!
//! A single-shot scraper, invoked by an external scheduler: acquire the
//! current fundraising total and persist it with a timestamp to a local
//! JSON file. The run always ends in exactly one write, even when every
//! acquisition path fails.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Pipeline                         │
//! │   (single pass over sources in priority order)      │
//! └────────────────────────┬────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                 TotalSource Trait                    │
//! │  - name()                                            │
//! │  - acquire() -> Option<Acquired>                     │
//! └────────────────────────┬────────────────────────────┘
//!                          │
//!      ┌───────────────────┼───────────────────┐
//!      ▼                   ▼                   ▼
//! ┌───────────┐   ┌──────────────┐   ┌──────────────────┐
//! │   Push    │   │  Direct API  │   │   Page scrape    │
//! │  channel  │   │    (JSON)    │   │ (StrategySet on  │
//! │ (websock) │   │              │   │  fetched HTML)   │
//! └───────────┘   └──────────────┘   └──────────────────┘
//!                          │
//!                          ▼
//!                ┌──────────────────┐
//!                │    StateStore    │
//!                │ (okko-data.json) │
//!                └──────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod push;
pub mod sources;
pub mod store;
pub mod strategies;

// Re-export commonly used types
pub use config::ScraperConfig;
pub use error::ScrapeError;
pub use fetcher::PageFetcher;
pub use models::{Progress, ProgressRecord, RunOutcome};
pub use pipeline::Pipeline;
pub use push::PushListener;
pub use sources::{Acquired, TotalSource};
pub use store::StateStore;
pub use strategies::StrategySet;

/// Version of the scraper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the package
pub const NAME: &str = env!("CARGO_PKG_NAME");
