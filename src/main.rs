//! main.rs - Entry point for the Dronopad scraper
//!
//! One acquisition pass per invocation; scheduling is external (a timer or
//! CI cron). The process always exits 0; a run that extracted nothing is
//! still a successful run from the scheduler's point of view, and the state
//! file's timestamp is refreshed either way.

use dronopad_scraper::{Pipeline, ScraperConfig, StateStore, NAME, VERSION};
use log::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    info!("Starting {} v{}", NAME, VERSION);

    let config = ScraperConfig::from_env();
    info!("  - push endpoint: {}", config.push_endpoint);
    info!("  - page url:      {}", config.page_url);
    info!("  - state file:    {}", config.state_file.display());

    let store = StateStore::new(config.state_file.clone());
    let pipeline = Pipeline::standard(&config);

    match pipeline.run(&store).await {
        Ok(record) => info!("✓ run complete: {}", record),
        Err(e) => {
            // even a failed write must not surface as a scheduler failure
            error!("✗ state write failed: {}", e);
        }
    }
}
