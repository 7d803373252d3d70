//! config.rs - Endpoints, timeouts and paths for one scraper run
//!
//! Defaults mirror the production deployment; a handful of DRONOPAD_*
//! environment variables let the scheduler tune a run without a rebuild.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Push channel endpoint (socket.io over websocket).
const DEFAULT_PUSH_ENDPOINT: &str =
    "wss://dronopad.okko.ua/socket.io/?EIO=4&transport=websocket";

/// Event name carrying the fundraising total.
const DEFAULT_EVENT_NAME: &str = "total";

/// Direct JSON endpoint, tried after the push channel.
const DEFAULT_API_URL: &str = "https://dronopad.okko.ua/api/progress";

/// Public page scraped as the last resort.
const DEFAULT_PAGE_URL: &str = "https://www.okko.ua/dronopad";

/// Push listener timeout in milliseconds.
const DEFAULT_PUSH_TIMEOUT_MS: u64 = 30_000;

/// Whole-request timeout for HTTP fetches.
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;

/// Redirect chain cap for the page fetcher.
const DEFAULT_MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub push_endpoint: String,
    pub event_name: String,
    pub push_timeout: Duration,
    pub api_url: String,
    pub page_url: String,
    pub fetch_timeout: Duration,
    pub max_redirects: usize,
    /// Where the progress record lives.
    pub state_file: PathBuf,
    /// When true, the decoded page HTML is dumped next to the state file.
    pub debug_dump: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            push_endpoint: DEFAULT_PUSH_ENDPOINT.to_string(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
            push_timeout: Duration::from_millis(DEFAULT_PUSH_TIMEOUT_MS),
            api_url: DEFAULT_API_URL.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            state_file: PathBuf::from("data/okko-data.json"),
            debug_dump: false,
        }
    }
}

impl ScraperConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = ScraperConfig::default();

        if let Ok(path) = env::var("DRONOPAD_STATE_FILE") {
            cfg.state_file = PathBuf::from(path);
        }
        if let Some(ms) = env_ms("DRONOPAD_PUSH_TIMEOUT_MS") {
            cfg.push_timeout = ms;
        }
        if let Some(ms) = env_ms("DRONOPAD_FETCH_TIMEOUT_MS") {
            cfg.fetch_timeout = ms;
        }
        if let Ok(v) = env::var("DRONOPAD_DEBUG_DUMP") {
            cfg.debug_dump = v == "1" || v.eq_ignore_ascii_case("true");
        }

        cfg
    }

    /// Debug artifact path: same directory as the state file.
    pub fn debug_dump_file(&self) -> PathBuf {
        match self.state_file.parent() {
            Some(dir) => dir.join("okko-page.html"),
            None => PathBuf::from("okko-page.html"),
        }
    }
}

fn env_ms(key: &str) -> Option<Duration> {
    env::var(key).ok()?.parse::<u64>().ok().map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ScraperConfig::default();
        assert_eq!(cfg.push_timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_redirects, 10);
        assert_eq!(cfg.event_name, "total");
    }

    #[test]
    fn test_debug_dump_file_next_to_state() {
        let cfg = ScraperConfig {
            state_file: PathBuf::from("/var/lib/dronopad/okko-data.json"),
            ..ScraperConfig::default()
        };
        assert_eq!(
            cfg.debug_dump_file(),
            PathBuf::from("/var/lib/dronopad/okko-page.html")
        );
    }
}
