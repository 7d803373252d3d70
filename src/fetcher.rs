//! fetcher.rs - Page fetcher with explicit redirect handling and body decoding
//!
//! reqwest's automatic redirect following and decompression are both turned
//! off: the original data source occasionally answers with odd redirect
//! chains and mislabelled encodings, so the fetcher owns both steps and can
//! log exactly what came back.

use flate2::read::{GzDecoder, ZlibDecoder};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_ENCODING, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode, Url};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ScrapeError;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Fetches a page as decoded text.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    max_redirects: usize,
    /// When set, the decoded text is dumped here after every fetch.
    debug_dump: Option<PathBuf>,
}

impl PageFetcher {
    pub fn new(fetch_timeout: Duration, max_redirects: usize) -> Self {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(fetch_timeout)
            .build()
            .expect("Failed to create HTTP client");

        PageFetcher {
            client,
            max_redirects,
            debug_dump: None,
        }
    }

    /// Enable the raw-HTML debug artifact.
    pub fn with_debug_dump(mut self, path: PathBuf) -> Self {
        self.debug_dump = Some(path);
        self
    }

    /// GET `url` with browser-like headers, follow redirects up to the cap,
    /// decode the body per its declared content-encoding and return text.
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let mut current = Url::parse(url)
            .map_err(|e| ScrapeError::Parse(format!("bad url {}: {}", url, e)))?;

        for hop in 0..=self.max_redirects {
            debug!("GET {} (hop {})", current, hop);

            let response = self
                .client
                .get(current.clone())
                .headers(browser_headers())
                .send()
                .await?;

            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or(ScrapeError::Network {
                        status: status.as_u16(),
                    })?;

                // relative Location is resolved against the current URL
                current = current.join(location).map_err(|e| {
                    ScrapeError::Parse(format!("bad redirect target {}: {}", location, e))
                })?;
                continue;
            }

            if status != StatusCode::OK {
                return Err(ScrapeError::Network {
                    status: status.as_u16(),
                });
            }

            let encoding = response
                .headers()
                .get(CONTENT_ENCODING)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_ascii_lowercase());

            let bytes = response.bytes().await?;
            let text = decode_body(&bytes, encoding.as_deref())?;

            self.dump_debug_artifact(&text);

            return Ok(text);
        }

        Err(ScrapeError::TooManyRedirects(self.max_redirects))
    }

    /// Best-effort side channel; must never fail the main flow.
    fn dump_debug_artifact(&self, text: &str) {
        if let Some(path) = &self.debug_dump {
            if let Err(e) = std::fs::write(path, text) {
                debug!("debug dump to {} failed (ignored): {}", path.display(), e);
            }
        }
    }
}

/// Decode a response body according to its declared content-encoding.
///
/// `br` is a known limitation: we do not carry a brotli decoder, so the raw
/// bytes are passed through lossily. Unrecognized or absent encodings are
/// treated as plain text.
pub fn decode_body(bytes: &[u8], encoding: Option<&str>) -> Result<String, ScrapeError> {
    match encoding {
        Some("gzip") => {
            let mut decoder = GzDecoder::new(bytes);
            let mut out = String::new();
            decoder
                .read_to_string(&mut out)
                .map_err(|e| ScrapeError::Decode(format!("gzip: {}", e)))?;
            Ok(out)
        }
        Some("deflate") => {
            let mut decoder = ZlibDecoder::new(bytes);
            let mut out = String::new();
            decoder
                .read_to_string(&mut out)
                .map_err(|e| ScrapeError::Decode(format!("deflate: {}", e)))?;
            Ok(out)
        }
        Some("br") => {
            warn!("brotli content-encoding declared; passing raw bytes through");
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
    headers.insert(
        "Accept",
        HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        "Accept-Language",
        HeaderValue::from_static("uk-UA,uk;q=0.9,en;q=0.5"),
    );
    headers.insert(
        "Accept-Encoding",
        HeaderValue::from_static("gzip, deflate"),
    );
    headers
}
