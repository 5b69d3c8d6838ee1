//! Registry downloads.
//!
//! One blocking GET per registry, no retries. Any transport error or
//! non-success status aborts the build with the URL that failed.

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, LAST_MODIFIED};

use crate::CliError;

pub const USER_AGENT: &str = concat!("ouimap/", env!("CARGO_PKG_VERSION"));

/// Only establishing the connection is bounded by default. The OUI export
/// is several megabytes and the registry server is often slow to stream it.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// A downloaded registry export plus the response metadata we report.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub url: String,
    pub text: String,
    pub last_modified: Option<String>,
    pub content_length: Option<u64>,
}

pub struct RegistryClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn with_base_url(base_url: &str) -> Result<Self, CliError> {
        Self::with_timeout(base_url, None)
    }

    /// `total` caps each whole request, body included. `None` leaves the
    /// download unbounded once connected.
    pub fn with_timeout(base_url: &str, total: Option<Duration>) -> Result<Self, CliError> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(total)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError::fatal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET `base_url + path` and return the body as text.
    pub fn fetch(&self, path: &str) -> Result<FetchedBody, CliError> {
        let url = self.url_for(path);
        url::Url::parse(&url)
            .map_err(|e| CliError::fatal(format!("invalid registry URL {}: {}", url, e)))?;

        tracing::debug!(%url, "requesting registry");

        let resp = self.http.get(&url).send().map_err(|e| {
            CliError::fatal(format!("error fetching {}: {}", url, e))
                .with_hint("check network access or point --base-url at a mirror")
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CliError::fatal(format!("error fetching {}: HTTP {}", url, status.as_u16())));
        }

        let last_modified = resp
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content_length = resp
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        let text = resp
            .text()
            .map_err(|e| CliError::fatal(format!("error reading {}: {}", url, e)))?;

        tracing::debug!(%url, bytes = text.len(), "registry downloaded");

        Ok(FetchedBody {
            url,
            text,
            last_modified,
            content_length,
        })
    }
}
