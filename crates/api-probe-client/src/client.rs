// api-probe-client/src/client.rs
// ============================================================================
// Module: Probe Client
// Description: Single-request HTTP dispatch with configured deadlines.
// Purpose: Apply connect/read timeouts and size caps to outbound probes.
// Dependencies: api-probe-config, reqwest, url
// ============================================================================

//! ## Overview
//! [`ProbeClient`] owns one `reqwest` blocking client configured from the
//! immutable execution settings. Each [`ProbeClient::probe`] call dispatches
//! a single GET against the configured origin and returns a [`ProbeReport`].
//! Redirects are not followed; a redirect answer surfaces as its 3xx status.
//! Non-success statuses are reported, not raised as errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;
use std::time::Instant;

use api_probe_config::ExecutionConfig;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response size read from a probed endpoint, in bytes.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Maximum length of a probe path in bytes.
const MAX_PATH_LENGTH: usize = 2_048;
/// User agent string for outbound probes.
const USER_AGENT: &str = "api-probe/0.1";

// ============================================================================
// SECTION: Probe Client
// ============================================================================

/// HTTP dispatcher bound to one resolved [`ExecutionConfig`].
#[derive(Debug, Clone)]
pub struct ProbeClient {
    /// Resolved execution settings for this run.
    config: ExecutionConfig,
    /// HTTP client used for outbound probes.
    client: Client,
}

impl ProbeClient {
    /// Builds a probe client with the configured connect and read deadlines.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the HTTP client cannot be constructed.
    pub fn new(config: &ExecutionConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ProbeError::Client(err.to_string()))?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Returns the execution settings this client was built from.
    #[must_use]
    pub const fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Dispatches one GET probe for `path` under the configured origin.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the target is malformed, the transport
    /// fails (connect, read, or timeout), or the response exceeds
    /// [`MAX_RESPONSE_BYTES`].
    pub fn probe(&self, path: &str) -> Result<ProbeReport, ProbeError> {
        let url = join_target(self.config.base_url(), path)?;
        let started = Instant::now();
        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|err| ProbeError::Http(err.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let mut limited = response.take((MAX_RESPONSE_BYTES + 1) as u64);
        let mut body = Vec::new();
        limited.read_to_end(&mut body).map_err(|err| ProbeError::Http(err.to_string()))?;
        let elapsed = started.elapsed();
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(ProbeError::TooLarge {
                max_bytes: MAX_RESPONSE_BYTES,
                actual_bytes: body.len(),
            });
        }
        Ok(ProbeReport {
            status,
            elapsed,
            body_bytes: body.len(),
            content_type,
        })
    }
}

// ============================================================================
// SECTION: Probe Report
// ============================================================================

/// Outcome of one dispatched probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// HTTP status code returned by the target.
    pub status: u16,
    /// Wall-clock time from dispatch to body completion.
    pub elapsed: Duration,
    /// Number of body bytes read.
    pub body_bytes: usize,
    /// Content type reported by the target, when present.
    pub content_type: Option<String>,
}

impl ProbeReport {
    /// Returns true when the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the elapsed time in whole milliseconds, saturating.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors produced while constructing the client or dispatching a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP client construction failed.
    #[error("client build failure: {0}")]
    Client(String),
    /// Probe target could not be formed from the base URL and path.
    #[error("invalid probe target: {0}")]
    InvalidTarget(String),
    /// Transport-level HTTP failure (connect, read, or timeout).
    #[error("http failure: {0}")]
    Http(String),
    /// Response exceeded the size cap.
    #[error("response exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual response size in bytes.
        actual_bytes: usize,
    },
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Joins a probe path onto the base URL, preserving any base path prefix.
///
/// Plain concatenation is used instead of `Url::join` so that a base of
/// `https://host/v1` keeps its `/v1` prefix for every probe path.
fn join_target(base_url: &str, path: &str) -> Result<Url, ProbeError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(ProbeError::InvalidTarget("path exceeds max length".to_string()));
    }
    if path.contains("://") {
        return Err(ProbeError::InvalidTarget("path must be relative".to_string()));
    }
    if path.chars().any(|ch| ch.is_control() || ch.is_whitespace()) {
        return Err(ProbeError::InvalidTarget(
            "path must not contain whitespace or control characters".to_string(),
        ));
    }
    let joined =
        format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|err| ProbeError::InvalidTarget(err.to_string()))
}
