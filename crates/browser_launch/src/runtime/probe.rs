//! Readiness probe: one bounded GET before anything is opened

use async_trait::async_trait;
use std::sync::OnceLock;
use std::time::Duration;

/// Upper bound for connecting to and hearing back from the probe endpoint
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a probe did not pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeFailure {
    #[error("health check returned status {0}")]
    Status(u16),

    #[error("health check request failed: {0}")]
    Transport(String),
}

/// Result of probing an endpoint once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No endpoint configured
    Skipped,
    /// Endpoint answered 200
    Passed,
    Failed(ProbeFailure),
}

/// Something that can check an endpoint for readiness
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, endpoint: &str) -> ProbeOutcome;
}

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Process-wide client shared by every probe, built on first use
fn http_client() -> Result<&'static reqwest::Client, reqwest::Error> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::Client::builder()
        .connect_timeout(PROBE_TIMEOUT)
        // Probes target the local host; system proxies would only get in the way
        .no_proxy()
        // A redirect is a non-200 answer, not something to follow
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    Ok(HTTP_CLIENT.get_or_init(|| client))
}

/// Probes over HTTP, no retries
#[derive(Debug, Clone)]
pub struct HttpProber {
    timeout: Duration,
}

impl Default for HttpProber {
    fn default() -> Self {
        Self {
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl HttpProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different total request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &str) -> ProbeOutcome {
        if endpoint.is_empty() {
            return ProbeOutcome::Skipped;
        }

        let client = match http_client() {
            Ok(client) => client,
            Err(e) => return ProbeOutcome::Failed(ProbeFailure::Transport(e.to_string())),
        };

        log::debug!("Probing {} (timeout {:?})", endpoint, self.timeout);
        match client.get(endpoint).timeout(self.timeout).send().await {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => ProbeOutcome::Passed,
            Ok(resp) => ProbeOutcome::Failed(ProbeFailure::Status(resp.status().as_u16())),
            Err(e) => ProbeOutcome::Failed(ProbeFailure::Transport(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_endpoint_is_skipped() {
        assert_eq!(HttpProber::new().probe("").await, ProbeOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_invalid_endpoint_fails_without_panicking() {
        let outcome = HttpProber::new().probe("not a url").await;
        assert!(matches!(
            outcome,
            ProbeOutcome::Failed(ProbeFailure::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_client_is_shared() {
        let a = http_client().unwrap() as *const reqwest::Client;
        let b = http_client().unwrap() as *const reqwest::Client;
        assert_eq!(a, b);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            ProbeFailure::Status(503).to_string(),
            "health check returned status 503"
        );
    }
}
