//! Transport fault classification and retry for issuer, verifier and
//! document requests.
//!
//! An HTTP response of any status is evidence and goes straight back to the
//! caller. Only faults that say nothing about the implementation are worth
//! another attempt: the connection could not be made, or the peer did not
//! answer in time. Every other transport error (a body cut short, a request
//! that could not be built, a redirect loop) is returned on first sight.

use std::fmt;
use std::time::Duration;

/// Maximum number of retry attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Why a request produced no HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFault {
    /// The peer did not answer within the client timeout.
    Timeout,
    /// No connection could be established (refused, DNS, TLS handshake).
    Connect,
    /// The response body could not be read to the end.
    Body,
    /// Anything else `reqwest` reports.
    Other,
}

impl TransportFault {
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else if error.is_body() || error.is_decode() {
            Self::Body
        } else {
            Self::Other
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Timeout | Self::Connect)
    }
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timed out",
            Self::Connect => "connection failed",
            Self::Body => "response body unreadable",
            Self::Other => "request failed",
        })
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt))
}

/// Send a request, retrying connect and timeout faults with exponential
/// backoff. `f` is called at most `MAX_RETRIES + 1` times.
pub(crate) async fn retry_send<F, Fut>(target: &str, f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        let error = match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => e,
        };
        let fault = TransportFault::classify(&error);
        if !fault.is_retryable() || attempt == MAX_RETRIES {
            tracing::warn!(target_url = target, %fault, attempts = attempt + 1, "giving up: {error}");
            return Err(error);
        }
        let delay = backoff(attempt);
        attempt += 1;
        tracing::warn!(
            target_url = target,
            %fault,
            attempt,
            max_retries = MAX_RETRIES,
            "retrying in {delay:?}: {error}"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(0), Duration::from_millis(200));
        assert_eq!(backoff(1), Duration::from_millis(400));
        assert_eq!(backoff(2), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn connect_faults_exhaust_all_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = retry_send("http://127.0.0.1:1/", || {
            let calls = calls.clone();
            let http = http.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                http.post("http://127.0.0.1:1/").send().await
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(TransportFault::classify(&err).is_retryable());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn slow_peer_is_classified_as_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let url = server.uri();
        let err = retry_send(&url, || http.post(&url).send()).await.unwrap_err();
        assert_eq!(TransportFault::classify(&err), TransportFault::Timeout);
        assert_eq!(server.received_requests().await.unwrap().len() as u32, MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn invalid_request_is_not_retried() {
        let calls = AtomicU32::new(0);
        let http = reqwest::Client::new();
        let err = retry_send("not a url", || {
            calls.fetch_add(1, Ordering::SeqCst);
            http.post("not a url").send()
        })
        .await
        .unwrap_err();
        assert!(!TransportFault::classify(&err).is_retryable());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn error_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let url = server.uri();
        let resp = retry_send(&url, || http.post(&url).send()).await.unwrap();
        assert_eq!(resp.status().as_u16(), 400);
    }
}
