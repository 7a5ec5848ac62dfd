//! Request executor with retries, backoff, and redirect-safe headers.
//!
//! One logical call becomes one or more HTTP exchanges:
//! - Idempotent calls (GET, DELETE, HEAD, OPTIONS) are retried on transient
//!   transport failures and on 408, 425, 429, 500, 502, 503, 504
//! - `Retry-After` (seconds or HTTP-date) overrides the computed backoff
//! - DELETE answered with 404 or 410 succeeds with an empty body, unless a
//!   303 turned it into a GET along the way
//! - Same-origin redirects are followed by hand so the credential and
//!   default headers are present on every hop

use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER,
};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace, warn};
use uptimekit_core::redact_json;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::redirect::{MAX_REDIRECTS, is_redirect_status, next_hop, redirect_target, same_origin};
use crate::request::EndpointCall;
use crate::retry::{BackoffPolicy, JitterSource, ThreadJitter};

/// Byte budget for bodies written to trace logs.
const LOG_BODY_LIMIT: usize = 4096;

// ============================================================================
// Request Executor
// ============================================================================

/// Executes API calls against one base URL with one credential.
///
/// Immutable after construction; share it behind an `Arc` and call it from
/// as many tasks as needed. Each call keeps its own attempt state.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: Client,
    base_url: Url,
    headers: HeaderMap,
    backoff: BackoffPolicy,
    jitter: Arc<dyn JitterSource>,
}

/// What one attempt produced, after redirects and with the body read.
struct Exchange {
    /// Method of the final hop.
    method: Method,
    status: StatusCode,
    retry_after: Option<Duration>,
    body: Bytes,
}

impl RequestExecutor {
    /// Creates an executor from a validated config.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let headers = build_headers(&config)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            headers,
            backoff: config.backoff,
            jitter: Arc::new(ThreadJitter),
        })
    }

    /// Replaces the jitter source.
    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns the API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the retry policy.
    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Executes `method path` with an optional JSON body.
    ///
    /// Returns the raw response body. DELETE on an already-missing resource
    /// returns an empty body.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Bytes, ClientError> {
        let mut call = EndpointCall::new(method, path);
        if let Some(body) = body {
            call = call.json(body)?;
        }
        self.send(&call).await
    }

    /// Like [`execute`](Self::execute), decoding the response body as JSON.
    pub async fn execute_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let context = format!("{method} {path}");
        let bytes = self.execute(method, path, body).await?;
        decode(&bytes, &context)
    }

    /// Sends a call and decodes the response body as JSON.
    pub async fn send_json<T: DeserializeOwned>(&self, call: &EndpointCall) -> Result<T, ClientError> {
        let body = self.send(call).await?;
        decode(&body, &format!("{} {}", call.method, call.path))
    }

    /// Sends a call with retries.
    #[instrument(skip(self, call), fields(method = %call.method, path = %call.path))]
    pub async fn send(&self, call: &EndpointCall) -> Result<Bytes, ClientError> {
        let url = self.url_for(&call.path)?;
        let idempotent = call.is_idempotent();
        let max_attempts = self.backoff.max_attempts.max(1);

        if let Some(body) = call.payload.json_bytes() {
            trace!(body = %redact_json(body, LOG_BODY_LIMIT), "Request body");
        }

        let mut attempt: u32 = 0;
        loop {
            let has_more = attempt + 1 < max_attempts;
            debug!(attempt = attempt + 1, max_attempts, %url, "Sending request");

            let exchange = match self.exchange(call, &url).await {
                Ok(exchange) => exchange,
                Err(err) => {
                    if !(idempotent && is_transient(&err)) {
                        return Err(err);
                    }
                    if !has_more {
                        return Err(ClientError::RetriesExhausted {
                            attempts: attempt + 1,
                            source: Box::new(err),
                        });
                    }
                    let delay = self.backoff.delay_for_attempt(attempt, self.jitter.as_ref());
                    warn!(
                        error = %err,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Transport failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
            };

            let status = exchange.status;
            debug!(status = status.as_u16(), bytes = exchange.body.len(), "Response received");
            trace!(body = %redact_json(&exchange.body, LOG_BODY_LIMIT), "Response body");

            if exchange.method == Method::DELETE
                && matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE)
            {
                debug!(status = status.as_u16(), "Resource already gone, treating DELETE as success");
                return Ok(Bytes::new());
            }

            if status.is_success() {
                return Ok(exchange.body);
            }

            let err = ClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&exchange.body).into_owned(),
            };

            if !(idempotent && is_retryable_status(status)) {
                return Err(err);
            }
            if !has_more {
                return Err(ClientError::RetriesExhausted {
                    attempts: attempt + 1,
                    source: Box::new(err),
                });
            }

            let delay = exchange
                .retry_after
                .unwrap_or_else(|| self.backoff.delay_for_attempt(attempt, self.jitter.as_ref()));
            warn!(
                status = status.as_u16(),
                attempt = attempt + 1,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                retry_after = exchange.retry_after.is_some(),
                "Retryable status, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Joins a relative path onto the base URL, keeping the base path.
    fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let joined = if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        };
        Url::parse(&joined).map_err(|e| ClientError::InvalidRequest(format!("path {path:?}: {e}")))
    }

    /// One attempt: send, follow same-origin redirects, read the body.
    async fn exchange(&self, call: &EndpointCall, url: &Url) -> Result<Exchange, ClientError> {
        let (method, response) = self.follow_redirects(call, url).await?;
        let status = response.status();
        let retry_after = parse_retry_after(response.headers(), SystemTime::now());

        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                method: method.to_string(),
                source,
            })?;

        Ok(Exchange {
            method,
            status,
            retry_after,
            body,
        })
    }

    /// Returns the final response together with the method that produced it.
    async fn follow_redirects(
        &self,
        call: &EndpointCall,
        url: &Url,
    ) -> Result<(Method, Response), ClientError> {
        let mut method = call.method.clone();
        let mut target = url.clone();
        let mut with_body = true;

        for _ in 0..=MAX_REDIRECTS {
            // Headers go on each hop explicitly; the transport never carries them over
            let mut request = self
                .http
                .request(method.clone(), target.clone())
                .headers(self.headers.clone());
            if with_body {
                request = call.payload.apply(request)?;
            }

            let response = request.send().await.map_err(|source| ClientError::Transport {
                method: method.to_string(),
                source,
            })?;

            let status = response.status();
            if !is_redirect_status(status) {
                return Ok((method, response));
            }
            let Some(next) = redirect_target(&target, response.headers()) else {
                return Ok((method, response));
            };
            if !same_origin(&target, &next) {
                return Err(ClientError::CrossOriginRedirect {
                    location: next.to_string(),
                });
            }

            debug!(status = status.as_u16(), to = %next, "Following redirect");
            let (next_method, keep_body) = next_hop(&method, status);
            method = next_method;
            with_body = with_body && keep_body;
            target = next;
        }

        Err(ClientError::TooManyRedirects(MAX_REDIRECTS))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Accept, bearer credential, then the configured defaults in order.
fn build_headers(config: &ClientConfig) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key())).map_err(|_| {
        ClientError::InvalidConfig("API key contains characters not allowed in a header".to_string())
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    for (name, value) in &config.default_headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidConfig(format!("header name {name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidConfig(format!("header {name:?} value: {e}")))?;
        headers.append(header_name, header_value);
    }

    Ok(headers)
}

/// Decodes a JSON body, naming what was being decoded on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8], context: &str) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode {
        context: context.to_string(),
        source,
    })
}

/// Statuses worth retrying for idempotent calls.
pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 425 | 429 | 500 | 502 | 503 | 504)
}

/// Returns true for local transport failures that may succeed on retry.
fn is_transient(err: &ClientError) -> bool {
    let ClientError::Transport { source, .. } = err else {
        return false;
    };

    if source.is_timeout() || source.is_connect() || source.is_body() {
        return true;
    }

    let mut cause = source.source();
    while let Some(current) = cause {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            if is_transient_io(io_err.kind()) {
                return true;
            }
        }
        // A connection dropped before the response carries no io::Error
        if current
            .downcast_ref::<hyper::Error>()
            .is_some_and(hyper::Error::is_incomplete_message)
        {
            return true;
        }
        cause = current.source();
    }
    false
}

fn is_transient_io(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::TimedOut
    )
}

/// Parses `Retry-After` as delay-seconds or an HTTP-date relative to `now`.
///
/// All three HTTP-date forms are accepted (IMF-fixdate, RFC 850, asctime).
/// Zero, negative, and past values yield `None` so the caller falls back to
/// its own backoff.
pub(crate) fn parse_retry_after(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = raw.parse::<i64>() {
        return u64::try_from(seconds)
            .ok()
            .filter(|s| *s > 0)
            .map(Duration::from_secs);
    }

    let date = httpdate::parse_http_date(raw).ok()?;
    date.duration_since(now).ok().filter(|delay| !delay.is_zero())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 2015-10-21 07:28:00 UTC.
    const RETRY_AT: u64 = 1_445_412_480;

    fn at(unix_secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(unix_secs)
    }

    fn headers_with_retry_after(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
        headers
    }

    fn executor(base: &str) -> RequestExecutor {
        let config = ClientConfig::builder().base_url(base).api_key("k").build().unwrap();
        RequestExecutor::new(config).unwrap()
    }

    #[test]
    fn test_retry_after_seconds() {
        let now = SystemTime::now();
        assert_eq!(
            parse_retry_after(&headers_with_retry_after("2"), now),
            Some(Duration::from_secs(2))
        );
        assert_eq!(parse_retry_after(&headers_with_retry_after("0"), now), None);
        assert_eq!(parse_retry_after(&headers_with_retry_after("-5"), now), None);
        assert_eq!(parse_retry_after(&headers_with_retry_after("soon"), now), None);
        assert_eq!(parse_retry_after(&HeaderMap::new(), now), None);
    }

    #[test]
    fn test_retry_after_http_date() {
        let headers = headers_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(
            parse_retry_after(&headers, at(RETRY_AT - 10)),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_retry_after_obsolete_date_forms() {
        for value in ["Wednesday, 21-Oct-15 07:28:00 GMT", "Wed Oct 21 07:28:00 2015"] {
            assert_eq!(
                parse_retry_after(&headers_with_retry_after(value), at(RETRY_AT - 3)),
                Some(Duration::from_secs(3)),
                "{value}"
            );
        }
    }

    #[test]
    fn test_retry_after_past_date_ignored() {
        let headers = headers_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(&headers, at(RETRY_AT + 1920)), None);
        assert_eq!(parse_retry_after(&headers, at(RETRY_AT)), None);
    }

    #[test]
    fn test_retryable_statuses() {
        for code in [408, 425, 429, 500, 502, 503, 504] {
            assert!(is_retryable_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }
        for code in [400, 401, 403, 404, 409, 422, 501] {
            assert!(!is_retryable_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let exec = executor("https://api.example.com/v3");
        assert_eq!(
            exec.url_for("/monitors/12").unwrap().as_str(),
            "https://api.example.com/v3/monitors/12"
        );

        let exec = executor("https://api.example.com/v3/");
        assert_eq!(
            exec.url_for("monitors").unwrap().as_str(),
            "https://api.example.com/v3/monitors"
        );
    }

    #[test]
    fn test_headers_include_credential_and_defaults() {
        let config = ClientConfig::builder()
            .api_key("secret-key")
            .header("X-Integration", "terraform")
            .build()
            .unwrap();
        let headers = build_headers(&config).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret-key");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get("x-integration").unwrap(), "terraform");
        assert!(headers.get("user-agent").is_some());
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config = ClientConfig::builder()
            .api_key("k")
            .header("bad header", "v")
            .build()
            .unwrap();
        assert!(RequestExecutor::new(config).is_err());
    }
}
