//! Minimal HTTP client with safe logging and flexible auth.
//!
//! - Request options: headers, `Auth`, timeout
//! - Every request carries its own timeout; an expired budget surfaces as
//!   [`HttpError::Timeout`] instead of hanging the caller
//! - Never logs secret values, only the auth kind
//! - No retries: every failure is handed straight back to the caller
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), inkstand_http::HttpError> {
//! let client = inkstand_http::HttpClient::new("https://api.example.com")?;
//! let resp = client
//!     .send::<()>(
//!         reqwest::Method::GET,
//!         "/v1/items",
//!         None,
//!         inkstand_http::RequestOpts::default(),
//!     )
//!     .await?;
//! let got: serde_json::Value = resp.json()?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start
//! and response status. Bodies only ever show up as truncated snippets at
//! `trace` level.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

const BODY_SNIPPET_MAX: usize = 500;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use inkstand_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// match bearer {
///     Auth::Bearer(value) => assert_eq!(value, "token"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    /// Custom header carrying a credential
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::Header { .. } => "header",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use inkstand_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_millis(5000)),
///     auth: Some(Auth::Bearer("demo")),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_millis(), 5000);
/// assert!(opts.headers.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
}

// ==============================
// Response
// ==============================

/// Status and raw body of a completed exchange.
///
/// The client does not judge the status; callers with their own envelope
/// conventions classify it themselves.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HttpError::Decode(e.to_string(), snip_body(&self.body)))
    }

    /// Body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Best-effort human readable error message from the body.
    pub fn error_message(&self) -> String {
        extract_error_message(&self.body)
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Option<Url>,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use inkstand_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let mut client = Self::detached()?;
        client.base = Some(base);
        Ok(client)
    }

    /// A client without a base; every request must name an absolute URL.
    pub fn detached() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base: None,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use inkstand_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Base URL extended by path segments, each percent-encoded as a single
    /// segment so `/`, `?` and `#` inside a value stay part of it.
    ///
    /// ```
    /// use inkstand_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// let url = client.endpoint(&["v1", "users", "a?x=1/b", "posts"])?;
    /// assert_eq!(url.path(), "/v1/users/a%3Fx=1%2Fb/posts");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, HttpError> {
        if let Some(dots) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(HttpError::Url(format!("\"{dots}\" is not a usable path segment")));
        }
        let mut url = self
            .base
            .clone()
            .ok_or_else(|| HttpError::Url("client has no base URL".into()))?;
        url.path_segments_mut()
            .map_err(|_| HttpError::Url("base URL cannot carry path segments".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a text resource (HTML pages and the like). Non-2xx is an error.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let resp = self.send::<()>(Method::GET, path, None, opts).await?;
        if !resp.status.is_success() {
            return Err(HttpError::Api {
                status: resp.status,
                message: resp.error_message(),
            });
        }
        Ok(resp.text())
    }

    /// Send one request and hand back the status and body, whatever the status.
    ///
    /// `path` is joined onto the base URL; an absolute URL replaces it.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<HttpResponse, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = match &self.base {
            Some(base) => base.join(path),
            None => Url::parse(path),
        }
        .map_err(|e| HttpError::Url(format!("{path}: {e}")))?;
        self.send_to(method, url, body, opts).await
    }

    // ==============================
    // Core request implementation
    // ==============================

    /// Like [`HttpClient::send`], for a URL that is already resolved.
    pub async fn send_to<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<HttpResponse, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let timeout_ms = timeout.as_millis() as u64;
        let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);

        // headers
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        // body (serialize ourselves so encoding failures are reported, not swallowed)
        if let Some(b) = body {
            let bytes = serde_json::to_vec(b).map_err(|e| HttpError::Build(e.to_string()))?;
            rb = rb.body(bytes);
        }

        // auth
        let auth = opts.auth.unwrap_or(Auth::None);
        match &auth {
            Auth::Bearer(tok) => {
                let tok = sanitize_api_key(tok)?;
                rb = rb.bearer_auth(tok);
            }
            Auth::Header { name, value } => {
                rb = rb.header(name, value);
            }
            Auth::None => {}
        }

        tracing::debug!(
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms,
            auth_kind=auth.kind(),
            has_body=%body.is_some(),
            "http.request.start"
        );

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb
            .send()
            .await
            .map_err(|err| classify_reqwest(err, timeout_ms))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| classify_reqwest(err, timeout_ms))?;

        tracing::debug!(
            %status,
            duration_ms=t0.elapsed().as_millis() as u64,
            body_len=bytes.len(),
            "http.response"
        );
        tracing::trace!(body_snippet=%snip_body(&bytes), "http.response.body_snippet");

        Ok(HttpResponse {
            status,
            body: bytes,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn classify_reqwest(err: reqwest::Error, timeout_ms: u64) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout { timeout_ms }
    } else {
        HttpError::Network(err.to_string())
    }
}

fn extract_error_message(body: &[u8]) -> String {
    // {"errors":[{"message":"...", "code": 123}]}
    #[derive(Deserialize)]
    struct Errors {
        errors: Vec<Msg>,
    }

    // Generic: {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    fn pick(m: Msg) -> Option<String> {
        [m.message, m.detail, m.error]
            .into_iter()
            .find(|s| !s.is_empty())
    }

    if let Ok(env) = serde_json::from_slice::<Errors>(body) {
        if let Some(msg) = env.errors.into_iter().next().and_then(pick) {
            return msg;
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if let Some(msg) = pick(m) {
            return msg;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > BODY_SNIPPET_MAX {
        let mut cut = BODY_SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    // 1) Trim outer spaces/quotes
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    // 2) Remove *all* ASCII whitespace (spaces, tabs, newlines, carriage returns)
    s.retain(|ch| !ch.is_ascii_whitespace());

    // 3) Ensure ASCII and no control chars
    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }

    // 4) Validate header value upfront for clear errors
    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
