//! Reverse-proxy rules and request forwarding.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;
use http_body_util::LengthLimitError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use swatch_core::{Error, Result};

/// Largest request body the proxy will buffer.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Hop-by-hop headers, never forwarded in either direction.
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

/// Forwards every request whose path starts with `prefix` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRule {
    /// Path prefix to match.
    pub prefix: String,
    /// Upstream base URL.
    pub target: String,
    /// Rewrite the `Host` header to the target's authority.
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,
}

fn default_change_origin() -> bool {
    true
}

impl ProxyRule {
    /// Creates a rule that rewrites the `Host` header.
    #[must_use]
    pub fn new(prefix: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
            change_origin: true,
        }
    }

    /// Sets whether the `Host` header is rewritten.
    #[must_use]
    pub fn with_change_origin(mut self, change_origin: bool) -> Self {
        self.change_origin = change_origin;
        self
    }

    /// Checks the prefix and target.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is not absolute or the target is not an
    /// http(s) URL with a host.
    pub fn validate(&self) -> Result<()> {
        if !self.prefix.starts_with('/') {
            return Err(Error::invalid_config(format!(
                "proxy prefix {:?} must start with '/'",
                self.prefix
            )));
        }
        self.target_base()?;
        Ok(())
    }

    /// Returns true if requests for `path` go to this rule's target.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Builds the upstream URL, keeping the original path and query.
    #[must_use]
    pub fn target_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.target.trim_end_matches('/'), path_and_query)
    }

    /// Returns the `Host` header to send upstream.
    ///
    /// With `change_origin` set this is the target's authority; otherwise the
    /// client's own `Host`, if it sent one.
    #[must_use]
    pub fn host_header(&self, original: Option<&str>) -> Option<String> {
        if self.change_origin {
            self.target_authority()
        } else {
            original.map(str::to_string)
        }
    }

    fn target_base(&self) -> Result<Url> {
        let url = Url::parse(&self.target).map_err(|e| {
            Error::invalid_config(format!("proxy target {:?}: {e}", self.target))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(Error::invalid_config(format!(
                "proxy target {:?} must be an http(s) URL with a host",
                self.target
            )));
        }
        Ok(url)
    }

    fn target_authority(&self) -> Option<String> {
        let url = self.target_base().ok()?;
        let host = url.host_str()?;
        Some(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}

/// Sends `request` to the rule's target and relays the answer.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if the body is over [`MAX_BODY_BYTES`]
/// and [`Error::Upstream`] if the target cannot be reached.
pub async fn forward(
    client: &reqwest::Client,
    rule: &ProxyRule,
    request: Request,
) -> Result<Response> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    let url = rule.target_url(path_and_query);

    let original_host = parts
        .headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok());
    let host = rule.host_header(original_host);

    let mut headers = strip_hop_by_hop(parts.headers.clone());
    headers.remove(header::HOST);
    if let Some(host) = host.as_deref().and_then(|h| h.parse::<HeaderValue>().ok()) {
        headers.insert(header::HOST, host);
    }

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        let inner = e.into_inner();
        if inner.is::<LengthLimitError>() {
            Error::PayloadTooLarge {
                limit: MAX_BODY_BYTES,
            }
        } else {
            Error::internal(format!("failed to read request body: {inner}"))
        }
    })?;

    tracing::debug!(method = %parts.method, url = %url, host = ?host, "Proxying request");

    let upstream = client
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| Error::upstream(&rule.target, e.to_string()))?;

    let status = upstream.status();
    let headers = strip_hop_by_hop(upstream.headers().clone());
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| Error::upstream(&rule.target, e.to_string()))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers
}
