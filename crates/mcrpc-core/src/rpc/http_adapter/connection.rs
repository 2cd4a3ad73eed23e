use std::error::Error as _;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Url;

use crate::error::{RpcError, TransportError};

use super::super::types::ClientConfig;
use super::super::{HttpRequest, HttpResponse, Transport};

/// Build the daemon URL, `http(s)://host:port/`.
pub(super) fn endpoint_url(config: &ClientConfig) -> Result<String, RpcError> {
    if config.host.trim().is_empty() {
        return Err(RpcError::Config("rpc host must not be empty".to_owned()));
    }
    if config.port == 0 {
        return Err(RpcError::Config("rpc port must be non-zero".to_owned()));
    }

    let scheme = if config.use_tls { "https" } else { "http" };
    // Bare IPv6 literals need brackets before a port can follow.
    let host = if config.host.contains(':') && !config.host.starts_with('[') {
        format!("[{}]", config.host)
    } else {
        config.host.clone()
    };
    let url = format!("{scheme}://{host}:{}/", config.port);

    Url::parse(&url).map_err(|e| {
        RpcError::Config(format!(
            "invalid rpc endpoint `{url}`: expected host and port ({e})"
        ))
    })?;
    Ok(url)
}

/// `Authorization: Basic base64(user:pass)`, marked sensitive so it never
/// shows up in debug output.
pub(super) fn basic_auth_header(user: &str, password: &str) -> Result<HeaderValue, RpcError> {
    let encoded = BASE64_STANDARD.encode(format!("{user}:{password}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| RpcError::Config(format!("failed to build Authorization header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

pub(super) fn request_headers(authorization: &HeaderValue, content_length: usize) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    headers.insert(header::AUTHORIZATION, authorization.clone());
    headers
}

// ==============================================================================
// reqwest Transport
// ==============================================================================

/// Default [`Transport`]: `reqwest` over HTTP/1.1, no idle connection reuse,
/// no timeouts.
///
/// Keeps two clients because certificate verification is fixed when a
/// `reqwest::Client` is built; requests with `verify_tls == false` go
/// through the one that accepts any certificate and any hostname.
pub struct ReqwestTransport {
    verified: reqwest::Client,
    unverified: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, RpcError> {
        Ok(Self {
            verified: build_client(true)?,
            unverified: build_client(false)?,
        })
    }

    fn client_for(&self, verify_tls: bool) -> &reqwest::Client {
        if verify_tls {
            &self.verified
        } else {
            &self.unverified
        }
    }
}

fn build_client(verify_tls: bool) -> Result<reqwest::Client, RpcError> {
    reqwest::Client::builder()
        .http1_only()
        .pool_max_idle_per_host(0)
        .tcp_nodelay(true)
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(|e| RpcError::Config(format!("failed to build HTTP client: {e}")))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .client_for(request.verify_tls)
            .post(&request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| TransportError(describe_reqwest_error(&e)))?;
        let status = response.status();
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned());

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(describe_reqwest_error(&e)))?;

        Ok(HttpResponse {
            status,
            reason,
            body: body.to_vec(),
        })
    }
}

/// Flatten a `reqwest` error and its source chain into one line, so the
/// root cause (refused connection, DNS failure, bad certificate) is visible.
fn describe_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
