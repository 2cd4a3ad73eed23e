//! JSON-RPC over HTTP.
//!
//! Defines the [`Transport`] seam and provides the generic [`RpcClient`],
//! a `reqwest`-backed transport ([`ReqwestTransport`]), and a test spy
//! (`mock::MockTransport`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
mod params;
pub mod types;

pub use http_adapter::{ReqwestTransport, RpcClient, RpcMethod};
pub use params::{Callable, Param, Params};
pub use types::{CallStatus, ClientConfig};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::error::TransportError;

/// A fully built outbound request: URL, headers (auth included), and the
/// serialized JSON-RPC envelope.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// When false the request must go through a context that skips
    /// certificate and hostname verification.
    pub verify_tls: bool,
}

/// Any HTTP response, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Reason phrase sent by the server when it differs from the canonical
    /// one for `status`.
    pub reason: Option<String>,
    pub body: Vec<u8>,
}

/// Moves one request to the daemon and brings back its response.
///
/// Implementations return `Err` only when no HTTP response was received;
/// non-2xx statuses are ordinary responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
