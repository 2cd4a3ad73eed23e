use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::header::HeaderValue;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::RpcError;

use super::super::params::Params;
use super::super::types::{CallStatus, ClientConfig};
use super::super::{HttpRequest, Transport};
use super::connection::{basic_auth_header, endpoint_url, request_headers, ReqwestTransport};
use super::protocol::{decode_success_body, normalize_http_error, JsonRpcRequest};

/// Generic JSON-RPC client for a MultiChain-style daemon.
///
/// Any method name is accepted and forwarded as-is; the client has no
/// knowledge of the remote catalog. Each call returns its own
/// `Result<Value, RpcError>` and also records the outcome in a last-call
/// register readable through [`error_code`](Self::error_code),
/// [`error_message`](Self::error_message) and
/// [`is_success`](Self::is_success).
///
/// The register is per instance: when one client is shared between tasks,
/// a call may overwrite another call's status before it is read. Rely on
/// the returned `Result` in that case.
pub struct RpcClient {
    config: ClientConfig,
    url: String,
    authorization: HeaderValue,
    transport: Arc<dyn Transport>,
    status: Mutex<CallStatus>,
}

impl RpcClient {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self, RpcError> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, RpcError> {
        let url = endpoint_url(&config)?;
        let authorization = basic_auth_header(&config.username, &config.password)?;
        Ok(Self {
            config,
            url,
            authorization,
            transport,
            status: Mutex::new(CallStatus::default()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set a named option.
    ///
    /// - `chainname`: chain name embedded in future requests. A string is
    ///   used as-is, `null` clears it, any other value is used as JSON text.
    /// - `verifyssl`: certificate and hostname verification for future
    ///   requests, read with JSON truthiness.
    ///
    /// Any other name is ignored.
    pub fn configure(&mut self, option: &str, value: impl Into<Value>) {
        let value = value.into();
        match option {
            "chainname" => {
                let chain_name = match value {
                    Value::Null => None,
                    Value::String(name) => Some(name),
                    other => Some(other.to_string()),
                };
                self.set_chain_name(chain_name);
            }
            "verifyssl" => self.set_verify_tls(is_truthy(&value)),
            _ => debug!(option, "ignoring unknown client option"),
        }
    }

    pub fn set_chain_name(&mut self, chain_name: Option<String>) {
        self.config.chain_name = chain_name;
    }

    pub fn set_verify_tls(&mut self, verify_tls: bool) {
        self.config.verify_tls = verify_tls;
    }

    /// A handle that invokes one remote method by name.
    pub fn method(&self, name: impl Into<String>) -> RpcMethod<'_> {
        RpcMethod {
            client: self,
            name: name.into(),
        }
    }

    /// Invoke `method` on the daemon with positional `params`.
    ///
    /// The outcome is returned and also stored as the last-call status.
    pub async fn call(&self, method: &str, params: Params) -> Result<Value, RpcError> {
        let outcome = self.dispatch(method, params).await;
        if let Err(err) = &outcome {
            debug!(
                rpc.method = method,
                code = err.code(),
                error = %err,
                "rpc call failed"
            );
        }
        self.record(CallStatus::from_outcome(&outcome));
        outcome
    }

    async fn dispatch(&self, method: &str, params: Params) -> Result<Value, RpcError> {
        let params = params.into_values()?;
        let id = request_id();
        let req = JsonRpcRequest {
            id,
            method,
            params: &params,
            chain_name: self.config.effective_chain_name(),
        };
        let payload = serde_json::to_vec(&req).map_err(RpcError::Serialize)?;
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );

        let request = HttpRequest {
            url: self.url.clone(),
            headers: request_headers(&self.authorization, payload.len()),
            body: payload,
            verify_tls: self.config.verify_tls,
        };
        let response = self.transport.post(request).await?;

        let status = response.status;
        debug!(rpc.id = id, rpc.method = method, %status, body_len = response.body.len(), "rpc response");
        trace!(
            rpc.id = id,
            rpc.method = method,
            body = %String::from_utf8_lossy(&response.body),
            "rpc response body"
        );

        if status.is_success() {
            decode_success_body(&response.body)
        } else {
            Err(normalize_http_error(
                status,
                response.reason.as_deref(),
                &response.body,
            ))
        }
    }

    fn record(&self, status: CallStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Snapshot of the last-call register.
    pub fn last_status(&self) -> CallStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Code of the last call: 0 on success.
    pub fn error_code(&self) -> i64 {
        self.last_status().code
    }

    /// Message of the last call: empty on success.
    pub fn error_message(&self) -> String {
        self.last_status().message
    }

    pub fn is_success(&self) -> bool {
        self.last_status().is_success()
    }
}

/// A remote method bound to a client, e.g. `client.method("liststreams")`.
pub struct RpcMethod<'a> {
    client: &'a RpcClient,
    name: String,
}

impl RpcMethod<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn call(&self, params: Params) -> Result<Value, RpcError> {
        self.client.call(&self.name, params).await
    }
}

fn request_id() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(1)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
