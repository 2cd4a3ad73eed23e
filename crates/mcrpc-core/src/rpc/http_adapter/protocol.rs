use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{RpcError, LOCAL_ERROR_CODE};

/// Prepended to remote `-1` errors whose message embeds usage text after a
/// blank line.
pub(super) const USAGE_PREFIX: &str = "Wrong parameters. Usage:\n\n";

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) id: i64,
    pub(super) method: &'a str,
    pub(super) params: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) chain_name: Option<&'a str>,
}

#[derive(Deserialize)]
struct JsonRpcErrorResponse {
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// Overrides the HTTP status only when both fields are present and
/// well-typed; a partial object leaves the status code and reason in place.
#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Extract `result` from a 2xx body. Key order inside the result is kept.
pub(super) fn decode_success_body(body: &[u8]) -> Result<Value, RpcError> {
    let decoded: Value = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, body_len = body.len(), "undecodable JSON-RPC response");
        RpcError::InvalidResponse
    })?;
    // `"result": null` is a valid result; only a missing key is an error.
    let Value::Object(mut fields) = decoded else {
        debug!(body_len = body.len(), "JSON-RPC response is not an object");
        return Err(RpcError::InvalidResponse);
    };
    fields.remove("result").ok_or_else(|| {
        debug!(body_len = body.len(), "JSON-RPC response has no result field");
        RpcError::InvalidResponse
    })
}

/// Normalize a non-2xx response into a `Server` error.
///
/// Status code and reason phrase are the fallback; a well-formed
/// `{"error": {"code", "message"}}` body overrides both. The reason is the
/// one received, then the canonical one, then `HTTP <code>`, so the message
/// is never empty.
pub(super) fn normalize_http_error(
    status: StatusCode,
    reason: Option<&str>,
    body: &[u8],
) -> RpcError {
    let mut code = i64::from(status.as_u16());
    let mut message = reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .or_else(|| status.canonical_reason())
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned);

    match serde_json::from_slice::<JsonRpcErrorResponse>(body) {
        Ok(JsonRpcErrorResponse { error: Some(err) }) => {
            code = err.code;
            message = err.message;
            if code == LOCAL_ERROR_CODE && message.contains("\n\n") {
                message.insert_str(0, USAGE_PREFIX);
            }
        }
        Ok(JsonRpcErrorResponse { error: None }) => {}
        Err(e) if !body.is_empty() => {
            debug!(%status, error = %e, "error response body is not a JSON-RPC error");
        }
        Err(_) => {}
    }

    RpcError::Server { code, message }
}
