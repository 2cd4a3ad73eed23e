/// Code reported for failures detected locally: callable arguments,
/// serialization errors, and undecodable responses.
pub const LOCAL_ERROR_CODE: i64 = -1;

/// Code reported when no HTTP response was obtained at all.
pub const TRANSPORT_ERROR_CODE: i64 = 502;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Function passed as argument where data expected")]
    CallableArgument,

    #[error("JSON serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid JSON response")]
    InvalidResponse,

    #[error("RPC error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("RPC transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl RpcError {
    /// Numeric code this error is reported under in the last-call register.
    pub fn code(&self) -> i64 {
        match self {
            Self::Server { code, .. } => *code,
            Self::Transport(_) => TRANSPORT_ERROR_CODE,
            Self::CallableArgument | Self::Serialize(_) | Self::InvalidResponse | Self::Config(_) => {
                LOCAL_ERROR_CODE
            }
        }
    }

    /// Message this error is reported under in the last-call register.
    ///
    /// Unlike `Display`, remote and transport messages are returned verbatim.
    pub fn message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::Transport(err) => err.0.clone(),
            other => other.to_string(),
        }
    }
}

/// Failure to obtain any HTTP response: DNS, connect, TLS handshake, or a
/// connection dropped mid-transfer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);
