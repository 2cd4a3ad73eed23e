//! Client configuration and the last-call status register.

use std::fmt;

use serde_json::Value;

use crate::error::RpcError;

// ==============================================================================
// Client Configuration
// ==============================================================================

/// Connection settings for one daemon endpoint.
///
/// `chain_name` and `verify_tls` may change after the client is built
/// (see `RpcClient::configure`); everything else is fixed at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub chain_name: Option<String>,
    pub verify_tls: bool,
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            use_tls: false,
            chain_name: None,
            verify_tls: true,
        }
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn with_chain_name(mut self, chain_name: Option<String>) -> Self {
        self.chain_name = chain_name;
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// The chain name to embed in requests, if any. Empty names count as unset.
    pub fn effective_chain_name(&self) -> Option<&str> {
        self.chain_name.as_deref().filter(|name| !name.is_empty())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .field("chain_name", &self.chain_name)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

// ==============================================================================
// Last-Call Status
// ==============================================================================

/// Outcome of the most recent call: `(0, "")` after a success, the
/// normalized error code and message otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStatus {
    pub code: i64,
    pub message: String,
}

impl CallStatus {
    pub fn from_outcome(outcome: &Result<Value, RpcError>) -> Self {
        match outcome {
            Ok(_) => Self::default(),
            Err(err) => Self {
                code: err.code(),
                message: err.message(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}
