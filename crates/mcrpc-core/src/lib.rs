//! Generic JSON-RPC client for MultiChain-style blockchain daemons.
//!
//! The client knows nothing about the remote method catalog: any method name
//! plus positional parameters is turned into one authenticated HTTP POST, and
//! every failure (local, remote, or transport) is normalized into a single
//! `(code, message)` pair.

pub mod error;
pub mod rpc;

pub use error::{RpcError, TransportError};
pub use rpc::{CallStatus, ClientConfig, Params, RpcClient};
