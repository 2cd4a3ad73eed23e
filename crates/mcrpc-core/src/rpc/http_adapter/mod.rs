//! JSON-RPC client for MultiChain-style endpoints.
//!
//! Turns a method name and positional parameters into a single
//! authenticated POST, and folds local, remote, and transport failures into
//! one `(code, message)` status. The default transport is `reqwest` over
//! HTTP(S) with per-request connections.

mod client;
mod connection;
mod protocol;

pub use client::{RpcClient, RpcMethod};
pub use connection::ReqwestTransport;
