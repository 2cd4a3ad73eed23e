use std::net::SocketAddr;
use std::sync::{Arc, Once};

use mcrpc_core::{rpc_params, ClientConfig, RpcClient, RpcError};
use serde_json::json;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::PrivatePkcs8KeyDer;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

const REPLY_BODY: &str = r#"{"result":"ok","error":null,"id":1}"#;

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mcrpc_core=debug")),
            )
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}

/// TLS config for a certificate nobody trusts: self-signed for 127.0.0.1.
fn self_signed_config() -> ServerConfig {
    let certified = rcgen::generate_simple_self_signed(vec![
        "127.0.0.1".to_owned(),
        "localhost".to_owned(),
    ])
    .expect("certificate must generate");
    let key = PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der());

    ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .expect("ring supports the default protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![certified.cert.der().clone()], key.into())
        .expect("key must match certificate")
}

/// Serve one canned JSON-RPC success per connection over HTTPS. Failed
/// handshakes are dropped silently.
async fn spawn_tls_daemon() -> SocketAddr {
    let acceptor = TlsAcceptor::from(Arc::new(self_signed_config()));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut stream) = acceptor.accept(socket).await {
                    if read_request(&mut stream).await.is_some() {
                        let reply = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{REPLY_BODY}",
                            REPLY_BODY.len()
                        );
                        let _ = stream.write_all(reply.as_bytes()).await;
                        let _ = stream.shutdown().await;
                    }
                }
            });
        }
    });

    addr
}

/// Read headers plus `Content-Length` bytes of body.
async fn read_request<S: AsyncRead + Unpin>(stream: &mut S) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return Some(buf);
            }
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn tls_client_for(addr: SocketAddr) -> RpcClient {
    init_tracing();
    RpcClient::new(
        ClientConfig::new("127.0.0.1", addr.port(), "multichainrpc", "secret").with_tls(true),
    )
    .expect("client must build")
}

#[tokio::test(flavor = "multi_thread")]
async fn untrusted_certificate_fails_when_verifying() {
    let addr = spawn_tls_daemon().await;
    let client = tls_client_for(addr);
    assert!(client.url().starts_with("https://"));

    let err = client
        .call("getinfo", rpc_params![])
        .await
        .expect_err("self-signed certificate must be rejected");
    assert!(matches!(err, RpcError::Transport(_)));
    assert_eq!(client.error_code(), 502);
    assert!(!client.error_message().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn untrusted_certificate_is_accepted_without_verification() {
    let addr = spawn_tls_daemon().await;
    let mut client = tls_client_for(addr);
    client.configure("verifyssl", false);

    let result = client
        .call("getinfo", rpc_params![])
        .await
        .expect("verification is off");
    assert_eq!(result, json!("ok"));
    assert!(client.is_success());

    client.configure("verifyssl", true);
    assert!(client.call("getinfo", rpc_params![]).await.is_err());
    assert_eq!(client.error_code(), 502);
}
