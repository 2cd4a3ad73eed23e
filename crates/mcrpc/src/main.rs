mod cli;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::Value;

use mcrpc_core::rpc::{Params, RpcClient};
use mcrpc_core::ClientConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = ClientConfig::new(&args.host, args.port, &args.user, &args.pass)
        .with_tls(args.tls)
        .with_chain_name(args.chain_name.clone())
        .with_verify_tls(!args.no_verify_ssl);
    let client = RpcClient::new(config).context("build RPC client")?;

    if args.no_verify_ssl {
        tracing::warn!("TLS certificate verification is disabled");
    }

    let params: Params = args
        .params
        .iter()
        .map(String::as_str)
        .map(parse_param)
        .collect();
    tracing::debug!(
        method = %args.method,
        params = params.len(),
        url = client.url(),
        "calling daemon"
    );

    match client.call(&args.method, params).await {
        Ok(result) => {
            let rendered =
                serde_json::to_string_pretty(&result).context("render result as JSON")?;
            println!("{rendered}");
            Ok(())
        }
        Err(_) => {
            let message =
                format_call_error(client.url(), client.error_code(), &client.error_message());
            Err(eyre!(message)).wrap_err_with(|| format!("`{}` failed", args.method))
        }
    }
}

/// Command-line parameters are JSON when they parse as JSON, plain strings
/// otherwise, so `getblock 12` sends a number and `liststreamitems s1` a string.
fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn format_call_error(url: &str, code: i64, message: &str) -> String {
    let mut lines = vec![format!("error code {code}: {message}")];

    match code {
        502 => lines.push(format!(
            "hint: no response from `{url}`; verify host, port, TLS setting, and that the daemon is running"
        )),
        401 | 403 => lines.push(
            "hint: authentication failed; verify --user/--pass match the daemon's rpcuser/rpcpassword"
                .into(),
        ),
        _ => {}
    }

    lines.join("\n")
}
