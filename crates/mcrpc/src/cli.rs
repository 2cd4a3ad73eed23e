use clap::Parser;

/// mcrpc — call any JSON-RPC method on a MultiChain-style daemon.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Daemon RPC host.
    #[arg(long, default_value = "127.0.0.1", env = "MCRPC_HOST")]
    pub host: String,

    /// Daemon RPC port.
    #[arg(long, env = "MCRPC_PORT")]
    pub port: u16,

    /// RPC username.
    #[arg(long, env = "MCRPC_USER")]
    pub user: String,

    /// RPC password.
    #[arg(long, env = "MCRPC_PASS", hide_env_values = true)]
    pub pass: String,

    /// Connect over HTTPS.
    #[arg(long, env = "MCRPC_TLS")]
    pub tls: bool,

    /// Chain name embedded in every request (multi-chain daemons).
    #[arg(long, env = "MCRPC_CHAIN_NAME")]
    pub chain_name: Option<String>,

    /// Skip TLS certificate and hostname verification.
    #[arg(long, env = "MCRPC_NO_VERIFY_SSL")]
    pub no_verify_ssl: bool,

    /// Remote method name, passed through verbatim.
    pub method: String,

    /// Positional parameters. Each is parsed as JSON, or sent as a string
    /// when it is not valid JSON.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub params: Vec<String>,
}
