use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "rs-paperstream",
    about = "websocket client for simulated paper-trading feeds with tui-ready output",
    version
)]
pub struct Args {
    /// WebSocket base URL of the trading backend. Falls back to a local
    /// dev server when neither the flag nor PAPERSTREAM_WS_URL is set.
    #[arg(short, long, env = "PAPERSTREAM_WS_URL", default_value = "ws://127.0.0.1:8000")]
    pub url: String,

    /// Stream path appended to the base URL
    #[arg(long, default_value = "/ws/paper-stream")]
    pub path: String,

    /// Bearer token forwarded as a query parameter for authenticated streams
    #[arg(long)]
    pub token: Option<String>,

    /// Number of trades retained in the rolling display buffer
    #[arg(long, default_value = "30")]
    pub buffer_cap: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Output logs in JSON format
    #[arg(long)]
    pub json_logs: bool,

    /// Enable metrics server
    #[arg(long)]
    pub metrics: bool,

    /// Metrics server port
    #[arg(long, default_value = "9090")]
    pub metrics_port: u16,

    /// Base reconnection delay in milliseconds (doubles per attempt)
    #[arg(long, default_value = "500")]
    pub reconnect_delay_ms: u64,

    /// Ceiling for the backoff delay in milliseconds
    #[arg(long, default_value = "30000")]
    pub max_reconnect_delay_ms: u64,

    /// Maximum consecutive reconnection attempts before giving up (0 for unlimited)
    #[arg(long, default_value = "10")]
    pub max_reconnects: u32,

    /// Output format: table, csv, json, minimal
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Disable colored output (useful for piping to files)
    #[arg(long)]
    pub no_color: bool,

    /// Quiet mode - minimal output for TUI integration
    #[arg(long)]
    pub quiet: bool,

    /// Stop after this many trades (0 for unlimited)
    #[arg(long, default_value = "0")]
    pub max_trades: u64,
}
