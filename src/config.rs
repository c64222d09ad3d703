/// file: src/config.rs
/// description: explicit runtime configuration assembled from CLI arguments
use crate::cli::Args;
use anyhow::Result;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub stream: StreamConfig,
    pub buffer: BufferConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Fully resolved stream endpoint (base + path, token applied).
    pub endpoint: Url,
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
    pub max_reconnects: u32,
}

#[derive(Debug, Clone)]
pub struct BufferConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub quiet: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let endpoint = resolve_endpoint(&args.url, &args.path, args.token.as_deref())?;

        Ok(Config {
            stream: StreamConfig {
                endpoint,
                reconnect_delay: Duration::from_millis(args.reconnect_delay_ms),
                max_reconnect_delay: Duration::from_millis(args.max_reconnect_delay_ms),
                max_reconnects: args.max_reconnects,
            },
            buffer: BufferConfig {
                capacity: args.buffer_cap,
            },
            metrics: MetricsConfig {
                enabled: args.metrics,
                port: args.metrics_port,
            },
            logging: LoggingConfig { quiet: args.quiet },
        })
    }
}

/// Join the configured base URL with the stream path and optional auth token.
pub fn resolve_endpoint(base: &str, path: &str, token: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(base)?.join(path)?;
    if let Some(token) = token {
        url.query_pairs_mut().append_pair("token", token);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        let url = resolve_endpoint("ws://127.0.0.1:8000", "/ws/paper-stream", None).unwrap();
        assert_eq!(url.as_str(), "ws://127.0.0.1:8000/ws/paper-stream");
    }

    #[test]
    fn appends_token_query_parameter() {
        let url =
            resolve_endpoint("wss://api.example.com", "/ws/paper-stream", Some("abc123")).unwrap();
        assert_eq!(
            url.as_str(),
            "wss://api.example.com/ws/paper-stream?token=abc123"
        );
    }

    #[test]
    fn rejects_an_unparseable_base() {
        assert!(resolve_endpoint("not a url", "/ws/paper-stream", None).is_err());
    }
}
