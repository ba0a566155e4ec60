use crate::config::LogConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "FFCSD_LOG";

/// Logs go to stderr; stdout carries IPC responses only.
pub fn init_logging(cfg: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&cfg.filter));

    let registry = tracing_subscriber::registry().with(filter);
    let res = if cfg.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(false)
                    .compact(),
            )
            .try_init()
    };
    res.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
