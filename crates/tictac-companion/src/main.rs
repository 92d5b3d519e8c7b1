//! TicTac watchface companion — entry point.
//!
//! This binary connects to the watch host process, listens for lifecycle and
//! message events, opens the remote configuration form on request, and relays
//! submitted settings back to the watch as a single key-value app message.
//!
//! # Usage
//!
//! ```text
//! tictac-companion [OPTIONS]
//!
//! Options:
//!   --watch-host <HOST>  Watch host hostname or IP [default: 127.0.0.1]
//!   --watch-port <PORT>  Watch host TCP port [default: 9000]
//!   --config-url <URL>   Remote configuration page base URL
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable             | Default                                  |
//! |----------------------|------------------------------------------|
//! | `TICTAC_WATCH_HOST`  | `127.0.0.1`                              |
//! | `TICTAC_WATCH_PORT`  | `9000`                                   |
//! | `TICTAC_CONFIG_URL`  | `https://config.tictac.example/settings` |

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use tictac_companion::domain::CompanionConfig;
use tictac_companion::infrastructure::run_companion;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// TicTac watchface companion bridge.
///
/// Listens for watch host events and relays remote configuration settings
/// back to the watch.
#[derive(Debug, Parser)]
#[command(
    name = "tictac-companion",
    about = "Companion bridge for the TicTac watchface",
    version
)]
struct Cli {
    /// Hostname or IP address of the watch host process.
    ///
    /// When the companion and the host run on the same machine, use
    /// `127.0.0.1`.
    #[arg(long, default_value = "127.0.0.1", env = "TICTAC_WATCH_HOST")]
    watch_host: String,

    /// TCP port of the watch host's developer connection.
    #[arg(long, default_value_t = 9000, env = "TICTAC_WATCH_PORT")]
    watch_port: u16,

    /// Base URL of the remote configuration page.
    ///
    /// The field schema is appended as a percent-encoded query parameter
    /// when the page is opened.
    #[arg(
        long,
        default_value = "https://config.tictac.example/settings",
        env = "TICTAC_CONFIG_URL"
    )]
    config_url: String,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`CompanionConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--watch-host` is not a valid IP address or
    /// `--config-url` is not a valid URL.
    fn into_companion_config(self) -> anyhow::Result<CompanionConfig> {
        let watch_addr: SocketAddr = format!("{}:{}", self.watch_host, self.watch_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid watch host address: '{}:{}'",
                    self.watch_host, self.watch_port
                )
            })?;

        let config_url = Url::parse(&self.config_url)
            .with_context(|| format!("invalid configuration page URL: '{}'", self.config_url))?;

        Ok(CompanionConfig {
            watch_addr,
            config_url,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `EnvFilter::try_from_default_env()` reads the `RUST_LOG` environment
    // variable.  If it is absent or invalid, fall back to `info` level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_companion_config()?;

    info!(
        "TicTac companion starting — watch host {}, config page {}",
        config.watch_addr, config.config_url
    );

    // Graceful shutdown: Ctrl+C clears the flag, and the event loop checks
    // it between events.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_companion(config, running).await?;

    info!("TicTac companion stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
