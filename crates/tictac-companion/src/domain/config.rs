//! Companion configuration types.
//!
//! [`CompanionConfig`] is the single source of truth for all runtime
//! settings.  It is populated from CLI arguments (see `main.rs`) or from
//! defaults suitable for local development and tests; no environment reads
//! happen inside the domain.

use std::net::SocketAddr;

use url::Url;

/// All runtime configuration for the companion bridge.
#[derive(Debug, Clone)]
pub struct CompanionConfig {
    /// TCP address of the host process that owns the watch link.
    ///
    /// The host's developer connection listens on port 9000 by default, so
    /// a companion running on the same machine needs no configuration.
    pub watch_addr: SocketAddr,

    /// Base URL of the remote configuration page.
    ///
    /// The field schema is appended as a percent-encoded query parameter
    /// when the page is opened; the page itself is rendered by an external
    /// collaborator.
    pub config_url: Url,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            // The `.parse().unwrap()` calls here are safe because these are
            // compile-time-known valid address and URL strings.
            watch_addr: "127.0.0.1:9000".parse().unwrap(),
            config_url: Url::parse("https://config.tictac.example/settings").unwrap(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
