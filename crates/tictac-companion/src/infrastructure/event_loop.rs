//! The companion event loop: connection lifecycle and one-at-a-time dispatch.
//!
//! This is where the bridge's explicit lifecycle lives: the loop connects to
//! the host, constructs the [`EventBridge`] with its collaborators, feeds it
//! events until the host hangs up or shutdown is requested, and then tears
//! everything down by returning.
//!
//! # Dispatch model
//!
//! Events are consumed from a single mpsc receiver and each handler is
//! awaited to completion before the next event is taken, so handlers run
//! strictly one at a time — no preemption, no reentrancy, no shared mutable
//! state between invocations.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::info;

use tictac_core::FieldSchema;

use crate::application::EventBridge;
use crate::domain::config::CompanionConfig;
use crate::infrastructure::host_conn::{read_host_events, HostConnection, TcpOutboundChannel};
use crate::infrastructure::weather::WeatherService;

/// Runs one companion session until the host disconnects or `running` is
/// cleared.
///
/// # Errors
///
/// Returns an error if the host connection cannot be established.  A session
/// that ends because the host hung up is a normal return, not an error —
/// there is no reconnect logic, so the caller decides whether to restart.
pub async fn run_companion(
    config: CompanionConfig,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let conn = HostConnection::connect(config.watch_addr).await?;
    info!("connected to watch host at {}", config.watch_addr);

    // The reader task owns the read half and feeds this channel; the loop
    // below is the single consumer.
    let (tx, mut rx) = mpsc::channel(32);
    tokio::spawn(read_host_events(conn.read_half, tx));

    let bridge = EventBridge::new(
        FieldSchema::watchface_config(),
        config.config_url.clone(),
        Arc::new(WeatherService),
        Arc::new(TcpOutboundChannel::new(conn.write_half)),
    );

    loop {
        // Check the shutdown flag between events.
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping event loop");
            break;
        }

        // Use a short timeout on `recv()` so the loop can periodically check
        // the `running` flag even when the host is quiet.
        match timeout(Duration::from_millis(200), rx.recv()).await {
            Ok(Some(event)) => bridge.handle_event(event).await,
            Ok(None) => {
                info!("host event stream ended");
                break;
            }
            Err(_) => {
                // Timeout — no event in the last 200 ms.  Loop back to check
                // the `running` flag.
            }
        }
    }

    Ok(())
}
