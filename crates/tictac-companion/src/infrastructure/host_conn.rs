//! TCP connection management for the watch host process.
//!
//! The companion opens one TCP connection to the host and keeps it for the
//! whole session.  The wire format is newline-delimited JSON in both
//! directions: each line is one serde-tagged message (see
//! [`crate::domain::messages`]).
//!
//! Line framing makes the read side forgiving: a malformed line is logged and
//! skipped rather than poisoning the stream, because the next `\n` always
//! resynchronizes.  Only EOF or a socket error ends the session.

use std::net::SocketAddr;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::{OutboundChannel, SendError};
use crate::domain::messages::{CompanionToHostMsg, HostToCompanionMsg};

/// A wrapper around the TCP connection to the watch host.
///
/// The read and write halves are split so the reader task and the outbound
/// channel can own them independently.
pub struct HostConnection {
    /// Read half of the host TCP stream.
    pub read_half: OwnedReadHalf,
    /// Write half of the host TCP stream.
    pub write_half: OwnedWriteHalf,
}

impl HostConnection {
    /// Opens a new TCP connection to the watch host at `host_addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection cannot be established (e.g.,
    /// the host process is not running or a firewall blocks the port).
    pub async fn connect(host_addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(host_addr)
            .await
            .with_context(|| format!("failed to connect to watch host at {host_addr}"))?;

        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            read_half,
            write_half,
        })
    }
}

// ── Host event reader ─────────────────────────────────────────────────────────

/// Reads host events from the TCP stream and forwards them on `tx`.
///
/// Runs until the host closes the connection (EOF), the socket errors, or
/// the receiving side of `tx` is dropped.  Blank lines and lines that do not
/// parse as a [`HostToCompanionMsg`] are skipped with a warning — the host
/// may speak a newer vocabulary than this companion.
pub async fn read_host_events(read_half: OwnedReadHalf, tx: mpsc::Sender<HostToCompanionMsg>) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<HostToCompanionMsg>(&line) {
                    Ok(event) => {
                        debug!("host event received: {event:?}");
                        // If the receiver has been dropped, the session is over.
                        if tx.send(event).await.is_err() {
                            debug!("event channel closed; exiting reader");
                            return;
                        }
                    }
                    Err(e) => warn!("skipping malformed host message: {e}"),
                }
            }
            Ok(None) => {
                // EOF — the host closed the connection.
                debug!("host connection closed (EOF)");
                return;
            }
            Err(e) => {
                warn!("read from host failed: {e}");
                return;
            }
        }
    }
}

// ── Outbound channel implementation ───────────────────────────────────────────

/// Sends companion-to-host commands as JSON lines over the TCP write half.
///
/// Success means the line was fully written and flushed to the socket; there
/// is no delivery acknowledgment from the watch side, matching the
/// fire-and-forget relay model.  The write half sits behind an async mutex
/// because the settings relay and the open-view command share one socket.
pub struct TcpOutboundChannel {
    write_half: tokio::sync::Mutex<OwnedWriteHalf>,
}

impl TcpOutboundChannel {
    /// Wraps the write half of an established host connection.
    pub fn new(write_half: OwnedWriteHalf) -> Self {
        Self {
            write_half: tokio::sync::Mutex::new(write_half),
        }
    }
}

#[async_trait]
impl OutboundChannel for TcpOutboundChannel {
    async fn send(&self, msg: &CompanionToHostMsg) -> Result<(), SendError> {
        let mut line = serde_json::to_string(msg)
            .map_err(|e| SendError::Transport(e.to_string()))?;
        line.push('\n');

        let mut half = self.write_half.lock().await;
        // `write_all` ensures ALL bytes are written even if the OS accepts
        // only a partial write on the first call.
        half.write_all(line.as_bytes())
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        half.flush()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Binds a loopback listener and connects a `HostConnection` to it,
    /// returning both ends.
    async fn connected_pair() -> (HostConnection, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (conn, accepted) =
            tokio::join!(HostConnection::connect(addr), listener.accept());
        (conn.unwrap(), accepted.unwrap().0)
    }

    #[tokio::test]
    async fn test_reader_forwards_parsed_events_in_order() {
        // Arrange
        let (conn, mut host_side) = connected_pair().await;
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(read_host_events(conn.read_half, tx));

        // Act: the host delivers two events and hangs up
        host_side
            .write_all(b"{\"type\":\"Ready\"}\n{\"type\":\"ShowConfiguration\"}\n")
            .await
            .unwrap();
        drop(host_side);

        // Assert: both events arrive, in order, then the channel closes
        assert_eq!(rx.recv().await, Some(HostToCompanionMsg::Ready));
        assert_eq!(rx.recv().await, Some(HostToCompanionMsg::ShowConfiguration));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_reader_skips_malformed_lines() {
        let (conn, mut host_side) = connected_pair().await;
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(read_host_events(conn.read_half, tx));

        // A garbage line between two valid events must not end the session.
        host_side
            .write_all(b"{\"type\":\"Ready\"}\nnot json at all\n{\"type\":\"ShowConfiguration\"}\n")
            .await
            .unwrap();
        drop(host_side);

        assert_eq!(rx.recv().await, Some(HostToCompanionMsg::Ready));
        assert_eq!(rx.recv().await, Some(HostToCompanionMsg::ShowConfiguration));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_outbound_channel_writes_one_json_line() {
        // Arrange
        let (conn, mut host_side) = connected_pair().await;
        let channel = TcpOutboundChannel::new(conn.write_half);

        // Act
        channel
            .send(&CompanionToHostMsg::OpenConfigView {
                url: "https://config.tictac.example/settings".to_string(),
            })
            .await
            .unwrap();
        drop(channel);

        // Assert: exactly one newline-terminated JSON object on the wire
        let mut wire = String::new();
        host_side.read_to_string(&mut wire).await.unwrap();
        assert!(wire.ends_with('\n'));
        let decoded: CompanionToHostMsg =
            serde_json::from_str(wire.trim_end()).unwrap();
        assert!(matches!(decoded, CompanionToHostMsg::OpenConfigView { .. }));
    }

    #[tokio::test]
    async fn test_send_on_closed_socket_reports_transport_failure() {
        // Arrange: the host side hangs up immediately
        let (conn, host_side) = connected_pair().await;
        drop(host_side);
        // Drop the read half too so the OS fully tears the stream down.
        drop(conn.read_half);
        let channel = TcpOutboundChannel::new(conn.write_half);

        // Act: keep writing until the broken pipe surfaces (the first write
        // after a close may still be buffered locally)
        let mut saw_failure = false;
        for _ in 0..16 {
            let result = channel
                .send(&CompanionToHostMsg::OpenConfigView {
                    url: "https://config.tictac.example/settings".to_string(),
                })
                .await;
            if let Err(SendError::Transport(_)) = result {
                saw_failure = true;
                break;
            }
            // Give the peer's connection reset time to reach this side.
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        // Assert
        assert!(saw_failure, "writes to a closed socket must eventually fail");
    }
}
