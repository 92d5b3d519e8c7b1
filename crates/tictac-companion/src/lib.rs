//! tictac-companion library crate.
//!
//! The companion runs on the phone side of a TicTac watchface deployment.  It
//! listens for lifecycle and message events from the host process that talks
//! to the watch, asks the host to open the remote configuration form when the
//! user requests it, and relays submitted settings back to the watch as a
//! single key-value app message.
//!
//! # Architecture
//!
//! ```text
//! Watch host process (JSON lines over TCP)
//!         ↕
//! [tictac-companion]
//!   ├── domain/           Pure types: wire message enums, CompanionConfig
//!   ├── application/      EventBridge: the host event handlers
//!   └── infrastructure/
//!         ├── host_conn/  TCP link to the host, event reader, outbound channel
//!         ├── weather/    Stub for the external weather refresh collaborator
//!         └── event_loop/ Connection lifecycle + one-at-a-time dispatch
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `tictac-core` only.
//! - `infrastructure` depends on all other layers plus `tokio`.

/// Domain layer: pure business-logic types (no I/O).
pub mod domain;

/// Application layer: the event bridge and its collaborator seams.
pub mod application;

/// Infrastructure layer: host TCP link and the event loop.
pub mod infrastructure;
