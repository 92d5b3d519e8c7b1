//! Infrastructure layer for tictac-companion.
//!
//! Everything that touches the outside world lives here: the TCP link to the
//! watch host process, the reader task that turns wire lines into typed
//! events, the outbound channel implementation, the stub weather
//! collaborator, and the event loop that owns connection lifecycle.
//!
//! # What does NOT belong here?
//!
//! - Event handling logic (that is the application layer)
//! - Message type definitions (that is the domain layer)
//! - Configuration parsing (that is done in `main.rs`)

pub mod event_loop;
pub mod host_conn;
pub mod weather;

// Re-export the primary entry point so `main.rs` can call it concisely.
pub use event_loop::run_companion;
