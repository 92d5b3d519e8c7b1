//! Domain layer for tictac-companion.
//!
//! Pure types only: the wire message enums spoken with the host process and
//! the companion's runtime configuration.  Nothing here performs I/O, spawns
//! tasks, or reads the environment — that keeps these types trivially
//! testable and reusable from both the event loop and the test suite.

pub mod config;
pub mod messages;

// Re-export the most commonly needed types at the domain module boundary
// so callers can write `domain::CompanionConfig` instead of the longer path.
pub use config::CompanionConfig;
pub use messages::{CompanionToHostMsg, HostToCompanionMsg};
