//! Application layer for tictac-companion.
//!
//! The application layer holds the event bridge: it knows *what* to do with
//! each host event, but delegates *how* (network writes, the weather data
//! source) to collaborators behind traits implemented in the infrastructure
//! layer.
//!
//! # Responsibilities
//!
//! - Dispatching host events to the matching handler
//! - Decoding a closed form response into a settings mapping and relaying it
//! - Building the configuration-page URL from the field schema
//! - Defining the collaborator seams (`WeatherFetch`, `OutboundChannel`)
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or reading from the host link (infrastructure)
//! - Tokio task spawning (infrastructure)
//! - Schema and response decoding internals (`tictac-core`)

pub mod bridge;

// Re-export so callers can write `application::EventBridge` directly.
pub use bridge::{config_page_url, BridgeError, EventBridge, OutboundChannel, SendError, WeatherFetch};
