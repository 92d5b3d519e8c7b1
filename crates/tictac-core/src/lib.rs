//! # tictac-core
//!
//! Shared library for the TicTac watchface companion containing the
//! configuration field schema, form-response decoding, and the settings
//! mapping relayed to the watch.
//!
//! This crate is pure data and translation logic: it has zero dependencies on
//! async runtimes, sockets, or the host transport.  The companion binary
//! (`tictac-companion`) layers event handling and I/O on top of it.
//!
//! The three modules correspond to the three stages of a configuration
//! round trip:
//!
//! - **`schema`** – The declarative list of form fields (headings, toggles,
//!   color pickers, ...) that parameterizes the remote configuration page.
//!   Each interactive field carries a stable `messageKey` naming the setting
//!   it produces.
//!
//! - **`form`** – Decoding of the raw url-encoded response string the
//!   configuration view returns when the user submits the form.
//!
//! - **`settings`** – The typed key-value mapping built from a decoded
//!   response against the schema, ready to be sent to the watch as a single
//!   app message.

pub mod form;
pub mod schema;
pub mod settings;

// Re-export the most-used types at the crate root so callers can write
// `tictac_core::FieldSchema` instead of `tictac_core::schema::FieldSchema`.
pub use form::{FormDecodeError, FormResponse};
pub use schema::{keys, Field, FieldKind, FieldSchema, SchemaError};
pub use settings::{SettingValue, SettingsMapping};
