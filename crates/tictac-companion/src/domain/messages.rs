//! Wire message types spoken with the watch host process.
//!
//! The host link carries newline-delimited JSON: every message is an object
//! with a `"type"` field that identifies the variant, with all other fields
//! flattened into the same object.  For example:
//!
//! ```json
//! {"type":"WebviewClosed","response":"BACKGROUND_ON=true"}
//! {"type":"AppMessage","payload":{"BACKGROUND_ON":true}}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles the discriminant
//! automatically.
//!
//! # Why separate host→companion and companion→host message types?
//!
//! The two directions carry different information: the host *delivers*
//! lifecycle and watch events, while the companion *sends* commands (relay
//! these settings, open the configuration view).  Two distinct enums make it
//! a compile-time error to send a host-only message back at the host, and
//! vice versa.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tictac_core::SettingsMapping;

// ── Host → Companion messages ─────────────────────────────────────────────────

/// Every event the host can deliver to the companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostToCompanionMsg {
    /// The host's event system is up and the watch link is usable.
    ///
    /// Fired once per session, before any other event.
    Ready,

    /// The watch sent an app message to the phone.
    ///
    /// The payload is an opaque dictionary owned by the watchface; the
    /// companion reacts to the *arrival* of the message, not its content.
    AppMessage {
        /// Raw key-value content of the watch message.
        #[serde(default)]
        payload: Map<String, Value>,
    },

    /// The user opened the watchface settings on the host.
    ///
    /// The companion answers by asking the host to open the remote
    /// configuration form.
    ShowConfiguration,

    /// The user dismissed the remote configuration form.
    WebviewClosed {
        /// The url-encoded form response.
        ///
        /// Absent when the user cancelled the form without submitting —
        /// in that case nothing is relayed to the watch.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },
}

// ── Companion → Host messages ─────────────────────────────────────────────────

/// Every command the companion can send to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CompanionToHostMsg {
    /// Relay a settings mapping to the watch as a single app message.
    ///
    /// Keys are restricted to the `messageKey` values the field schema
    /// declares: the mapping is built by walking the schema, so no other
    /// key can appear.
    AppMessage {
        /// The settings to deliver, as a plain key-value object.
        payload: SettingsMapping,
    },

    /// Ask the host to open the remote configuration form in its webview.
    OpenConfigView {
        /// Fully built page URL, field schema included as a query parameter.
        url: String,
    },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
