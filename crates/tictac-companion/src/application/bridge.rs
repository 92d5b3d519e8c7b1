//! The event bridge: host events in, settings relay out.
//!
//! The bridge is constructed explicitly with its collaborators and fed host
//! events one at a time by the event loop; there is no global registration
//! and no teardown beyond dropping the bridge.  Every handler is stateless —
//! each invocation is self-contained, and no state flows between events.
//!
//! # Handlers
//!
//! | Event               | Action                                             |
//! |---------------------|----------------------------------------------------|
//! | `Ready`             | diagnostic log only                                |
//! | `AppMessage`        | trigger exactly one external weather refresh       |
//! | `ShowConfiguration` | ask the host to open the configuration form        |
//! | `WebviewClosed`     | decode the response, relay the settings mapping    |
//!
//! Failures on the relay path are terminal for that attempt: they are logged
//! (with the error detail serialized) and never retried.  The next
//! `WebviewClosed` event with a response is the only recovery path.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use tictac_core::{FieldSchema, FormDecodeError, FormResponse, SettingsMapping};

use crate::domain::messages::{CompanionToHostMsg, HostToCompanionMsg};

// ── Collaborator seams ────────────────────────────────────────────────────────

/// The external data-refresh collaborator kicked by an incoming app message.
///
/// The watchface asks for fresh weather by sending any app message; what
/// "refresh" means (which API, which units, how failures are retried) is
/// entirely owned by the implementation.  That is why the method has no
/// return value: failures are handled, and logged, on the other side of this
/// seam.
pub trait WeatherFetch: Send + Sync {
    /// Kicks off one refresh.
    fn refresh(&self);
}

/// Errors reported by the outbound message channel.
#[derive(Debug, Error)]
pub enum SendError {
    /// The message could not be delivered to the host transport.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// The outbound message channel to the host.
///
/// Accepts one companion-to-host command at a time and reports success or
/// failure for that single send; there is no delivery acknowledgment from
/// the watch and no correlation of multiple in-flight sends.
#[async_trait]
pub trait OutboundChannel: Send + Sync {
    /// Sends `msg` to the host.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when the message could not be handed to the
    /// transport.  Callers decide whether that is worth more than a log
    /// line; the bridge never retries.
    async fn send(&self, msg: &CompanionToHostMsg) -> Result<(), SendError>;
}

// ── Error type ────────────────────────────────────────────────────────────────

/// Failures on the relay path, logged by the outer handlers.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The form response string could not be decoded at all.
    #[error("form response rejected: {0}")]
    Decode(#[from] FormDecodeError),

    /// The outbound channel reported a delivery failure.
    #[error("send failed: {0}")]
    Send(#[from] SendError),
}

// ── Configuration page URL ────────────────────────────────────────────────────

/// Builds the configuration-page URL for the remote form.
///
/// The field schema is serialized to JSON and appended as the `schema` query
/// parameter (percent-encoded by the URL builder), so the external form
/// renderer can draw the page without any out-of-band knowledge of the
/// watchface.
pub fn config_page_url(base: &Url, schema: &FieldSchema) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("schema", &schema.to_json().to_string());
    url
}

// ── The bridge ────────────────────────────────────────────────────────────────

/// Adapts host lifecycle/message events to configuration retrieval and relay.
pub struct EventBridge {
    /// The declarative form schema; read-only after construction.
    schema: FieldSchema,
    /// Base URL of the remote configuration page.
    config_url: Url,
    /// External refresh collaborator (weather fetch).
    weather: Arc<dyn WeatherFetch>,
    /// Outbound message channel to the host.
    outbound: Arc<dyn OutboundChannel>,
}

impl EventBridge {
    /// Constructs a bridge with explicit collaborators.
    pub fn new(
        schema: FieldSchema,
        config_url: Url,
        weather: Arc<dyn WeatherFetch>,
        outbound: Arc<dyn OutboundChannel>,
    ) -> Self {
        Self {
            schema,
            config_url,
            weather,
            outbound,
        }
    }

    /// Dispatches one host event to its handler.
    ///
    /// The event loop calls this for each event in arrival order and awaits
    /// completion before dispatching the next one, so handlers never overlap.
    pub async fn handle_event(&self, event: HostToCompanionMsg) {
        match event {
            HostToCompanionMsg::Ready => self.on_ready(),
            HostToCompanionMsg::AppMessage { payload } => self.on_app_message(&payload),
            HostToCompanionMsg::ShowConfiguration => self.on_show_configuration().await,
            HostToCompanionMsg::WebviewClosed { response } => {
                self.on_webview_closed(response.as_deref()).await
            }
        }
    }

    /// The host's event system is up; nothing to do beyond saying so.
    pub fn on_ready(&self) {
        info!("companion ready");
    }

    /// An app message arrived from the watch: trigger exactly one refresh.
    ///
    /// The message content is not inspected — arrival is the signal.
    pub fn on_app_message(&self, payload: &serde_json::Map<String, serde_json::Value>) {
        info!("app message received from watch ({} entries)", payload.len());
        self.weather.refresh();
    }

    /// The user opened the watchface settings: hand the host the form URL.
    pub async fn on_show_configuration(&self) {
        match self.open_config_view().await {
            Ok(url) => info!("opened configuration view at {url}"),
            Err(e) => warn!("failed to open configuration view: {e}"),
        }
    }

    /// The remote configuration form was dismissed.
    ///
    /// A close event without a response payload means the user cancelled:
    /// the handler exits with no side effect.  Otherwise the response is
    /// decoded against the schema and the resulting mapping is sent to the
    /// watch, logging the outcome either way.
    pub async fn on_webview_closed(&self, response: Option<&str>) {
        let Some(raw) = response else {
            // Cancelled configuration: not an error, nothing to relay.
            return;
        };

        match self.relay_settings(raw).await {
            Ok(mapping) => info!("sent {} settings to watch", mapping.len()),
            Err(e) => {
                warn!("failed to send config data to watch");
                // Serialize the error detail the way the log sink expects it.
                warn!("{}", serde_json::json!({ "error": e.to_string() }));
            }
        }
    }

    /// Decode + relay, with `?` doing the error plumbing; the outer handler
    /// logs the outcome.
    async fn relay_settings(&self, raw: &str) -> Result<SettingsMapping, BridgeError> {
        let response = FormResponse::parse(raw)?;
        let mapping = SettingsMapping::from_response(&self.schema, &response);
        self.outbound
            .send(&CompanionToHostMsg::AppMessage {
                payload: mapping.clone(),
            })
            .await?;
        Ok(mapping)
    }

    async fn open_config_view(&self) -> Result<Url, BridgeError> {
        let url = config_page_url(&self.config_url, &self.schema);
        self.outbound
            .send(&CompanionToHostMsg::OpenConfigView {
                url: url.to_string(),
            })
            .await?;
        Ok(url)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
