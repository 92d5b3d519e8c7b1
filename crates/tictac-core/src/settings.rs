//! The settings mapping relayed to the watch.
//!
//! A [`SettingsMapping`] is built once per closed configuration view and
//! discarded after it is sent: there is no persistence and no identity beyond
//! the key namespace the schema declares.  Construction is schema-driven —
//! the mapping can only ever contain keys that some field declares as its
//! `messageKey`, no matter what the form response carries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::FormResponse;
use crate::schema::{Field, FieldKind, FieldSchema};

// ── Setting values ────────────────────────────────────────────────────────────

/// A single setting value: boolean, integer color code, or string.
///
/// Serialized untagged, so a mapping serializes to a plain JSON object —
/// exactly the key-value dictionary the watch-side message parser expects:
///
/// ```json
/// {"BACKGROUND_COLOR":"0x0055FF","BACKGROUND_ON":true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

// ── Settings mapping ──────────────────────────────────────────────────────────

/// The key-value result of decoding a closed configuration form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMapping(BTreeMap<String, SettingValue>);

impl SettingsMapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the mapping from a decoded form response.
    ///
    /// This walks the schema, not the response: for each field carrying a
    /// `messageKey`, the submitted value is pulled out by that key and
    /// coerced to the field's kind.  A declared key that is missing from the
    /// response — or whose submitted value is unrecognizable — takes the
    /// field's declared default, matching the behavior of schema-driven form
    /// renderers, which always submit a complete settings object.  A field
    /// with neither a usable value nor a default is omitted.
    pub fn from_response(schema: &FieldSchema, response: &FormResponse) -> Self {
        let mut mapping = Self::new();
        for field in schema.message_fields() {
            let Some(key) = field.message_key.as_deref() else {
                continue;
            };
            let value = response
                .get(key)
                .and_then(|raw| coerce(field.kind, raw))
                .or_else(|| field_default(field));
            if let Some(value) = value {
                mapping.insert(key, value);
            }
        }
        mapping
    }

    /// Inserts `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: SettingValue) {
        self.0.insert(key.into(), value);
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Number of settings in the mapping.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when the mapping holds no settings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ── Coercion helpers ──────────────────────────────────────────────────────────

/// Coerces the field's declared default the same way a submitted value is.
fn field_default(field: &Field) -> Option<SettingValue> {
    field
        .default_value
        .as_ref()
        .and_then(|default| coerce(field.kind, default))
}

/// Coerces a submitted JSON value to the setting type the field produces.
///
/// Returns `None` when the value cannot be read as the field's kind at all;
/// the caller then falls back to the field default.  Coercion is
/// deliberately lenient — form-side validation is the renderer's job, and
/// renderers submit booleans as `true`, `"true"`, `"1"`, or `1` depending on
/// their vintage.
fn coerce(kind: FieldKind, value: &Value) -> Option<SettingValue> {
    match kind {
        FieldKind::Toggle => parse_bool(value).map(SettingValue::Bool),
        // Color pickers submit either an integer color code or a string
        // form like "0x0055FF"; both are relayed verbatim.
        _ => scalar(value),
    }
}

/// Reads a submitted value as a boolean, across the encodings renderers use.
fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_i64().unwrap_or(0) != 0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Some(true),
            "false" | "0" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Reads a submitted value as an integer or string setting.
fn scalar(value: &Value) -> Option<SettingValue> {
    match value {
        Value::Bool(b) => Some(SettingValue::Bool(*b)),
        Value::Number(n) => n.as_i64().map(SettingValue::Int),
        Value::String(s) => Some(SettingValue::Text(s.clone())),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::keys;

    fn schema() -> FieldSchema {
        FieldSchema::watchface_config()
    }

    #[test]
    fn test_submitted_pairs_produce_exactly_the_declared_keys() {
        // Arrange
        let response =
            FormResponse::parse("BACKGROUND_ON=true&BACKGROUND_COLOR=0x0055FF").unwrap();

        // Act
        let mapping = SettingsMapping::from_response(&schema(), &response);

        // Assert: exactly the two declared settings, nothing else
        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get(keys::BACKGROUND_ON),
            Some(&SettingValue::Bool(true))
        );
        assert_eq!(
            mapping.get(keys::BACKGROUND_COLOR),
            Some(&SettingValue::Text("0x0055FF".to_string()))
        );
    }

    #[test]
    fn test_undeclared_response_keys_never_reach_the_mapping() {
        // Arrange: the response smuggles a key no field declares
        let response = FormResponse::parse("EXTRA=1&BACKGROUND_ON=true").unwrap();

        // Act
        let mapping = SettingsMapping::from_response(&schema(), &response);

        // Assert
        assert!(mapping.get("EXTRA").is_none());
        assert_eq!(mapping.len(), 2, "declared keys only (missing one defaulted)");
    }

    #[test]
    fn test_missing_declared_key_takes_the_field_default() {
        // Arrange: only the toggle was submitted
        let response = FormResponse::parse("BACKGROUND_ON=true").unwrap();

        // Act
        let mapping = SettingsMapping::from_response(&schema(), &response);

        // Assert: the color picker's declared default fills the gap
        assert_eq!(
            mapping.get(keys::BACKGROUND_COLOR),
            Some(&SettingValue::Text("0x0055FF".to_string()))
        );
    }

    #[test]
    fn test_response_without_declared_keys_yields_all_defaults() {
        let response = FormResponse::parse("IGNORED=x").unwrap();
        let mapping = SettingsMapping::from_response(&schema(), &response);
        assert_eq!(
            mapping.get(keys::BACKGROUND_ON),
            Some(&SettingValue::Bool(false))
        );
        assert_eq!(
            mapping.get(keys::BACKGROUND_COLOR),
            Some(&SettingValue::Text("0x0055FF".to_string()))
        );
    }

    #[test]
    fn test_json_submission_and_pair_submission_decode_identically() {
        // Arrange: the same settings in both accepted response shapes
        let pairs = FormResponse::parse("BACKGROUND_ON=true&BACKGROUND_COLOR=0x0055FF").unwrap();
        let json = FormResponse::parse(
            "%7B%22BACKGROUND_ON%22%3Atrue%2C%22BACKGROUND_COLOR%22%3A%220x0055FF%22%7D",
        )
        .unwrap();

        // Act / Assert
        assert_eq!(
            SettingsMapping::from_response(&schema(), &pairs),
            SettingsMapping::from_response(&schema(), &json)
        );
    }

    #[test]
    fn test_numeric_color_code_is_kept_as_integer() {
        let response = FormResponse::parse(r#"{"BACKGROUND_COLOR":21759}"#).unwrap();
        let mapping = SettingsMapping::from_response(&schema(), &response);
        assert_eq!(
            mapping.get(keys::BACKGROUND_COLOR),
            Some(&SettingValue::Int(21759))
        );
    }

    #[test]
    fn test_toggle_string_encodings_all_parse() {
        for (raw, expected) in [
            ("true", true),
            ("1", true),
            ("on", true),
            ("yes", true),
            ("false", false),
            ("0", false),
            ("off", false),
            ("", false),
        ] {
            let response =
                FormResponse::parse(&format!("BACKGROUND_ON={raw}")).unwrap();
            let mapping = SettingsMapping::from_response(&schema(), &response);
            assert_eq!(
                mapping.get(keys::BACKGROUND_ON),
                Some(&SettingValue::Bool(expected)),
                "toggle value {raw:?}"
            );
        }
    }

    #[test]
    fn test_unrecognizable_toggle_value_falls_back_to_default() {
        // "maybe" is not a boolean in any renderer's vocabulary.
        let response = FormResponse::parse("BACKGROUND_ON=maybe").unwrap();
        let mapping = SettingsMapping::from_response(&schema(), &response);
        assert_eq!(
            mapping.get(keys::BACKGROUND_ON),
            Some(&SettingValue::Bool(false)),
            "falls back to the declared default"
        );
    }

    #[test]
    fn test_field_without_default_is_omitted_when_unsubmitted() {
        // Arrange: a schema entry with no declared default
        let schema = FieldSchema::new(vec![Field {
            kind: FieldKind::Color,
            message_key: Some("ACCENT_COLOR".to_string()),
            label: Some("Accent".to_string()),
            default_value: None,
            items: Vec::new(),
        }])
        .unwrap();
        let response = FormResponse::parse("OTHER=1").unwrap();

        // Act
        let mapping = SettingsMapping::from_response(&schema, &response);

        // Assert: nothing sensible to send, so the key is absent
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_mapping_serializes_to_a_plain_json_object() {
        let mut mapping = SettingsMapping::new();
        mapping.insert(keys::BACKGROUND_ON, SettingValue::Bool(true));
        mapping.insert(
            keys::BACKGROUND_COLOR,
            SettingValue::Text("0x0055FF".to_string()),
        );

        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "BACKGROUND_COLOR": "0x0055FF",
                "BACKGROUND_ON": true
            })
        );
    }

    #[test]
    fn test_mapping_round_trips_through_json() {
        let mut mapping = SettingsMapping::new();
        mapping.insert("A", SettingValue::Bool(false));
        mapping.insert("B", SettingValue::Int(7));
        mapping.insert("C", SettingValue::Text("x".to_string()));

        let json = serde_json::to_string(&mapping).unwrap();
        let decoded: SettingsMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(mapping, decoded);
    }
}
