//! Decoding of the raw configuration-form response string.
//!
//! When the user dismisses the remote configuration view, the host hands the
//! companion a single opaque, url-encoded response string.  This module turns
//! that string into a key → value lookup table; the schema-driven extraction
//! into a typed settings mapping happens in [`crate::settings`].
//!
//! # Two accepted shapes
//!
//! Form renderers in the wild submit one of two encodings, and both are
//! accepted here:
//!
//! 1. **Form pairs** — the classic query-string shape:
//!    `BACKGROUND_ON=true&BACKGROUND_COLOR=0x0055FF` (values percent-encoded).
//! 2. **Percent-encoded JSON object** — web-form libraries that build the
//!    page from the schema JSON submit `encodeURIComponent(JSON.stringify(…))`
//!    of the whole settings object.  Since `encodeURIComponent` escapes every
//!    `=` and `&`, such a payload arrives as one giant "key" with no value,
//!    which is how it is recognized below.
//!
//! Both shapes decode into the same lookup table, so downstream code never
//! needs to know which renderer produced the response.

use serde_json::{Map, Value};
use thiserror::Error;
use url::form_urlencoded;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors produced while decoding a form response string.
///
/// A user-cancelled configuration never reaches this code — the event bridge
/// drops close events with no response payload before decoding starts.
#[derive(Debug, Error)]
pub enum FormDecodeError {
    /// The response string was present but empty after trimming.
    #[error("empty form response")]
    Empty,

    /// The response looked like a JSON-object submission but the JSON was
    /// malformed.
    #[error("malformed JSON form response: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

// ── Decoded response ──────────────────────────────────────────────────────────

/// A decoded form response: key → submitted value.
///
/// Values from the form-pair shape are always strings; values from the
/// JSON-object shape keep their JSON type (booleans and numbers survive).
/// The per-field coercion in [`crate::settings`] normalizes both.
#[derive(Debug, Clone, PartialEq)]
pub struct FormResponse {
    values: Map<String, Value>,
}

impl FormResponse {
    /// Decodes a raw url-encoded response string.
    ///
    /// # Errors
    ///
    /// Returns [`FormDecodeError::Empty`] for a blank string and
    /// [`FormDecodeError::MalformedJson`] when a JSON-object submission does
    /// not parse.  A pair-shaped response has no failure mode beyond
    /// emptiness: percent-decoding is total and unknown keys are simply
    /// never looked up.
    pub fn parse(raw: &str) -> Result<Self, FormDecodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FormDecodeError::Empty);
        }

        // `form_urlencoded::parse` percent-decodes each key and value.  A
        // JSON-object submission contains no literal `=` or `&` (both are
        // escaped by encodeURIComponent), so it comes back as exactly one
        // pair whose value is empty and whose decoded key is the JSON text.
        let pairs: Vec<(String, String)> =
            form_urlencoded::parse(trimmed.as_bytes()).into_owned().collect();

        if let [(single, value)] = pairs.as_slice() {
            if value.is_empty() && single.trim_start().starts_with('{') {
                let values: Map<String, Value> = serde_json::from_str(single.trim())?;
                return Ok(Self { values });
            }
        }

        let mut values = Map::new();
        for (key, value) in pairs {
            values.insert(key, Value::String(value));
        }
        Ok(Self { values })
    }

    /// Looks up the submitted value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Number of submitted values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the response decoded to no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
