//! Interpretation of the per-method documentation marker.
//!
//! Two shapes are accepted:
//!
//! ```text
//! #[api_doc(WidgetDto)]
//! #[api_doc(url = "/widgets", method = "GET", method = "HEAD", result = WidgetDto)]
//! ```

use crate::declaration::{Attribute, MarkerArgs, MarkerEntry, MarkerValue, TypeShape};
use crate::error::{Error, Result};
use log::debug;

/// Key reported for unkeyed marker values
const POSITIONAL_KEY: &str = "<value>";

/// Overrides supplied by a method marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerOverrides {
    /// Response type replacing the declared return type
    pub response_type: Option<TypeShape>,
    /// URL replacing the default
    pub url: Option<String>,
    /// Method tokens to add, upper-cased, in marker order
    pub methods: Vec<String>,
}

/// Reads the overrides of `marker` on the method named `method`.
pub fn resolve(method: &str, marker: &Attribute) -> Result<MarkerOverrides> {
    let malformed = |key: &str, expected: &'static str| Error::MalformedMarker {
        method: method.to_string(),
        key: key.to_string(),
        expected,
    };

    let entries = match &marker.args {
        MarkerArgs::Empty => return Ok(MarkerOverrides::default()),
        MarkerArgs::Malformed(tokens) => {
            debug!("Unreadable marker tokens on {}: {}", method, tokens);
            return Err(malformed(&marker.name, "a type or key = value entries"));
        }
        MarkerArgs::Entries(entries) => entries,
    };

    let mut overrides = MarkerOverrides::default();

    if let [MarkerEntry { key: None, value }] = entries.as_slice() {
        let ty = expect_type(value).ok_or_else(|| malformed(POSITIONAL_KEY, "a type"))?;
        overrides.response_type = Some(ty);
        return Ok(overrides);
    }

    for entry in entries {
        let Some(key) = entry.key.as_deref() else {
            return Err(malformed(POSITIONAL_KEY, "a key = value entry"));
        };

        match key {
            "result" | "value" => {
                let ty = expect_type(&entry.value).ok_or_else(|| malformed(key, "a type"))?;
                overrides.response_type = Some(ty);
            }
            "url" => {
                let url = expect_str(&entry.value).ok_or_else(|| malformed(key, "a string literal"))?;
                overrides.url = Some(url.to_string());
            }
            "method" => {
                let token = expect_str(&entry.value)
                    .ok_or_else(|| malformed(key, "a string literal"))?
                    .trim()
                    .to_uppercase();
                if !token.is_empty() && !overrides.methods.contains(&token) {
                    overrides.methods.push(token);
                }
            }
            other => debug!("Ignoring unknown marker key {} on {}", other, method),
        }
    }

    Ok(overrides)
}

fn expect_type(value: &MarkerValue) -> Option<TypeShape> {
    match value {
        MarkerValue::Type(ty) => Some(ty.clone()),
        other => {
            debug!("Expected a type in marker, found a {}", other.kind());
            None
        }
    }
}

fn expect_str(value: &MarkerValue) -> Option<&str> {
    match value {
        MarkerValue::Str(s) => Some(s),
        other => {
            debug!("Expected a string literal in marker, found a {}", other.kind());
            None
        }
    }
}
