use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options controlling how a position is resolved.
///
/// Read from JSON with camelCase keys; missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverOptions {
    /// Only resolve to a binding or variable desugared from a `*directive`
    /// value when the position is inside its key or its value. Microsyntax
    /// keywords such as `let`, and the `=` and `;` between bindings, then
    /// resolve to nothing. Ordinary attributes are not affected.
    pub key_value_spans_only: bool,
    /// Check span preconditions of the whole tree before resolving.
    pub validate_spans: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            key_value_spans_only: true,
            validate_spans: false,
        }
    }
}

impl ResolverOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
