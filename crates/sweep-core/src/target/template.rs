//! Endpoint template with an `{id}` placeholder.

use crate::config::ConfigError;

/// Placeholder replaced by the numeric id.
const ID_PLACEHOLDER: &str = "{id}";

/// A URL template known to contain at least one `{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if !raw.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Substitutes `id` for every placeholder occurrence.
    pub fn expand(&self, id: u64) -> String {
        self.0.replace(ID_PLACEHOLDER, &id.to_string())
    }
}
