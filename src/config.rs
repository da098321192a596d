// config.rs - Parser limits and behaviour switches

use crate::{MAX_BODY_LENGTH, MAX_HEADERS, MAX_HEADER_LENGTH, MAX_VIA_HEADERS};
use serde::{Deserialize, Serialize};

/// How continuation lines are recognised when unfolding headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Folding {
    /// A line starting with SP or HTAB continues the previous header
    #[default]
    Rfc3261,
    /// A line of at least 5 characters starting with a TAB or four spaces
    /// continues the previous header, appended verbatim after the marker
    Legacy,
}

/// What header dispatch does after a failed header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Keep going and record every error in order
    #[default]
    Collect,
    /// Stop dispatching at the first error
    StopAtFirst,
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Largest accepted message, header block and body together
    pub max_message_size: usize,

    /// Largest number of logical header lines
    pub max_headers: usize,

    /// Largest number of Via entries
    pub max_via_headers: usize,

    pub folding: Folding,

    pub error_policy: ErrorPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_message_size: MAX_HEADER_LENGTH + MAX_BODY_LENGTH,
            max_headers: MAX_HEADERS,
            max_via_headers: MAX_VIA_HEADERS,
            folding: Folding::default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl ParserConfig {
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Default limits with the length-gated folding rule
    pub fn legacy() -> Self {
        Self {
            folding: Folding::Legacy,
            ..Self::default()
        }
    }

    pub fn stop_at_first(self) -> Self {
        Self {
            error_policy: ErrorPolicy::StopAtFirst,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.max_message_size, MAX_HEADER_LENGTH + MAX_BODY_LENGTH);
        assert_eq!(config.max_headers, MAX_HEADERS);
        assert_eq!(config.max_via_headers, MAX_VIA_HEADERS);
        assert_eq!(config.folding, Folding::Rfc3261);
        assert_eq!(config.error_policy, ErrorPolicy::Collect);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ParserConfig::from_json(r#"{"max_headers": 10, "folding": "legacy"}"#).unwrap();
        assert_eq!(config.max_headers, 10);
        assert_eq!(config.folding, Folding::Legacy);
        assert_eq!(config.max_via_headers, MAX_VIA_HEADERS);
        assert_eq!(config.error_policy, ErrorPolicy::Collect);
    }

    #[test]
    fn test_from_json_policy() {
        let config = ParserConfig::from_json(r#"{"error_policy": "stop_at_first"}"#).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::StopAtFirst);
        assert!(ParserConfig::from_json(r#"{"folding": "sideways"}"#).is_err());
    }

    #[test]
    fn test_builders() {
        let config = ParserConfig::legacy().stop_at_first();
        assert_eq!(config.folding, Folding::Legacy);
        assert_eq!(config.error_policy, ErrorPolicy::StopAtFirst);
    }
}
