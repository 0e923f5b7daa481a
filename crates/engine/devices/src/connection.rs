//! Network effective connection type
//!
//! Mirrors the values of the Network Information API's `effectiveType`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Effective connection type reported by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectiveConnectionType {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    Cellular2g,
    #[serde(rename = "3g")]
    Cellular3g,
    #[serde(rename = "4g")]
    Cellular4g,
}

impl EffectiveConnectionType {
    /// All known connection types, slowest first
    pub const ALL: [EffectiveConnectionType; 4] = [
        Self::Slow2g,
        Self::Cellular2g,
        Self::Cellular3g,
        Self::Cellular4g,
    ];

    /// The browser's string for this connection type
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Slow2g => "slow-2g",
            Self::Cellular2g => "2g",
            Self::Cellular3g => "3g",
            Self::Cellular4g => "4g",
        }
    }

    /// Parse a browser value, returning `None` for anything unrecognised
    ///
    /// Unknown values are treated like an absent API.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl FromStr for EffectiveConnectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::UnknownConnectionType(s.to_string()))
    }
}

impl fmt::Display for EffectiveConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browser_values() {
        assert_eq!(
            "slow-2g".parse::<EffectiveConnectionType>(),
            Ok(EffectiveConnectionType::Slow2g)
        );
        assert_eq!(
            " 3G ".parse::<EffectiveConnectionType>(),
            Ok(EffectiveConnectionType::Cellular3g)
        );
        assert!(matches!(
            "5g".parse::<EffectiveConnectionType>(),
            Err(Error::UnknownConnectionType(_))
        ));
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(
            EffectiveConnectionType::parse_lenient("4g"),
            Some(EffectiveConnectionType::Cellular4g)
        );
        assert_eq!(EffectiveConnectionType::parse_lenient("wifi"), None);
    }

    #[test]
    fn test_serde_uses_browser_strings() {
        let json = serde_json::to_string(&EffectiveConnectionType::Slow2g).unwrap();
        assert_eq!(json, "\"slow-2g\"");
        let parsed: EffectiveConnectionType = serde_json::from_str("\"2g\"").unwrap();
        assert_eq!(parsed, EffectiveConnectionType::Cellular2g);
    }
}
