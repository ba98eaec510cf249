//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Colors assigned to freshly created objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub vector: String,
    pub matrix: String,
    pub cross_product: String,
    pub ghost: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            vector: "#ff0000".to_string(),
            matrix: "#00ff00".to_string(),
            cross_product: "#ff00ff".to_string(),
            ghost: "#888888".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub palette: Palette,
}

impl EngineConfig {
    /// Parse a possibly partial JSON document; missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r##"{"palette": {"ghost": "#cccccc"}}"##).unwrap();
        assert_eq!(config.palette.ghost, "#cccccc");
        assert_eq!(config.palette.vector, "#ff0000");
    }

    #[test]
    fn test_empty_json() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(EngineConfig::from_json("{\"palette\": 3}").is_err());
    }
}
