// Read session tuning

use crate::core::constants::DEFAULT_MAX_WINDOW_SIZE;
use crate::core::error::{Result, TrsError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Upper bound in bytes of a single memory-mapped window. A record larger
    /// than this is still mapped whole.
    pub max_window_size: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_window_size: DEFAULT_MAX_WINDOW_SIZE,
        }
    }
}

impl ReaderConfig {
    pub fn with_max_window_size(max_window_size: u64) -> Self {
        Self { max_window_size }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_window_size == 0 {
            return Err(TrsError::argument("max_window_size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_matches_mapping_limit() {
        assert_eq!(ReaderConfig::default().max_window_size, 0x7FFF_FFFF);
        assert!(ReaderConfig::default().validate().is_ok());
        assert!(ReaderConfig::with_max_window_size(0)
            .validate()
            .unwrap_err()
            .is_argument());
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let config: ReaderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReaderConfig::default());
        let config: ReaderConfig = serde_json::from_str(r#"{"max_window_size": 4096}"#).unwrap();
        assert_eq!(config.max_window_size, 4096);
    }
}
