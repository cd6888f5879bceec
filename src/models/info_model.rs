use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    pub log_level: String,
    pub max_window_size: u64,
    pub preview_traces: usize,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_window_size: trsfile::core::constants::DEFAULT_MAX_WINDOW_SIZE,
            preview_traces: 3,
        }
    }
}
