//! Report output configuration.

use serde::{Deserialize, Serialize};

/// Default report directory (current working directory).
fn default_dir() -> String {
    ".".to_string()
}

/// Default JSON export setting.
const fn default_json_export() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportsConfig {
    /// Directory the delimited reports are written into.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Whether to also export the grouped duplicate map as JSON.
    #[serde(default = "default_json_export")]
    pub json_export: bool,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            json_export: default_json_export(),
        }
    }
}
