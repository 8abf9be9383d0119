//! Run-wide options shared by the report writer and the runners.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory for generated reports.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory that receives report files.
    pub output_dir: PathBuf,
    /// Include the final tape content in reports.
    pub print_result: bool,
    /// Include the final tape length in reports. Only meaningful with
    /// `print_result`.
    pub print_length: bool,
    /// Upper bound on applied transitions per run. `None` runs until halt.
    pub max_steps: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            print_result: true,
            print_length: true,
            max_steps: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"max_steps": 100}"#).unwrap();

        assert_eq!(settings.max_steps, Some(100));
        assert_eq!(settings.output_dir, PathBuf::from("outputs"));
        assert!(settings.print_result);
    }
}
