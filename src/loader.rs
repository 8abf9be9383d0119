//! This module provides the `ConfigLoader` struct, responsible for loading machine
//! configurations from YAML files, strings, and directories.

use crate::config::{MachineConfig, REQUIRED_FIELDS};
use crate::types::{ConfigurationError, TuringMachineError};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `ConfigLoader` is a utility struct for loading machine configurations.
///
/// Every entry point validates the document structure before deserializing it,
/// so a missing top-level field is reported by name rather than as a generic
/// YAML shape error.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineConfig)` if the file is read, well-formed and complete.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::Configuration)` if the document is malformed or incomplete.
    pub fn load(path: &Path) -> Result<MachineConfig, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let mut config = Self::load_from_str(&content)?;
        if config.name.is_none() {
            config.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }

        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Loads a configuration from YAML text.
    pub fn load_from_str(content: &str) -> Result<MachineConfig, TuringMachineError> {
        validate_structure(content)?;

        let config = serde_yaml::from_str(content).map_err(syntax)?;

        Ok(config)
    }

    /// Loads every `.yaml`/`.yml` file in `directory`, one result per file,
    /// sorted by path. Subdirectories and other files are skipped.
    pub fn load_dir(directory: &Path) -> Vec<Result<(PathBuf, MachineConfig), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == "yaml" || ext == "yml")
            })
            .collect();
        paths.sort();

        debug!(directory = %directory.display(), files = paths.len(), "loading configurations");

        paths
            .into_iter()
            .map(|path| Self::load(&path).map(|config| (path, config)))
            .collect()
    }
}

fn syntax(error: serde_yaml::Error) -> ConfigurationError {
    ConfigurationError::Syntax(error.to_string())
}

/// Only the state names of `q_states`; every other field is skipped.
#[derive(Deserialize)]
struct StatesOutline {
    q_states: HashMap<String, IgnoredAny>,
}

/// Checks the five required top-level fields and that `q_states` names both
/// an initial and a final state.
///
/// Values are skipped with `IgnoredAny` rather than parsed into a
/// `serde_yaml::Value`, which cannot hold integers wider than 64 bits.
fn validate_structure(content: &str) -> Result<(), ConfigurationError> {
    let root: HashMap<String, IgnoredAny> = serde_yaml::from_str(content).map_err(syntax)?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|key| !root.contains_key(**key)) {
        return Err(ConfigurationError::MissingField(missing.to_string()));
    }

    let outline: StatesOutline = serde_yaml::from_str(content).map_err(syntax)?;
    if let Some(missing) = ["initial", "final"]
        .iter()
        .find(|key| !outline.q_states.contains_key(**key))
    {
        return Err(ConfigurationError::MissingState(missing.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = r#"
q_states:
  q_list: [q0, q1]
  initial: q0
  final: q1
alphabet: [a]
tape_alphabet: [a]
delta:
  - params: { initial_state: q0, mem_cache_value: null, tape_input: a }
    output: { final_state: q1, mem_cache_value: a, tape_output: a, tape_displacement: R }
simulation_strings: [a, b]
"#;

    #[test]
    fn test_load_valid_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("single-a.yaml");
        File::create(&file_path)
            .unwrap()
            .write_all(VALID.as_bytes())
            .unwrap();

        let config = ConfigLoader::load(&file_path).unwrap();

        assert_eq!(config.name.as_deref(), Some("single-a"));
        assert_eq!(config.q_states.initial, "q0");
        assert_eq!(config.delta.len(), 1);
        assert_eq!(config.simulation_strings, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = ConfigLoader::load(&dir.path().join("nope.yaml"));

        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_missing_required_field() {
        for field in ["alphabet", "tape_alphabet", "simulation_strings"] {
            let document = VALID
                .lines()
                .filter(|line| !line.starts_with(field))
                .collect::<Vec<_>>()
                .join("\n");

            assert_eq!(
                ConfigLoader::load_from_str(&document).unwrap_err(),
                TuringMachineError::Configuration(ConfigurationError::MissingField(
                    field.to_string()
                ))
            );
        }
    }

    #[test]
    fn test_missing_delta() {
        let document = r#"
q_states: { q_list: [q0], initial: q0, final: q0 }
alphabet: []
tape_alphabet: []
simulation_strings: []
"#;

        assert_eq!(
            ConfigLoader::load_from_str(document).unwrap_err(),
            TuringMachineError::Configuration(ConfigurationError::MissingField(
                "delta".to_string()
            ))
        );
    }

    #[test]
    fn test_missing_final_state() {
        let document = VALID.replace("  final: q1\n", "");

        assert_eq!(
            ConfigLoader::load_from_str(&document).unwrap_err(),
            TuringMachineError::Configuration(ConfigurationError::MissingState(
                "final".to_string()
            ))
        );
    }

    #[test]
    fn test_malformed_yaml() {
        let result = ConfigLoader::load_from_str("q_states: [unclosed");
        assert!(matches!(
            result,
            Err(TuringMachineError::Configuration(ConfigurationError::Syntax(_)))
        ));

        let result = ConfigLoader::load_from_str("- just\n- a list");
        assert!(matches!(
            result,
            Err(TuringMachineError::Configuration(ConfigurationError::Syntax(_)))
        ));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("valid.yaml"), VALID).unwrap();
        fs::write(dir.path().join("broken.yml"), "alphabet: []").unwrap();
        fs::write(dir.path().join("ignored.txt"), "not a machine").unwrap();

        let results = ConfigLoader::load_dir(dir.path());

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_long_unquoted_input_survives_loading() {
        let document = VALID.replace(
            "simulation_strings: [a, b]",
            "simulation_strings: [111111111111111111111111111, a]",
        );

        let config = ConfigLoader::load_from_str(&document).unwrap();
        assert_eq!(config.simulation_strings, vec!["1".repeat(27), "a".to_string()]);
    }

    #[test]
    fn test_unquoted_float_input_is_a_syntax_error() {
        let document = VALID.replace("simulation_strings: [a, b]", "simulation_strings: [a, 2.5]");

        match ConfigLoader::load_from_str(&document) {
            Err(TuringMachineError::Configuration(ConfigurationError::Syntax(message))) => {
                assert!(message.contains("simulation_strings"), "{}", message);
                assert!(message.contains("quote it"), "{}", message);
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }
}
