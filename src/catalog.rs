//! Sample machines shipped with the crate.
//!
//! The definitions live under `machines/` and are compiled in with
//! `include_str!`, then parsed once on first use. A definition that fails to
//! parse is logged and left out of the catalog.

use crate::config::MachineConfig;
use crate::loader::ConfigLoader;
use crate::types::TuringMachineError;
use tracing::warn;

// Embedded sample machines, as (name, YAML) pairs.
const MACHINE_TEXTS: [(&str, &str); 3] = [
    ("first-last", include_str!("../machines/first-last.yaml")),
    ("unary-double", include_str!("../machines/unary-double.yaml")),
    ("unary-successor", include_str!("../machines/unary-successor.yaml")),
];

lazy_static::lazy_static! {
    /// Every embedded machine that parsed, named after its catalog key unless
    /// the YAML sets its own `name`.
    pub static ref MACHINES: Vec<MachineConfig> = MACHINE_TEXTS
        .iter()
        .filter_map(|(name, text)| match ConfigLoader::load_from_str(text) {
            Ok(mut config) => {
                config.name.get_or_insert_with(|| name.to_string());
                Some(config)
            }
            Err(e) => {
                warn!(name = *name, error = %e, "failed to parse embedded machine");
                None
            }
        })
        .collect();
}

/// Lookup over the embedded machines.
pub struct Catalog;

impl Catalog {
    /// Names of all embedded machines.
    pub fn names() -> Vec<String> {
        MACHINES
            .iter()
            .filter_map(|config| config.name.clone())
            .collect()
    }

    /// Get an embedded machine configuration by name.
    ///
    /// # Arguments
    ///
    /// * `name` - A catalog name as listed by `Catalog::names`.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineConfig)` with a copy of the configuration.
    /// * `Err(TuringMachineError::Validation)` if no machine has that name.
    pub fn get(name: &str) -> Result<MachineConfig, TuringMachineError> {
        MACHINES
            .iter()
            .find(|config| config.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::Validation(format!("Machine '{}' not found", name))
            })
    }
}
