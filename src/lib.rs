//! This crate simulates a deterministic single-tape Turing machine extended with a
//! cache register. It includes modules for loading declarative YAML definitions,
//! running machines with a formal step-by-step transcript, writing reports, and
//! measuring runtime growth over inputs of increasing size.

pub mod analysis;
pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod loader;
pub mod machine;
pub mod report;
pub mod settings;
pub mod simulator;
pub mod tape;
pub mod transition;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the embedded machine catalog.
pub use catalog::{Catalog, MACHINES};
/// Re-exports the configuration model.
pub use config::MachineConfig;
/// Re-exports the `ConfigLoader` struct from the loader module.
pub use loader::ConfigLoader;
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
pub use settings::Settings;
/// Re-exports the run driver and its result.
pub use simulator::{Execution, Run, Simulator};
pub use tape::Tape;
pub use transition::{Action, Transition, TransitionKey, TransitionTable};
/// Re-exports the shared types.
pub use types::{
    ConfigurationError, Direction, Halt, Outcome, Step, Symbol, TuringMachineError,
};
