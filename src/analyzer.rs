//! This module provides functions for analyzing machine configurations to detect common errors
//! and inconsistencies before a transition table is built. This includes checks for declared
//! states, rule endpoints, and symbols outside the tape alphabet.

use crate::config::MachineConfig;
use crate::types::{Symbol, TuringMachineError};
use std::collections::{BTreeSet, HashSet};

/// Represents various errors that can be found during the analysis of a machine configuration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The initial state is not listed in `q_list`.
    InvalidStartState(String),
    /// The final state is not listed in `q_list`.
    InvalidFinalState(String),
    /// Rules reference states that are not listed in `q_list`.
    UndeclaredStates(Vec<String>),
    /// Rules read or write symbols that are not in the tape alphabet.
    InvalidTapeSymbols(Vec<char>),
    /// Input alphabet symbols missing from the tape alphabet.
    AlphabetNotInTapeAlphabet(Vec<char>),
}

impl From<AnalysisError> for TuringMachineError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::Validation(format!("Initial state '{}' is not in q_list", state))
            }
            AnalysisError::InvalidFinalState(state) => {
                TuringMachineError::Validation(format!("Final state '{}' is not in q_list", state))
            }
            AnalysisError::UndeclaredStates(states) => TuringMachineError::Validation(format!(
                "Transitions reference undeclared states: {:?}",
                states
            )),
            AnalysisError::InvalidTapeSymbols(symbols) => TuringMachineError::Validation(format!(
                "Transitions use symbols outside the tape alphabet: {:?}",
                symbols
            )),
            AnalysisError::AlphabetNotInTapeAlphabet(symbols) => {
                TuringMachineError::Validation(format!(
                    "Input alphabet symbols missing from the tape alphabet: {:?}",
                    symbols
                ))
            }
        }
    }
}

/// Analyzes a machine configuration for consistency errors.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::Validation)` describing the first violated check.
pub fn analyze(config: &MachineConfig) -> Result<(), TuringMachineError> {
    [
        check_initial_and_final_states,
        check_declared_states,
        check_rule_symbols,
        check_alphabet,
    ]
    .iter()
    .find_map(|f| f(config).err())
    .map_or(Ok(()), |error| Err(error.into()))
}

/// Characters of `simulation_strings` that are neither in the tape alphabet
/// nor the blank alias. Such inputs usually get rejected on the first step.
pub fn unknown_input_symbols(config: &MachineConfig) -> Vec<char> {
    let known = tape_alphabet(config);

    config
        .simulation_strings
        .iter()
        .flat_map(|s| s.chars())
        .map(|c| Symbol::from_input(c, config.blank))
        .filter(|s| !known.contains(s))
        .filter_map(|s| s.as_char())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn tape_alphabet(config: &MachineConfig) -> HashSet<Symbol> {
    config
        .tape_alphabet
        .iter()
        .map(|s| s.normalize(config.blank))
        .chain(std::iter::once(Symbol::Blank))
        .collect()
}

fn check_initial_and_final_states(config: &MachineConfig) -> Result<(), AnalysisError> {
    let states = &config.q_states;

    if !states.q_list.contains(&states.initial) {
        return Err(AnalysisError::InvalidStartState(states.initial.clone()));
    }

    if !states.q_list.contains(&states.final_state) {
        return Err(AnalysisError::InvalidFinalState(states.final_state.clone()));
    }

    Ok(())
}

fn check_declared_states(config: &MachineConfig) -> Result<(), AnalysisError> {
    let declared: HashSet<&String> = config.q_states.q_list.iter().collect();

    let undeclared: BTreeSet<String> = config
        .delta
        .iter()
        .flat_map(|rule| [&rule.params.initial_state, &rule.output.final_state])
        .filter(|state| !declared.contains(state))
        .cloned()
        .collect();

    if !undeclared.is_empty() {
        return Err(AnalysisError::UndeclaredStates(undeclared.into_iter().collect()));
    }

    Ok(())
}

fn check_rule_symbols(config: &MachineConfig) -> Result<(), AnalysisError> {
    let known = tape_alphabet(config);

    let invalid: BTreeSet<char> = config
        .delta
        .iter()
        .flat_map(|rule| [rule.params.tape_input, rule.output.tape_output])
        .map(|s| s.normalize(config.blank))
        .filter(|s| !known.contains(s))
        .filter_map(|s| s.as_char())
        .collect();

    if !invalid.is_empty() {
        return Err(AnalysisError::InvalidTapeSymbols(invalid.into_iter().collect()));
    }

    Ok(())
}

fn check_alphabet(config: &MachineConfig) -> Result<(), AnalysisError> {
    let known = tape_alphabet(config);

    let missing: Vec<char> = config
        .alphabet
        .iter()
        .map(|s| s.normalize(config.blank))
        .filter(|s| !known.contains(s))
        .filter_map(|s| s.as_char())
        .collect();

    if !missing.is_empty() {
        return Err(AnalysisError::AlphabetNotInTapeAlphabet(missing));
    }

    Ok(())
}
