//! This module defines the `Machine` struct, the immutable description of a single-tape
//! Turing machine with a cache register: its states, alphabets, blank alias, and
//! transition table. A `Machine` is built once and shared by any number of runs.

use crate::analyzer::analyze;
use crate::config::MachineConfig;
use crate::tape::Tape;
use crate::transition::{Transition, TransitionTable};
use crate::types::{Direction, Symbol, TuringMachineError};
use tracing::info;

/// A validated machine definition.
///
/// `Machine` holds no run state. The current state, cache value and tape of a
/// run live in a `simulator::Execution`, so a single machine can be shared
/// across threads and reused for every input.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    name: Option<String>,
    states: Vec<String>,
    initial_state: String,
    final_state: String,
    alphabet: Vec<Symbol>,
    tape_alphabet: Vec<Symbol>,
    blank: Option<char>,
    table: TransitionTable,
}

impl Machine {
    /// Starts building a machine by hand.
    ///
    /// # Arguments
    ///
    /// * `initial_state` - The state every run starts in.
    /// * `final_state` - The accepting state. Entering it halts the run.
    ///
    /// # Example
    ///
    /// ```
    /// use cachetur::{Direction, Machine, Simulator, Symbol, Transition};
    ///
    /// let machine = Machine::builder("q0", "qf")
    ///     .transition(Transition::new(
    ///         ("q0", Symbol::Blank, Symbol::Char('a')),
    ///         ("qf", Symbol::Blank, Symbol::Char('b'), Direction::Stay),
    ///     ))
    ///     .build()
    ///     .unwrap();
    ///
    /// let run = Simulator::new(&machine).run("a");
    /// assert!(run.accepted());
    /// assert_eq!(run.tape.content(), "b");
    /// ```
    pub fn builder(initial_state: &str, final_state: &str) -> MachineBuilder {
        MachineBuilder {
            initial_state: initial_state.to_string(),
            final_state: final_state.to_string(),
            ..MachineBuilder::default()
        }
    }

    /// Builds a machine from a loaded configuration.
    ///
    /// The configuration is analyzed first, then every rule is converted:
    /// symbols equal to the blank alias become `Symbol::Blank` and each
    /// `tape_displacement` must be one of `L`, `R` or `S`.
    ///
    /// # Arguments
    ///
    /// * `config` - A configuration as produced by `ConfigLoader`.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the configuration is consistent.
    /// * `Err(TuringMachineError::Validation)` if the analyzer finds an inconsistency.
    /// * `Err(TuringMachineError::InvalidDirection)` for an unknown movement.
    /// * `Err(TuringMachineError::Configuration)` if two rules share a key.
    pub fn from_config(config: &MachineConfig) -> Result<Self, TuringMachineError> {
        analyze(config)?;

        let blank = config.blank;
        let transitions = config
            .delta
            .iter()
            .map(|rule| -> Result<Transition, TuringMachineError> {
                let direction: Direction = rule.output.tape_displacement.parse()?;
                Ok(Transition::new(
                    (
                        rule.params.initial_state.as_str(),
                        rule.params.mem_cache_value.normalize(blank),
                        rule.params.tape_input.normalize(blank),
                    ),
                    (
                        rule.output.final_state.as_str(),
                        rule.output.mem_cache_value.normalize(blank),
                        rule.output.tape_output.normalize(blank),
                        direction,
                    ),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let machine = Self {
            name: config.name.clone(),
            states: config.q_states.q_list.clone(),
            initial_state: config.q_states.initial.clone(),
            final_state: config.q_states.final_state.clone(),
            alphabet: config.alphabet.iter().map(|s| s.normalize(blank)).collect(),
            tape_alphabet: config
                .tape_alphabet
                .iter()
                .map(|s| s.normalize(blank))
                .collect(),
            blank,
            table: TransitionTable::new(transitions)?,
        };

        info!(
            name = machine.name().unwrap_or("<unnamed>"),
            states = machine.states.len(),
            rules = machine.table.len(),
            "machine built"
        );

        Ok(machine)
    }

    /// The display name, if the configuration carried one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// All declared states, in declaration order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// The accepting state.
    pub fn final_state(&self) -> &str {
        &self.final_state
    }

    /// The input alphabet Σ.
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    /// The tape alphabet Γ, with any blank alias already normalized.
    pub fn tape_alphabet(&self) -> &[Symbol] {
        &self.tape_alphabet
    }

    /// The character that stands for blank in inputs, if any.
    pub fn blank(&self) -> Option<char> {
        self.blank
    }

    /// The transition function δ.
    pub fn transitions(&self) -> &TransitionTable {
        &self.table
    }

    /// Loads `input` onto a fresh tape, one symbol per cell.
    pub fn load_input(&self, input: &str) -> Tape {
        Tape::from_input(input, self.blank)
    }
}

/// Hand-assembles a `Machine`, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MachineBuilder {
    name: Option<String>,
    states: Vec<String>,
    initial_state: String,
    final_state: String,
    alphabet: Vec<Symbol>,
    tape_alphabet: Vec<Symbol>,
    blank: Option<char>,
    transitions: Vec<Transition>,
}

impl MachineBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Declares states up front. Any state named by a rule is added anyway.
    pub fn states<'a>(mut self, states: impl IntoIterator<Item = &'a str>) -> Self {
        self.states = states.into_iter().map(str::to_string).collect();
        self
    }

    pub fn alphabet(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        self.alphabet = symbols.into_iter().collect();
        self
    }

    pub fn tape_alphabet(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        self.tape_alphabet = symbols.into_iter().collect();
        self
    }

    /// Sets the character that stands for blank. Rules and inputs using it
    /// are normalized to `Symbol::Blank`.
    pub fn blank(mut self, blank: char) -> Self {
        self.blank = Some(blank);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Finishes the machine. States that appear only in rules are added to the
    /// state set.
    ///
    /// Unlike `Machine::from_config`, no analysis is run.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` on success.
    /// * `Err(TuringMachineError::Configuration)` if two rules share a key.
    pub fn build(self) -> Result<Machine, TuringMachineError> {
        let blank = self.blank;
        let mut states = self.states;

        let referenced = [&self.initial_state, &self.final_state]
            .into_iter()
            .cloned()
            .chain(
                self.transitions
                    .iter()
                    .flat_map(|t| [t.key.state.clone(), t.action.next_state.clone()]),
            )
            .collect::<Vec<_>>();
        for state in referenced {
            if !states.contains(&state) {
                states.push(state);
            }
        }

        let transitions = self.transitions.into_iter().map(|mut t| {
            t.key.cache = t.key.cache.normalize(blank);
            t.key.symbol = t.key.symbol.normalize(blank);
            t.action.next_cache = t.action.next_cache.normalize(blank);
            t.action.write = t.action.write.normalize(blank);
            t
        });

        Ok(Machine {
            name: self.name,
            states,
            initial_state: self.initial_state,
            final_state: self.final_state,
            alphabet: self.alphabet,
            tape_alphabet: self.tape_alphabet,
            blank,
            table: TransitionTable::new(transitions)?,
        })
    }
}
