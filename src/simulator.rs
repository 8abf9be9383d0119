//! This module drives a `Machine` over an input string. Each run owns its own
//! configuration (state, cache, tape, head), so one `Machine` can serve any number
//! of runs, including runs on different threads.

use crate::machine::Machine;
use crate::tape::Tape;
use crate::types::{Halt, Outcome, Step, Symbol, BLANK_GLYPH, TURNSTILE};
use std::fmt::Write;
use tracing::{debug, trace};

/// The result of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub outcome: Outcome,
    /// One formal line per applied transition.
    pub transcript: Vec<String>,
    /// The tape as the run left it.
    pub tape: Tape,
    /// Number of transitions applied.
    pub steps: usize,
}

impl Run {
    /// Returns `true` if the run ended in the final state.
    pub fn accepted(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}

/// Runs a machine on input strings.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    machine: &'a Machine,
}

impl<'a> Simulator<'a> {
    /// Creates a simulator for `machine`. The machine is only borrowed, so
    /// many simulators may share it.
    pub fn new(machine: &'a Machine) -> Self {
        Self { machine }
    }

    /// Runs until the machine accepts or rejects. There is no step bound: a
    /// machine that never halts on `input` never returns. Use `run_bounded`
    /// when that matters.
    pub fn run(&self, input: &str) -> Run {
        self.run_with_limit(input, None)
    }

    /// Like `run`, but gives up with `Outcome::StepLimitExceeded` once
    /// `max_steps` transitions have been applied without halting.
    pub fn run_bounded(&self, input: &str, max_steps: usize) -> Run {
        self.run_with_limit(input, Some(max_steps))
    }

    /// Runs `input` from the initial configuration.
    ///
    /// # Arguments
    ///
    /// * `input` - The initial tape content, one cell per character.
    /// * `max_steps` - Upper bound on applied transitions, or `None` to run until halt.
    ///
    /// # Returns
    ///
    /// A `Run` whose outcome is `StepLimitExceeded` only if the machine had not
    /// halted after `max_steps` transitions. A machine that enters the final
    /// state on exactly its last allowed transition is accepted.
    pub fn run_with_limit(&self, input: &str, max_steps: Option<usize>) -> Run {
        self.execution(input).finish(max_steps, |_, _| {})
    }

    /// Starts a step-by-step execution of `input`.
    pub fn execution(&self, input: &str) -> Execution<'a> {
        Execution {
            machine: self.machine,
            input: input.to_string(),
            state: self.machine.initial_state().to_string(),
            cache: Symbol::Blank,
            tape: self.machine.load_input(input),
            steps: 0,
            halted: None,
        }
    }
}

/// A single run in progress.
#[derive(Debug, Clone)]
pub struct Execution<'a> {
    machine: &'a Machine,
    input: String,
    state: String,
    cache: Symbol,
    tape: Tape,
    steps: usize,
    halted: Option<Halt>,
}

impl Execution<'_> {
    /// Applies one transition.
    ///
    /// # Returns
    ///
    /// * `Step::Continue(line)` with the transcript line of the applied rule.
    /// * `Step::Halt(Halt::Accepted)` once the final state has been entered.
    /// * `Step::Halt(Halt::Rejected)` if no rule matches. The tape is left as is.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.halted {
            return Step::Halt(halt);
        }

        let machine = self.machine;
        let before = self.describe();
        let symbol = self.tape.read();

        let Some(action) = machine.transitions().get(&self.state, self.cache, symbol) else {
            trace!(state = %self.state, cache = %self.cache, %symbol, "no transition");
            self.halted = Some(Halt::Rejected);
            return Step::Halt(Halt::Rejected);
        };

        let rule = action.formal(&self.state, self.cache, symbol);

        self.tape.write(action.write);
        self.cache = action.next_cache;
        self.tape.move_head(action.direction);
        self.state.clone_from(&action.next_state);
        self.steps += 1;

        let after = self.describe();
        trace!(step = self.steps, %rule, "transition applied");

        if self.state == machine.final_state() {
            self.halted = Some(Halt::Accepted);
        }

        Step::Continue(format!("{rule:<40} {before:<20} {TURNSTILE}   {after}"))
    }

    /// Steps until the machine halts or `max_steps` transitions have been
    /// applied, and collects the result.
    ///
    /// `observe` is called after every applied transition with the execution
    /// and that transition's transcript line.
    pub fn finish<F>(mut self, max_steps: Option<usize>, mut observe: F) -> Run
    where
        F: FnMut(&Self, &str),
    {
        debug!(input = %self.input, ?max_steps, "run started");

        let mut transcript = Vec::new();
        let outcome = loop {
            if let Some(halt) = self.halted {
                break halt.into();
            }
            if max_steps.is_some_and(|max| self.steps >= max) {
                break Outcome::StepLimitExceeded;
            }

            match self.step() {
                Step::Continue(line) => {
                    observe(&self, &line);
                    transcript.push(line);
                }
                Step::Halt(halt) => break halt.into(),
            }
        };

        debug!(input = %self.input, ?outcome, steps = self.steps, "run finished");

        Run {
            outcome,
            transcript,
            steps: self.steps,
            tape: self.tape,
        }
    }

    /// `Some` once the execution has halted.
    pub fn halted(&self) -> Option<Halt> {
        self.halted
    }

    /// The current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The current cache register value.
    pub fn cache(&self) -> Symbol {
        self.cache
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Transitions applied so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The current instantaneous description.
    pub fn describe(&self) -> String {
        instantaneous_description(&self.tape, &self.state, self.cache)
    }

    /// Three-line debugging view of the tape and state.
    pub fn snapshot(&self) -> String {
        self.tape.snapshot(&self.state)
    }
}

/// Formats an instantaneous description: the tape as a flat string with
/// `[state,cache]` inserted right before the cell under the head.
///
/// The head may sit outside the materialized cells between a move and the
/// next access; such cells are shown as blanks without touching the tape.
///
/// ```text
/// a[q1,a]bB
/// ```
pub fn instantaneous_description(tape: &Tape, state: &str, cache: Symbol) -> String {
    let (cells, index) = tape.padded();

    let mut id = String::new();
    for (i, symbol) in cells.iter().enumerate() {
        if i == index {
            let _ = write!(id, "[{},{}]", state, cache);
        }
        id.push(symbol.glyph(BLANK_GLYPH));
    }

    id
}
