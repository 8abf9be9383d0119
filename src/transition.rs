//! The transition function δ: (state, cache, symbol) → (state, cache, symbol, movement).

use crate::types::{ConfigurationError, Direction, Symbol, TuringMachineError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// The left-hand side of a rule. Lookups are exact matches, there are no
/// wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    /// The state the machine must be in.
    pub state: String,
    /// The value the cache register must hold.
    pub cache: Symbol,
    /// The symbol under the head.
    pub symbol: Symbol,
}

impl TransitionKey {
    /// Creates a key from its three parts.
    pub fn new(state: impl Into<String>, cache: Symbol, symbol: Symbol) -> Self {
        Self {
            state: state.into(),
            cache,
            symbol,
        }
    }
}

/// The right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The state entered after the rule fires.
    pub next_state: String,
    /// The value stored into the cache register.
    pub next_cache: Symbol,
    /// The symbol written under the head before it moves.
    pub write: Symbol,
    pub direction: Direction,
}

/// A complete rule, `key → action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub key: TransitionKey,
    pub action: Action,
}

impl Transition {
    /// Creates a transition from a `(state, cache, symbol)` key and a
    /// `(next_state, next_cache, write, direction)` action.
    ///
    /// # Arguments
    ///
    /// * `key` - The state, cache value and tape symbol the rule matches.
    /// * `action` - The target state, new cache value, symbol to write and head movement.
    ///
    /// # Example
    ///
    /// ```
    /// use cachetur::{Direction, Symbol, Transition};
    ///
    /// let t = Transition::new(
    ///     ("q0", Symbol::Blank, Symbol::Char('a')),
    ///     ("q1", Symbol::Char('a'), Symbol::Char('a'), Direction::Right),
    /// );
    /// assert_eq!(t.to_string(), "δ([q0, B], a) = ([q1, a], a, R)");
    /// ```
    pub fn new(
        (state, cache, symbol): (&str, Symbol, Symbol),
        (next_state, next_cache, write, direction): (&str, Symbol, Symbol, Direction),
    ) -> Self {
        Self {
            key: TransitionKey::new(state, cache, symbol),
            action: Action {
                next_state: next_state.to_string(),
                next_cache,
                write,
                direction,
            },
        }
    }
}

impl Action {
    /// Formats the rule `(state, cache, symbol) → self` in formal notation,
    /// e.g. `δ([q0, B], a) = ([q1, a], a, R)`.
    pub fn formal(&self, state: &str, cache: Symbol, symbol: Symbol) -> String {
        format!(
            "δ([{}, {}], {}) = ([{}, {}], {}, {})",
            state, cache, symbol, self.next_state, self.next_cache, self.write, self.direction
        )
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = &self.key;
        f.write_str(&self.action.formal(&key.state, key.cache, key.symbol))
    }
}

/// The immutable rule mapping of a machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<TransitionKey, Action>,
}

impl TransitionTable {
    /// Builds the table, refusing to let a later rule overwrite an earlier one
    /// with the same key.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if every key is unique.
    /// * `Err(ConfigurationError::AmbiguousTransition)` naming the first repeated key.
    pub fn new(transitions: impl IntoIterator<Item = Transition>) -> Result<Self, TuringMachineError> {
        let mut rules = HashMap::new();

        for Transition { key, action } in transitions {
            match rules.entry(key) {
                Entry::Occupied(e) => {
                    let key: &TransitionKey = e.key();
                    return Err(ConfigurationError::AmbiguousTransition {
                        state: key.state.clone(),
                        cache: key.cache,
                        symbol: key.symbol,
                    }
                    .into());
                }
                Entry::Vacant(e) => {
                    e.insert(action);
                }
            }
        }

        Ok(Self { rules })
    }

    /// Finds the action for an exact (state, cache, symbol) match.
    pub fn get(&self, state: &str, cache: Symbol, symbol: Symbol) -> Option<&Action> {
        // HashMap<TransitionKey, _> cannot be queried by borrowed parts, so
        // the key is rebuilt per lookup.
        self.rules.get(&TransitionKey::new(state, cache, symbol))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TransitionKey, &Action)> {
        self.rules.iter()
    }
}
