//! This module defines the core data structures and types shared by the simulator,
//! including tape symbols, head movements, run outcomes, and error types.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The glyph used for blank cells and blank cache values in formal transcripts.
pub const BLANK_GLYPH: char = 'B';
/// The glyph used for blank cells in human-readable tape snapshots.
pub const SNAPSHOT_BLANK_GLYPH: char = '_';
/// The turnstile separating two instantaneous descriptions in a transcript line.
pub const TURNSTILE: char = '⊢';

/// A single tape cell value, also used as the value of the cache register.
///
/// `Blank` is a sentinel distinct from every alphabet member, so a machine whose
/// alphabet contains the character `B` is still unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Symbol {
    /// The blank symbol that fills the infinite tape on both ends.
    #[default]
    Blank,
    /// A symbol drawn from the tape alphabet.
    Char(char),
}

impl Symbol {
    /// Returns `true` if this is the blank symbol.
    pub fn is_blank(&self) -> bool {
        matches!(self, Symbol::Blank)
    }

    /// Returns the character of a non-blank symbol.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Symbol::Blank => None,
            Symbol::Char(c) => Some(*c),
        }
    }

    /// Maps a symbol equal to the machine's blank alias onto `Symbol::Blank`.
    pub fn normalize(self, blank: Option<char>) -> Self {
        match (self, blank) {
            (Symbol::Char(c), Some(alias)) if c == alias => Symbol::Blank,
            _ => self,
        }
    }

    /// Converts an input character into a symbol, honoring the blank alias.
    pub fn from_input(c: char, blank: Option<char>) -> Self {
        Symbol::Char(c).normalize(blank)
    }

    /// Renders the symbol using `glyph` for blank cells.
    pub fn glyph(&self, glyph: char) -> char {
        self.as_char().unwrap_or(glyph)
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph(BLANK_GLYPH))
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Symbol::Blank => serializer.serialize_none(),
            Symbol::Char(c) => serializer.serialize_char(*c),
        }
    }
}

struct SymbolVisitor;

impl<'de> Visitor<'de> for SymbolVisitor {
    type Value = Symbol;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a single-character symbol or null for blank")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Symbol, E> {
        Ok(Symbol::Blank)
    }

    fn visit_none<E: de::Error>(self) -> Result<Symbol, E> {
        Ok(Symbol::Blank)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Symbol, D::Error> {
        deserializer.deserialize_any(SymbolVisitor)
    }

    fn visit_char<E: de::Error>(self, c: char) -> Result<Symbol, E> {
        Ok(Symbol::Char(c))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Symbol, E> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Symbol::Char(c)),
            _ => Err(E::custom(format!(
                "symbol must be exactly one character, got {:?}",
                s
            ))),
        }
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Symbol, E> {
        match u32::try_from(v).ok().and_then(|d| char::from_digit(d, 10)) {
            Some(c) => Ok(Symbol::Char(c)),
            None => Err(E::custom(format!(
                "numeric symbol must be a single digit, got {}",
                v
            ))),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Symbol, E> {
        if v < 0 {
            return Err(E::custom(format!(
                "numeric symbol must be a single digit, got {}",
                v
            )));
        }
        self.visit_u64(v as u64)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SymbolVisitor)
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The single-letter code used in configuration files and transcripts.
    pub fn code(&self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "S" => Ok(Direction::Stay),
            other => Err(TuringMachineError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The machine entered its final state.
    Accepted,
    /// No transition matched the current configuration.
    Rejected,
    /// A caller-imposed step bound ran out before the machine halted.
    StepLimitExceeded,
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition was applied; carries its transcript line.
    Continue(String),
    /// The machine has halted.
    Halt(Halt),
}

/// Why the machine halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Halted in the final state.
    Accepted,
    /// Halted because no transition matched.
    Rejected,
}

impl From<Halt> for Outcome {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Accepted => Outcome::Accepted,
            Halt::Rejected => Outcome::Rejected,
        }
    }
}

/// Errors raised while building a machine from its declarative configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A required top-level field is absent.
    #[error("configuration does not contain '{0}'")]
    MissingField(String),
    /// `q_states` lacks the initial or the final state.
    #[error("q_states must specify '{0}'")]
    MissingState(String),
    /// Two rules share the same (state, cache, symbol) key.
    #[error("ambiguous transition for ({state}, {cache}, {symbol})")]
    AmbiguousTransition {
        state: String,
        cache: Symbol,
        symbol: Symbol,
    },
    /// A symbol field could not be interpreted.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),
    /// The document is not well-formed YAML or has the wrong shape.
    #[error("malformed configuration: {0}")]
    Syntax(String),
}

/// Represents the errors that can occur while loading or building a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The configuration is structurally unusable.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A rule specifies a movement outside {L, R, S}.
    #[error("Invalid direction: {0:?} (expected L, R or S)")]
    InvalidDirection(String),
    /// The configuration is well-formed but inconsistent.
    #[error("Machine validation error: {0}")]
    Validation(String),
    /// Reading or writing a file failed.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("L".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("R".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("S".parse::<Direction>().unwrap(), Direction::Stay);

        let error = "X".parse::<Direction>().unwrap_err();
        assert_eq!(error, TuringMachineError::InvalidDirection("X".to_string()));
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"Left\"");

        let back: Direction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Direction::Left);
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::Blank.to_string(), "B");
        assert_eq!(Symbol::Char('1').to_string(), "1");
        assert_eq!(Symbol::Blank.glyph(SNAPSHOT_BLANK_GLYPH), '_');
    }

    #[test]
    fn test_symbol_normalize_blank_alias() {
        assert_eq!(Symbol::from_input('_', Some('_')), Symbol::Blank);
        assert_eq!(Symbol::from_input('_', None), Symbol::Char('_'));
        assert_eq!(Symbol::from_input('a', Some('_')), Symbol::Char('a'));
    }

    #[test]
    fn test_symbol_deserialization() {
        let symbols: Vec<Symbol> = serde_json::from_str(r#"["a", null, 1]"#).unwrap();
        assert_eq!(
            symbols,
            vec![Symbol::Char('a'), Symbol::Blank, Symbol::Char('1')]
        );

        assert!(serde_json::from_str::<Symbol>(r#""ab""#).is_err());
        assert!(serde_json::from_str::<Symbol>("12").is_err());
    }

    #[test]
    fn test_error_display() {
        let error: TuringMachineError =
            ConfigurationError::MissingField("delta".to_string()).into();

        let message = format!("{}", error);
        assert!(message.contains("Configuration error"));
        assert!(message.contains("delta"));
    }
}
