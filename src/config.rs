//! Serde model of the declarative machine definition.
//!
//! ```yaml
//! q_states:
//!   q_list: [q0, q1]
//!   initial: q0
//!   final: q1
//! alphabet: [a]
//! tape_alphabet: [a, null]
//! delta:
//!   - params: { initial_state: q0, mem_cache_value: null, tape_input: a }
//!     output: { final_state: q1, mem_cache_value: a, tape_output: a, tape_displacement: R }
//! simulation_strings: [a, ""]
//! ```

use crate::types::Symbol;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The top-level fields every configuration must carry.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "q_states",
    "alphabet",
    "tape_alphabet",
    "delta",
    "simulation_strings",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    pub q_states: StateSet,
    pub alphabet: Vec<Symbol>,
    pub tape_alphabet: Vec<Symbol>,
    /// Character that stands for the blank symbol in inputs and rules.
    #[serde(default)]
    pub blank: Option<char>,
    pub delta: Vec<RuleRecord>,
    #[serde(deserialize_with = "scalars")]
    pub simulation_strings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSet {
    #[serde(deserialize_with = "scalars")]
    pub q_list: Vec<String>,
    #[serde(deserialize_with = "scalar")]
    pub initial: String,
    #[serde(rename = "final", deserialize_with = "scalar")]
    pub final_state: String,
}

/// One entry of `delta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub params: RuleParams,
    pub output: RuleOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleParams {
    #[serde(deserialize_with = "scalar")]
    pub initial_state: String,
    #[serde(default)]
    pub mem_cache_value: Symbol,
    #[serde(default)]
    pub tape_input: Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutput {
    #[serde(deserialize_with = "scalar")]
    pub final_state: String,
    #[serde(default)]
    pub mem_cache_value: Symbol,
    #[serde(default)]
    pub tape_output: Symbol,
    /// Kept as text so an unknown movement surfaces as an invalid-direction
    /// error when the table is built rather than as a parse failure.
    #[serde(deserialize_with = "scalar")]
    pub tape_displacement: String,
}

/// Text field that also accepts unquoted integers and booleans, since YAML
/// reads `111` or `0` as numbers. Decimal integers keep every digit at any
/// width the YAML reader supports. Floats are refused: their source text
/// cannot be recovered, so `1.50` or a 40-digit unary string would silently
/// turn into a different input.
struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TextVisitor).map(Text)
    }
}

struct TextVisitor;

impl Visitor<'_> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, an integer or a boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Err(E::custom(format!(
            "unquoted number {} cannot be kept as text exactly; quote it",
            v
        )))
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Text>::deserialize(deserializer)?
        .map(|text| text.0)
        .unwrap_or_default())
}

fn scalars<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Vec::<Option<Text>>::deserialize(deserializer)?
        .into_iter()
        .map(|text| text.map(|t| t.0).unwrap_or_default())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_scalars_become_text() {
        let yaml = r#"
q_states: { q_list: [0, 1], initial: 0, final: 1 }
alphabet: [1]
tape_alphabet: [1, ~]
delta:
  - params: { initial_state: 0, tape_input: 1 }
    output: { final_state: 1, tape_output: 1, tape_displacement: R }
simulation_strings: [111, "", ~]
"#;

        let config: MachineConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.q_states.q_list, vec!["0", "1"]);
        assert_eq!(config.q_states.final_state, "1");
        assert_eq!(config.simulation_strings, vec!["111", "", ""]);
        assert_eq!(config.tape_alphabet, vec![Symbol::Char('1'), Symbol::Blank]);
        assert_eq!(config.delta[0].params.mem_cache_value, Symbol::Blank);
        assert_eq!(config.delta[0].output.tape_displacement, "R");
    }

    #[test]
    fn test_blank_alias_field() {
        let yaml = r#"
q_states: { q_list: [q0], initial: q0, final: q0 }
alphabet: []
tape_alphabet: [_]
blank: _
delta: []
simulation_strings: []
"#;

        let config: MachineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.blank, Some('_'));
        assert_eq!(config.name, None);
    }

    #[test]
    fn test_long_unquoted_inputs_keep_every_digit() {
        let yaml = r#"
q_states: { q_list: [q0], initial: q0, final: q0 }
alphabet: [1]
tape_alphabet: [1]
delta: []
simulation_strings: [11111111111111111111, 111111111111111111111111111, 0110, -5]
"#;

        let config: MachineConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            config.simulation_strings,
            vec![
                "1".repeat(20),
                "1".repeat(27),
                "0110".to_string(),
                "-5".to_string()
            ]
        );
    }

    #[test]
    fn test_unquoted_float_is_refused() {
        let yaml = r#"
q_states: { q_list: [q0], initial: q0, final: q0 }
alphabet: [1]
tape_alphabet: [1]
delta: []
simulation_strings: ["1", 1.50]
"#;

        let error = serde_yaml::from_str::<MachineConfig>(yaml)
            .unwrap_err()
            .to_string();

        assert!(error.contains("simulation_strings"), "{}", error);
        assert!(error.contains("quote it"), "{}", error);
    }
}
