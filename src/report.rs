//! Plain-text reports, one file per simulated input string.

use crate::settings::Settings;
use crate::simulator::Run;
use crate::types::{Outcome, TuringMachineError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const RULE: usize = 50;
const SEPARATOR: usize = 30;

/// Renders the report for one run.
///
/// ```text
/// --------------------------------------------------
/// Simulation for input: ab
/// --------------------------------------------------
///
/// Transitions:
/// δ([q0, B], a) = ...
///
/// ------------------------------
/// FINAL RESULT:
/// Tape: ab
/// Length: 2
/// String ACCEPTED ✔
/// ------------------------------
/// ```
pub fn render(input: &str, run: &Run, settings: &Settings) -> String {
    let mut lines = vec![
        "-".repeat(RULE),
        format!("Simulation for input: {}", input),
        "-".repeat(RULE),
        String::new(),
        "Transitions:".to_string(),
    ];
    lines.extend(run.transcript.iter().cloned());

    lines.push(String::new());
    lines.push("-".repeat(SEPARATOR));
    lines.push("FINAL RESULT:".to_string());

    if settings.print_result {
        let content = run.tape.content();
        lines.push(format!("Tape: {}", content));
        if settings.print_length {
            lines.push(format!("Length: {}", content.chars().count()));
        }
    }

    lines.push(match run.outcome {
        Outcome::Accepted => "String ACCEPTED ✔".to_string(),
        Outcome::Rejected => "String REJECTED ✘".to_string(),
        Outcome::StepLimitExceeded => format!("Step limit exceeded after {} steps ⧗", run.steps),
    });
    lines.push("-".repeat(SEPARATOR));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Writes `simulation_<index>.txt` into the configured output directory,
/// creating it if needed. Returns the path written.
pub fn write_report(
    index: usize,
    input: &str,
    run: &Run,
    settings: &Settings,
) -> Result<PathBuf, TuringMachineError> {
    let dir: &Path = &settings.output_dir;
    fs::create_dir_all(dir).map_err(|e| {
        TuringMachineError::FileError(format!(
            "Failed to create directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let path = dir.join(format!("simulation_{}.txt", index));
    fs::write(&path, render(input, run, settings)).map_err(|e| {
        TuringMachineError::FileError(format!("Failed to write {}: {}", path.display(), e))
    })?;

    debug!(path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Machine;
    use crate::simulator::Simulator;
    use crate::transition::Transition;
    use crate::types::{Direction, Symbol};
    use tempfile::tempdir;

    fn machine() -> Machine {
        Machine::builder("q0", "q1")
            .transition(Transition::new(
                ("q0", Symbol::Blank, 'a'.into()),
                ("q1", Symbol::Blank, 'a'.into(), Direction::Right),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_accepted() {
        let machine = machine();
        let run = Simulator::new(&machine).run("aa");
        let report = render("aa", &run, &Settings::default());

        assert!(report.contains("Simulation for input: aa"));
        assert!(report.contains(&run.transcript[0]));
        assert!(report.contains("FINAL RESULT:\nTape: aa\nLength: 2\nString ACCEPTED ✔\n"));
    }

    #[test]
    fn test_render_rejected_without_result() {
        let machine = machine();
        let run = Simulator::new(&machine).run("b");
        let settings = Settings {
            print_result: false,
            ..Settings::default()
        };

        let report = render("b", &run, &settings);

        assert!(!report.contains("Tape:"));
        assert!(report.contains("FINAL RESULT:\nString REJECTED ✘\n"));
    }

    #[test]
    fn test_render_without_length() {
        let machine = machine();
        let run = Simulator::new(&machine).run("a");
        let settings = Settings {
            print_length: false,
            ..Settings::default()
        };

        let report = render("a", &run, &settings);
        assert!(report.contains("Tape: a\nString ACCEPTED ✔"));
        assert!(!report.contains("Length:"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().join("nested"),
            ..Settings::default()
        };
        let machine = machine();
        let run = Simulator::new(&machine).run("a");

        let path = write_report(3, "a", &run, &settings).unwrap();

        assert_eq!(path, dir.path().join("nested").join("simulation_3.txt"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            render("a", &run, &settings)
        );
    }
}
