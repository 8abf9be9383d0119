//! Empirical runtime analysis: time and step counts over unary inputs of
//! increasing length, and least-squares polynomial fits over the results.

use crate::machine::Machine;
use crate::simulator::Simulator;
use crate::types::{Outcome, Symbol};
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Coefficients smaller than this are left out of printed equations.
const EPSILON: f64 = 1e-10;

/// One row of the measurement table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Input length.
    pub n: usize,
    pub input: String,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Transitions applied, counted by the simulator.
    pub steps: usize,
    /// Cells holding `1` on the final tape.
    pub ones: usize,
    pub outcome: Outcome,
}

/// Inputs `""`, `"1"`, `"11"`, … up to `max_n` ones, paired with their length.
pub fn unary_inputs(max_n: usize) -> Vec<(usize, String)> {
    (0..=max_n).map(|n| (n, "1".repeat(n))).collect()
}

/// Runs `input` `repetitions` times (at least once) and records timing
/// statistics together with the step count and result of the run.
pub fn measure(
    machine: &Machine,
    n: usize,
    input: &str,
    repetitions: usize,
    max_steps: Option<usize>,
) -> Measurement {
    let simulator = Simulator::new(machine);
    let mut times = Vec::with_capacity(repetitions.max(1));
    let mut last = None;

    for _ in 0..repetitions.max(1) {
        let start = Instant::now();
        let run = simulator.run_with_limit(input, max_steps);
        times.push(start.elapsed().as_secs_f64() * 1000.0);
        last = Some(run);
    }

    let (steps, ones, outcome) = last
        .map(|run| (run.steps, run.tape.count(Symbol::Char('1')), run.outcome))
        .unwrap_or((0, 0, Outcome::Rejected));

    let mean_ms = times.iter().sum::<f64>() / times.len() as f64;
    let min_ms = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_ms = times.iter().copied().fold(0.0, f64::max);

    debug!(n, steps, mean_ms, "measured");

    Measurement {
        n,
        input: input.to_string(),
        mean_ms,
        min_ms,
        max_ms,
        steps,
        ones,
        outcome,
    }
}

/// Renders measurements as CSV with a header row.
pub fn to_csv(measurements: &[Measurement]) -> String {
    let mut csv = String::from("n,input,mean_ms,min_ms,max_ms,steps,ones,outcome\n");
    for m in measurements {
        csv.push_str(&format!(
            "{},{},{:.6},{:.6},{:.6},{},{},{:?}\n",
            m.n, m.input, m.mean_ms, m.min_ms, m.max_ms, m.steps, m.ones, m.outcome
        ));
    }
    csv
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegressionError {
    #[error("x has {0} points but y has {1}")]
    LengthMismatch(usize, usize),
    #[error("degree {degree} needs more than {degree} points, got {points}")]
    NotEnoughPoints { degree: usize, points: usize },
    #[error("normal equations are singular")]
    Singular,
}

/// A fitted polynomial `c0 + c1*n + ... + cd*n^d`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fit {
    pub degree: usize,
    /// `coefficients[i]` multiplies `n^i`.
    pub coefficients: Vec<f64>,
    pub r2: f64,
    pub mse: f64,
}

impl Fit {
    pub fn predict(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }

    /// Human-readable equation, e.g. `1.000000 + 2.500000*n - 0.100000*n^2`.
    pub fn equation(&self) -> String {
        let terms: Vec<String> = self
            .coefficients
            .iter()
            .enumerate()
            .filter(|(_, c)| c.abs() > EPSILON)
            .map(|(i, c)| match i {
                0 => format!("{:.6}", c),
                1 => format!("{:.6}*n", c),
                _ => format!("{:.6}*n^{}", c, i),
            })
            .collect();

        if terms.is_empty() {
            return "0".to_string();
        }

        terms.join(" + ").replace("+ -", "- ")
    }
}

/// Least-squares polynomial fit of `y` against `x`.
///
/// `x` is scaled into [-1, 1] before solving the normal equations, then the
/// coefficients are mapped back, which keeps high degrees well-conditioned.
pub fn fit_polynomial(x: &[f64], y: &[f64], degree: usize) -> Result<Fit, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch(x.len(), y.len()));
    }
    if x.len() <= degree {
        return Err(RegressionError::NotEnoughPoints {
            degree,
            points: x.len(),
        });
    }

    let scale = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let terms = degree + 1;

    // Normal equations: (XᵀX) c = Xᵀy, augmented with Xᵀy as the last column.
    let mut system = vec![vec![0.0; terms + 1]; terms];
    for (&xi, &yi) in x.iter().zip(y) {
        let powers: Vec<f64> = (0..terms).map(|k| (xi / scale).powi(k as i32)).collect();
        for row in 0..terms {
            for col in 0..terms {
                system[row][col] += powers[row] * powers[col];
            }
            system[row][terms] += powers[row] * yi;
        }
    }

    let scaled = solve(system)?;
    let coefficients: Vec<f64> = scaled
        .iter()
        .enumerate()
        .map(|(k, c)| c / scale.powi(k as i32))
        .collect();

    let mut fit = Fit {
        degree,
        coefficients,
        r2: 0.0,
        mse: 0.0,
    };

    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| (yi - fit.predict(xi)).powi(2))
        .sum();
    let ss_tot: f64 = y.iter().map(|yi| (yi - mean).powi(2)).sum();

    fit.mse = ss_res / y.len() as f64;
    fit.r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res <= EPSILON {
        1.0
    } else {
        0.0
    };

    Ok(fit)
}

/// Fits every degree from 1 to `max_degree`, skipping degrees the data cannot
/// support.
pub fn fit_degrees(x: &[f64], y: &[f64], max_degree: usize) -> Vec<Fit> {
    (1..=max_degree)
        .filter_map(|degree| fit_polynomial(x, y, degree).ok())
        .collect()
}

/// The fit with the highest R². Ties go to the lower degree.
pub fn best_fit(fits: &[Fit]) -> Option<&Fit> {
    fits.iter().fold(None, |best: Option<&Fit>, fit| match best {
        Some(b) if b.r2 >= fit.r2 => Some(b),
        _ => Some(fit),
    })
}

/// Gaussian elimination with partial pivoting on an augmented matrix.
fn solve(mut m: Vec<Vec<f64>>) -> Result<Vec<f64>, RegressionError> {
    let n = m.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
            .ok_or(RegressionError::Singular)?;
        if m[pivot][col].abs() < 1e-12 {
            return Err(RegressionError::Singular);
        }
        m.swap(col, pivot);

        for row in col + 1..n {
            let factor = m[row][col] / m[col][col];
            for k in col..=n {
                let delta = factor * m[col][k];
                m[row][k] -= delta;
            }
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| m[row][k] * solution[k]).sum();
        solution[row] = (m[row][n] - tail) / m[row][row];
    }

    Ok(solution)
}

/// The full result of an analysis session, as exported to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub machine: Option<String>,
    pub measurements: Vec<Measurement>,
    pub time_fits: Vec<Fit>,
    pub step_fits: Vec<Fit>,
}

impl AnalysisReport {
    /// Measures every unary input up to `max_n` and fits time and steps.
    pub fn collect(
        machine: &Machine,
        max_n: usize,
        repetitions: usize,
        max_degree: usize,
        max_steps: Option<usize>,
    ) -> Self {
        let measurements: Vec<Measurement> = unary_inputs(max_n)
            .iter()
            .map(|(n, input)| measure(machine, *n, input, repetitions, max_steps))
            .collect();

        let x: Vec<f64> = measurements.iter().map(|m| m.n as f64).collect();
        let times: Vec<f64> = measurements.iter().map(|m| m.mean_ms).collect();
        let steps: Vec<f64> = measurements.iter().map(|m| m.steps as f64).collect();

        Self {
            machine: machine.name().map(str::to_string),
            time_fits: fit_degrees(&x, &times, max_degree),
            step_fits: fit_degrees(&x, &steps, max_degree),
            measurements,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
