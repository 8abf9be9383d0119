use cachetur::analysis::{best_fit, to_csv, AnalysisReport, Fit};
use cachetur::analyzer::unknown_input_symbols;
use cachetur::report::write_report;
use cachetur::settings::DEFAULT_OUTPUT_DIR;
use cachetur::{
    Catalog, ConfigLoader, Machine, MachineConfig, Outcome, Run, Settings, Simulator,
    TuringMachineError,
};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// A single-tape Turing machine simulator with a cache register.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  cachetur-cli simulate machines/first-last.yaml
  cachetur-cli analyze --builtin unary-double --max-n 10
  cat machines/unary-successor.yaml | cachetur-cli simulate")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Source {
    /// Path to a YAML machine definition.
    /// Read from stdin when omitted and stdin is not a terminal.
    config: Option<PathBuf>,

    /// Use an embedded machine instead of a file (see `list`)
    #[clap(short, long, conflicts_with = "config")]
    builtin: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every simulation string and write one report per input
    Simulate {
        #[clap(flatten)]
        source: Source,

        /// Directory for the report files
        #[clap(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Give up on an input after this many transitions
        #[clap(long)]
        max_steps: Option<usize>,

        /// Leave the final tape content out of the reports
        #[clap(long)]
        no_result: bool,

        /// Leave the final tape length out of the reports
        #[clap(long)]
        no_length: bool,

        /// Print a tape snapshot after each step
        #[clap(short = 'd', long)]
        debug: bool,
    },
    /// Measure time and steps over unary inputs and fit polynomials
    Analyze {
        #[clap(flatten)]
        source: Source,

        /// Largest input length to measure
        #[clap(long, default_value_t = 15)]
        max_n: usize,

        /// Timed repetitions per input
        #[clap(long, default_value_t = 5)]
        repetitions: usize,

        /// Highest polynomial degree to fit
        #[clap(long, default_value_t = 5)]
        max_degree: usize,

        /// Directory for analysis.json and analysis.csv
        #[clap(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Give up on an input after this many transitions
        #[clap(long)]
        max_steps: Option<usize>,
    },
    /// List the embedded machines
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Simulate {
            source,
            output,
            max_steps,
            no_result,
            no_length,
            debug,
        } => {
            let settings = Settings {
                output_dir: output,
                print_result: !no_result,
                print_length: !no_length,
                max_steps,
            };
            simulate(&source, &settings, debug)
        }
        Command::Analyze {
            source,
            max_n,
            repetitions,
            max_degree,
            output,
            max_steps,
        } => analyze(&source, max_n, repetitions, max_degree, output, max_steps),
        Command::List => {
            for name in Catalog::names() {
                println!("{}", name);
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Loads the configuration from `--builtin`, a file path, or piped stdin.
fn load_config(source: &Source) -> Result<MachineConfig, TuringMachineError> {
    if let Some(name) = &source.builtin {
        Catalog::get(name)
    } else if let Some(path) = &source.config {
        ConfigLoader::load(path)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| TuringMachineError::FileError(format!("Failed to read from stdin: {}", e)))?;
        ConfigLoader::load_from_str(&buffer)
    } else {
        Err(TuringMachineError::FileError(
            "No machine given: pass a path, --builtin NAME, or pipe YAML on stdin".to_string(),
        ))
    }
}

fn simulate(source: &Source, settings: &Settings, debug: bool) -> Result<(), TuringMachineError> {
    let config = load_config(source)?;

    let unknown = unknown_input_symbols(&config);
    if !unknown.is_empty() {
        warn!(symbols = ?unknown, "simulation strings use symbols outside the tape alphabet");
    }

    let machine = Machine::from_config(&config)?;
    let simulator = Simulator::new(&machine);

    for (i, input) in config.simulation_strings.iter().enumerate() {
        let run = if debug {
            run_verbose(&simulator, input, settings.max_steps)
        } else {
            simulator.run_with_limit(input, settings.max_steps)
        };
        let path = write_report(i + 1, input, &run, settings)?;
        println!("Generated file: {}", path.display());
    }

    Ok(())
}

/// Runs `input`, printing the transcript line and a tape snapshot after
/// every step.
fn run_verbose(simulator: &Simulator, input: &str, max_steps: Option<usize>) -> Run {
    let execution = simulator.execution(input);

    println!("Input: {:?}", input);
    print!("{}", execution.snapshot());

    let run = execution.finish(max_steps, |execution, line| {
        println!("\n{}", line);
        print!("{}", execution.snapshot());
    });

    match run.outcome {
        Outcome::StepLimitExceeded => println!("\nStep limit reached after {} steps.\n", run.steps),
        outcome => println!("\nMachine halted: {:?}\n", outcome),
    }

    run
}

fn analyze(
    source: &Source,
    max_n: usize,
    repetitions: usize,
    max_degree: usize,
    output: PathBuf,
    max_steps: Option<usize>,
) -> Result<(), TuringMachineError> {
    let config = load_config(source)?;
    let machine = Machine::from_config(&config)?;

    println!("{}", "=".repeat(80));
    println!(
        "Empirical analysis: {}",
        machine.name().unwrap_or("<unnamed>")
    );
    println!("{}", "=".repeat(80));

    let report = AnalysisReport::collect(&machine, max_n, repetitions, max_degree, max_steps);

    println!(
        "{:<5} {:<15} {:<15} {:<10} {:<10}",
        "n", "Input", "Time (ms)", "Steps", "Ones"
    );
    for m in &report.measurements {
        let input = if m.input.is_empty() { "(empty)" } else { &m.input };
        println!(
            "{:<5} {:<15} {:<15.4} {:<10} {:<10}",
            m.n, input, m.mean_ms, m.steps, m.ones
        );
    }

    print_fits("EXECUTION TIME", &report.time_fits);
    print_fits("NUMBER OF STEPS", &report.step_fits);

    fs::create_dir_all(&output).map_err(|e| {
        TuringMachineError::FileError(format!(
            "Failed to create directory {}: {}",
            output.display(),
            e
        ))
    })?;

    let json = report
        .to_json()
        .map_err(|e| TuringMachineError::FileError(format!("Failed to encode report: {}", e)))?;
    for (name, content) in [
        ("analysis.json", json),
        ("analysis.csv", to_csv(&report.measurements)),
    ] {
        let path = output.join(name);
        fs::write(&path, content).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to write {}: {}", path.display(), e))
        })?;
        println!("Saved: {}", path.display());
    }

    Ok(())
}

fn print_fits(title: &str, fits: &[Fit]) {
    println!("\nPolynomial regression for {}", title);
    println!("{}", "=".repeat(80));

    for fit in fits {
        println!("\n  Degree {}:", fit.degree);
        println!("  R² = {:.6}", fit.r2);
        println!("  MSE = {:.6}", fit.mse);
        println!("  Equation: y = {}", fit.equation());
    }

    match best_fit(fits) {
        Some(best) => {
            println!("\n  BEST MODEL: degree {}", best.degree);
            println!("    R² = {:.6}", best.r2);
            println!("    Complexity: O(n^{})", best.degree);
        }
        None => println!("\n  Not enough data points to fit a polynomial."),
    }
}
