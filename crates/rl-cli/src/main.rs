//! rlang — command-line entry point (spec §6, §8.5).
//!
//! Thin on purpose: a `run` subcommand for non-interactive scripts and a
//! default REPL mode. All language behavior lives in `rl-core`/`rl-reader`/
//! `rl-runtime`; this crate only wires stdio, signals, and line editing
//! around the evaluator.

mod repl;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rl_runtime::{natives, Evaluator, EvaluatorConfig};

#[derive(Parser)]
#[command(name = "rlang")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter and REPL for the rlang scripting language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file non-interactively and exit.
    Run {
        /// Path to a .rl source file.
        script: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cancel_flag = install_sigint_handler();

    #[cfg(feature = "diagnostics")]
    rl_runtime::diagnostics::install_signal_handler();

    let config = EvaluatorConfig::new().with_cancel_flag(cancel_flag);
    let mut evaluator = Evaluator::with_config(config);
    natives::register_all(&mut evaluator);

    let cli = Cli::parse();
    let succeeded = match cli.command {
        Some(Commands::Run { script }) => run_script(&mut evaluator, &script),
        None => repl::run(&mut evaluator),
    };
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn install_sigint_handler() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    {
        if let Err(err) = signal_hook::flag::register(signal_hook::consts::SIGINT, flag.clone()) {
            tracing::warn!(%err, "failed to install SIGINT handler, Ctrl+C will not cancel in-progress evaluation");
        }
    }
    flag
}

fn run_script(evaluator: &mut Evaluator, path: &PathBuf) -> bool {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("rlang: cannot read {}: {err}", path.display());
            return false;
        }
    };

    let source_name = path.display().to_string();
    let values = match rl_reader::parse_source(&source, &source_name) {
        Ok(values) => values,
        Err(err) => {
            eprint!("{}", err.format_report());
            return false;
        }
    };

    match evaluator.do_block(&values) {
        Ok(_) => true,
        Err(err) => {
            eprint!("{}", err.format_report());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn evaluator() -> Evaluator {
        let mut ev = Evaluator::new();
        natives::register_all(&mut ev);
        ev
    }

    #[test]
    fn run_script_succeeds_on_valid_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x: 2 + 3").unwrap();
        let mut ev = evaluator();
        assert!(run_script(&mut ev, &file.path().to_path_buf()));
    }

    #[test]
    fn run_script_fails_on_runtime_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 / 0").unwrap();
        let mut ev = evaluator();
        assert!(!run_script(&mut ev, &file.path().to_path_buf()));
    }

    #[test]
    fn run_script_fails_on_missing_file() {
        let mut ev = evaluator();
        let missing = std::path::PathBuf::from("/nonexistent/path/to/script.rl");
        assert!(!run_script(&mut ev, &missing));
    }
}
