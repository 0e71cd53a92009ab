use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::error;

use crate::app::{App, Options};
use crate::config::Config;
use crate::error::AppError;
use crate::source::Input;

mod app;
mod config;
mod error;
mod logging;
mod resume;
mod results;
mod source;
mod terminal;
mod utils;

/// Practise typing by typing along with source files
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Files to type, in order
    files: Vec<PathBuf>,

    /// Type standard input before any files
    #[arg(short, long)]
    stdin: bool,

    /// Make comments and indentation typeable too
    #[arg(short = 'c', long)]
    no_comments: bool,

    /// Show comments instead of hiding them (they are still skipped)
    #[arg(long)]
    show_comments: bool,

    /// Configuration directory to use instead of the default one
    #[arg(long, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Start every file from the beginning, ignoring saved offsets
    #[arg(long)]
    reset: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn inputs(&self) -> Vec<Input> {
        let stdin = self.stdin.then_some(Input::Stdin);
        stdin
            .into_iter()
            .chain(self.files.iter().cloned().map(Input::File))
            .collect()
    }
}

fn main() -> ExitCode {
    match run(&Cli::parse()) {
        Ok(skipped) => {
            for reason in skipped {
                eprintln!("typealong: {reason}");
            }
            ExitCode::SUCCESS
        }
        Err(app_error) => {
            error!(%app_error, "typealong stopped");
            eprintln!("typealong: {app_error}");
            ExitCode::FAILURE
        }
    }
}

/// Run the program, returning the reasons inputs were skipped
fn run(cli: &Cli) -> Result<Vec<String>, AppError> {
    let config = Config::get(cli.config.clone())?;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config.settings)?);
        return Ok(Vec::new());
    }

    let inputs = cli.inputs();
    if inputs.is_empty() {
        Cli::command().print_help()?;
        return Ok(Vec::new());
    }

    let _log_guard = logging::init(&config);

    let mut typing = config.settings.typing.clone();
    typing.show_comments |= cli.show_comments;
    let options = Options {
        fold_comments: !cli.no_comments,
        reset: cli.reset,
    };

    App::new(config, typing.engine(), options).run(&inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_inputs_order() {
        let cli = Cli::parse_from(["typealong", "-s", "a.rs", "b.py"]);
        assert_eq!(
            cli.inputs(),
            vec![
                Input::Stdin,
                Input::File(PathBuf::from("a.rs")),
                Input::File(PathBuf::from("b.py")),
            ]
        );
    }

    #[test]
    fn test_config_errors_fail_the_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.toml"), "typing = 3\n").unwrap();

        let cli = Cli::parse_from(["typealong", "--config", dir.path().to_str().unwrap()]);
        assert!(matches!(run(&cli), Err(AppError::Config(_))));
    }

    #[test]
    fn test_print_config_types_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "typealong",
            "--print-config",
            "--config",
            dir.path().to_str().unwrap(),
            "missing.c",
        ]);
        assert_eq!(run(&cli).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["typealong", "-c", "--show-comments", "--reset", "x.c"]);
        assert!(cli.no_comments);
        assert!(cli.show_comments);
        assert!(cli.reset);
        assert!(!cli.stdin);

        assert!(Cli::parse_from(["typealong"]).inputs().is_empty());
    }
}
