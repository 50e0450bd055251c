//! Entry point: parse the CLI, set up logging, and run the requested mode.
//!
//! The interactive modes initialize the TUI terminal and guarantee its
//! restoration on both normal exit and panic before anything is printed.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use cmdgen::app::App;
use cmdgen::cli::{Cli, Command, ConfigCommand};
use cmdgen::config::Config;
use cmdgen::ctrl::{AppController, Controller, FakeController};
use cmdgen::logging;
use cmdgen::ui::SessionError;

/// Restores the terminal when dropped, so a panic inside the event loop
/// cannot leave the terminal in raw mode.
struct RestoreGuard;

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        None => {
            let cfg = load_config();
            let controller = match AppController::new(&cfg) {
                Ok(controller) => controller,
                Err(err) => {
                    eprintln!("Error: {err:#}");
                    return ExitCode::FAILURE;
                }
            };
            run_interactive(Arc::new(controller)).await
        }
        Some(Command::Demo) => run_interactive(Arc::new(FakeController::new())).await,
        Some(Command::Generate { first, prompt }) => run_generate(first, prompt).await,
        Some(Command::Config {
            command: ConfigCommand::Show,
        }) => run_config_show(),
    }
}

/// Load the configuration, falling back to the built-in defaults with a
/// warning. Printed before the TUI starts, so it stays readable.
fn load_config() -> Config {
    match Config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("WARNING: error loading configuration: {err:#}");
            eprintln!("Continuing with the built-in defaults.");
            Config::default()
        }
    }
}

async fn run_interactive(controller: Arc<dyn Controller>) -> ExitCode {
    let result = {
        let mut terminal = ratatui::init();
        let _restore = RestoreGuard;
        App::new(controller).run(&mut terminal).await
        // Terminal restored here, before anything is printed.
    };
    match result {
        Ok(selected) => {
            // The selected command is the sole stdout payload.
            if !selected.is_empty() {
                println!("{selected}");
            }
            ExitCode::SUCCESS
        }
        // Cancellation exits non-zero but is not reported as an error.
        Err(SessionError::Cancelled) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_generate(first: bool, words: Vec<String>) -> ExitCode {
    let prompt = words.join(" ");
    let cfg = load_config();
    let controller = match AppController::new(&cfg) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    match controller.generate(&prompt).await {
        Ok(commands) if commands.is_empty() => {
            eprintln!("Error: no commands generated");
            ExitCode::FAILURE
        }
        Ok(commands) => {
            let count = if first { 1 } else { commands.len() };
            for command in commands.iter().take(count) {
                println!("{command}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_config_show() -> ExitCode {
    let cfg = load_config();
    match cfg.to_toml() {
        Ok(rendered) => {
            print!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
