//! Command-line interface definition.

use clap::{Parser, Subcommand};

/// Generate shell commands from natural language descriptions.
///
/// Without a subcommand, starts the interactive session: search your
/// history or type a new prompt, pick one of the generated commands, and
/// the selection is printed to stdout and remembered for next time.
#[derive(Parser)]
#[command(name = "cmdgen", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Non-interactive generation of commands from a natural language prompt
    Generate {
        /// Select and output only the first generated command
        #[arg(short, long)]
        first: bool,
        /// The natural language description
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Simulate the interactive session, without requiring an LLM API
    Demo,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the computed configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_requires_a_prompt() {
        assert!(Cli::try_parse_from(["cmdgen", "generate"]).is_err());
        let cli = Cli::try_parse_from(["cmdgen", "generate", "--first", "list", "files"])
            .unwrap_or_else(|err| panic!("parse failed: {err}"));
        match cli.command {
            Some(Command::Generate { first, prompt }) => {
                assert!(first);
                assert_eq!(prompt, vec!["list", "files"]);
            }
            _ => panic!("expected generate subcommand"),
        }
    }
}
