//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// seqrun - run a declarative sequence of commands with retries and resume.
#[derive(Debug, Parser)]
#[command(name = "seqrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the sequence file
    #[arg(short, long, global = true, env = "SEQRUN_CONFIG", default_value = "seqrun.yml")]
    pub config: PathBuf,

    /// Values for the Required list, as a JSON object of strings
    #[arg(long, global = true, value_name = "JSON")]
    pub vals: Option<String>,

    /// Minimal output; command output is not echoed
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the sequence (default if no command specified)
    Run(RunArgs),

    /// Load, validate and lint the sequence without running it
    Check(CheckArgs),

    /// Print the JSON Schema for sequence files
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Resume file written by a failed run; it is overwritten if this run fails too
    #[arg(short, long, value_name = "FILE")]
    pub resume: Option<PathBuf>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CheckArgs {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults() {
        let cli = Cli::try_parse_from(["seqrun"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("seqrun.yml"));
        assert!(cli.vals.is_none());
    }

    #[test]
    fn run_with_resume_and_vals() {
        let cli = Cli::try_parse_from([
            "seqrun",
            "run",
            "--resume",
            "/tmp/x.resume.json",
            "--vals",
            r#"{"Region":"westus2"}"#,
        ])
        .unwrap();

        assert_eq!(cli.vals.as_deref(), Some(r#"{"Region":"westus2"}"#));
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.resume, Some(PathBuf::from("/tmp/x.resume.json")));
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["seqrun", "check", "-c", "deploy.yml", "--strict"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("deploy.yml"));
        assert!(matches!(cli.command, Some(Commands::Check(CheckArgs { strict: true }))));
    }

    #[test]
    fn completions_requires_shell() {
        assert!(Cli::try_parse_from(["seqrun", "completions"]).is_err());
        let cli = Cli::try_parse_from(["seqrun", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions(_))));
    }
}
