//! Command-line interface for vetclinic.
//!
//! This module provides the CLI structure and command handlers for the
//! `vetclin` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FindCommand, OwnerCommand, PetCommand, StatusCommand, VetCommand, VisitCommand,
};

/// vetclin - Clinic records with phonetic owner search
///
/// Manages owners, pets, vets and visits in a local SQLite database and
/// finds owners by how their name sounds, not how it is spelled.
#[derive(Debug, Parser)]
#[command(name = "vetclin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage owners
    #[command(subcommand)]
    Owner(OwnerCommand),

    /// Manage pets
    #[command(subcommand)]
    Pet(PetCommand),

    /// Manage visits
    #[command(subcommand)]
    Visit(VisitCommand),

    /// Manage vets
    #[command(subcommand)]
    Vet(VetCommand),

    /// Find owners by (phonetic) last name
    Find(FindCommand),

    /// Load demo data into an empty database
    Seed,

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "vetclin");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_owner_add() {
        let args = vec![
            "vetclin",
            "owner",
            "add",
            "--first-name",
            "Maria",
            "--last-name",
            "Sousa",
            "--address",
            "Av. Brasil 2300",
            "--city",
            "Campinas",
            "--telephone",
            "1932441188",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Owner(OwnerCommand::Add { .. })
        ));
    }

    #[test]
    fn test_parse_owner_delete() {
        let args = vec!["vetclin", "owner", "delete", "7"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Owner(OwnerCommand::Delete { id }) => assert_eq!(id, 7),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_pet_add_with_date() {
        let args = vec![
            "vetclin",
            "pet",
            "add",
            "--owner-id",
            "1",
            "--name",
            "Rex",
            "--species",
            "dog",
            "--birth-date",
            "2019-05-04",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Pet(PetCommand::Add { birth_date, .. }) => {
                assert_eq!(birth_date.to_string(), "2019-05-04");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_pet_add_rejects_bad_date() {
        let args = vec![
            "vetclin",
            "pet",
            "add",
            "--owner-id",
            "1",
            "--name",
            "Rex",
            "--species",
            "dog",
            "--birth-date",
            "not-a-date",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_find_with_query() {
        let args = vec!["vetclin", "find", "Sousa"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Find(cmd) => assert_eq!(cmd.last_name.as_deref(), Some("Sousa")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_find_without_query() {
        let args = vec!["vetclin", "find"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Find(cmd) => assert!(cmd.last_name.is_none()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_vet_add_with_specialties() {
        let args = vec![
            "vetclin",
            "vet",
            "add",
            "--first-name",
            "Helena",
            "--last-name",
            "Prado",
            "--specialty",
            "radiology",
            "--specialty",
            "surgery",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Vet(VetCommand::Add { specialties, .. }) => {
                assert_eq!(specialties, vec!["radiology", "surgery"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_seed() {
        let args = vec!["vetclin", "seed"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Seed));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["vetclin", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["vetclin", "-v", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["vetclin", "-q", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
