//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Owner management commands.
#[derive(Debug, Subcommand)]
pub enum OwnerCommand {
    /// Register a new owner
    Add {
        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// City
        #[arg(long)]
        city: String,

        /// Telephone, 10-11 digits
        #[arg(long)]
        telephone: String,
    },

    /// Edit an existing owner
    Edit {
        /// Owner id
        id: i64,

        /// New given name
        #[arg(long)]
        first_name: Option<String>,

        /// New family name
        #[arg(long)]
        last_name: Option<String>,

        /// New street address
        #[arg(long)]
        address: Option<String>,

        /// New city
        #[arg(long)]
        city: Option<String>,

        /// New telephone
        #[arg(long)]
        telephone: Option<String>,
    },

    /// Delete an owner (refused while the owner still has pets)
    Delete {
        /// Owner id
        id: i64,
    },

    /// Show one owner with pets and visits
    Show {
        /// Owner id
        id: i64,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List all owners
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Pet management commands.
#[derive(Debug, Subcommand)]
pub enum PetCommand {
    /// Register a new pet for an owner
    Add {
        /// Owning owner's id
        #[arg(long)]
        owner_id: i64,

        /// Call name
        #[arg(long)]
        name: String,

        /// Kind of animal (dog, cat, bird, ...)
        #[arg(long)]
        species: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,
    },

    /// List an owner's pets
    List {
        /// Owning owner's id
        owner_id: i64,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a pet and its visits
    Delete {
        /// Pet id
        id: i64,
    },
}

/// Visit management commands.
#[derive(Debug, Subcommand)]
pub enum VisitCommand {
    /// Record a visit for a pet
    Add {
        /// Visited pet's id
        #[arg(long)]
        pet_id: i64,

        /// Date of the visit (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// What the visit is about
        #[arg(long)]
        description: String,
    },

    /// List a pet's visits, most recent first
    List {
        /// Visited pet's id
        pet_id: i64,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a visit
    Delete {
        /// Visit id
        id: i64,
    },
}

/// Vet management commands.
#[derive(Debug, Subcommand)]
pub enum VetCommand {
    /// Register a new vet
    Add {
        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,

        /// Specialty name; repeat for several
        #[arg(long = "specialty")]
        specialties: Vec<String>,
    },

    /// List all vets with their specialties
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Find command arguments.
#[derive(Debug, Args)]
pub struct FindCommand {
    /// Last name to search for, sound-alike tolerant.
    /// Omit to list all owners.
    pub last_name: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_debug() {
        let cmd = FindCommand {
            last_name: Some("Sousa".to_string()),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("last_name"));
        assert!(debug_str.contains("Sousa"));
    }

    #[test]
    fn test_status_command_debug() {
        let cmd = StatusCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_owner_command_debug() {
        let cmd = OwnerCommand::Delete { id: 3 };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Delete"));
        assert!(debug_str.contains('3'));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Validate { file: None };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Validate"));
    }
}
