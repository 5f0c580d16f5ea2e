//! Command-line interface for pettrack.
//!
//! This module provides the CLI structure for the `pettrack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, PetAddArgs, PetCommand, PetUpdateArgs, StatusCommand, ThemeCommand,
    VaccinationAddArgs, VaccinationCommand,
};

use crate::logging::Verbosity;

/// pettrack - Keep track of your pets and their vaccinations
///
/// Records are stored on this device only.
#[derive(Debug, Parser)]
#[command(name = "pettrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
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
    /// Manage pets
    #[command(subcommand)]
    Pet(PetCommand),

    /// Manage vaccination records
    #[command(subcommand)]
    Vaccination(VaccinationCommand),

    /// Show or switch the theme
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Show record counts and storage location
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
