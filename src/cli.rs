//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for orgchart.

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// orgchart - Org chart builder
///
/// Looks up a person in the directory, walks everyone who reports to them
/// (directly or indirectly) and writes the hierarchy as a draw.io CSV import
/// file or as JSON.
#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the org chart below a top-level person and write it out
    Export {
        /// Name or email address of the person at the top of the chart
        #[arg(short, long)]
        top: String,

        /// Path to configuration file
        #[arg(short, long, env = "ORGCHART_CONFIG")]
        config: Option<String>,

        /// Output file (stdout if not set)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Keep people whose title mentions "vendor"
        #[arg(long)]
        include_vendors: bool,

        /// Bearer token for the directory API
        #[arg(long)]
        token: Option<String>,

        /// Read the directory from a JSON fixture file instead of the API
        #[arg(long)]
        fixture: Option<String>,

        /// Maximum management depth to descend (0 = unlimited)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Also leave out everyone below an excluded account
        #[arg(long)]
        prune_excluded: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration (token redacted)
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
