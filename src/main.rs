//! orgchart - Org chart builder
//!
//! This is the main entry point for the orgchart binary.
//! It resolves a top-level person in the directory, walks their reporting
//! lines, cleans up the collected records and writes them out for draw.io.

mod cli;
mod config;
mod directory;
mod error;
mod export;
mod logging;
mod org;

use std::path::Path;

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::config::{OrgConfig, OutputFormat};
use crate::directory::{Directory, GraphConfig, GraphDirectory, StaticDirectory};
use crate::error::{Error, Result};
use crate::org::WalkOptions;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config { subcommand } => {
            // Config commands use minimal logging
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand)
        }
        Commands::Export {
            top,
            config,
            output,
            format,
            include_vendors,
            token,
            fixture,
            max_depth,
            prune_excluded,
        } => {
            let mut cfg = OrgConfig::load(config.as_deref())?;

            // Command-line flags take precedence over file and environment
            if output.is_some() {
                cfg.output.file = output;
            }
            if let Some(format) = format {
                cfg.output.format = format;
            }
            if include_vendors {
                cfg.output.include_vendors = true;
            }
            if token.is_some() {
                cfg.directory.token = token;
            }
            if let Some(depth) = max_depth {
                cfg.traversal.max_depth = depth;
            }
            if prune_excluded {
                cfg.exclusions.prune_subtrees = true;
            }

            // The guards must be kept alive until the export is written
            let _log_guards = logging::init_logging(&cfg.logging, cli.verbose, cli.quiet)?;
            info!(version = env!("CARGO_PKG_VERSION"), "Starting orgchart");
            if let Some(path) = &cfg.loaded_from {
                info!(path = %path.display(), "Configuration loaded from file");
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

            runtime.block_on(run_export(&cfg, &top, fixture.as_deref()))
        }
    }
}

/// Build the org chart for `top` and write it out
async fn run_export(config: &OrgConfig, top: &str, fixture: Option<&str>) -> Result<()> {
    let directory: Box<dyn Directory> = match fixture {
        Some(path) => Box::new(StaticDirectory::load(Path::new(path))?),
        None => Box::new(GraphDirectory::new(GraphConfig::from_settings(&config.directory)?)?),
    };
    info!(
        directory = directory.name(),
        base_url = %config.directory.base_url,
        format = ?config.output.format,
        "Configuration loaded"
    );

    directory.validate().await?;

    let hierarchy =
        match org::build_hierarchy(directory.as_ref(), top, WalkOptions::from_config(config)).await {
            Ok(hierarchy) => hierarchy,
            Err(e) => {
                if e.is_fetch() {
                    warn!(error = %e.format_for_log(), "Directory lookup failed, no output was written");
                }
                return Err(e);
            }
        };
    let records = org::normalize(&hierarchy.records);
    let written = export::write_export(&records, &config.output)?;

    info!(
        records = written,
        destination = %config.output.file.as_deref().unwrap_or("stdout"),
        "Export complete"
    );
    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = OrgConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg.redacted())?);
        }
        ConfigSubcommand::Init { path, force } => {
            config::init_config(path.as_deref(), force)?;
        }
        ConfigSubcommand::Validate { config } => {
            let cfg = OrgConfig::load(config.as_deref())?;
            println!("Configuration is valid.");
            if cfg.directory.token.is_none() {
                println!("Note: no directory token configured; pass --token or set ORGCHART_TOKEN.");
            }
            if cfg.output.format == OutputFormat::Json && cfg.output.template.is_some() {
                println!("Note: output.template is ignored for JSON output.");
            }
        }
    }

    Ok(())
}
