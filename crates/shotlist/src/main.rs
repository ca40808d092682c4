//! Shotlist CLI - rename a shoot's photos from a shot list.
//!
//! Photos in the input folder are ordered by capture time and named from the
//! dataset row at the same position, then copied into a destination folder.
//!
//! # Usage
//!
//! ```bash
//! # See which columns a dataset has
//! shotlist columns guests.csv
//!
//! # Preview the renaming as JSON
//! shotlist plan ./shoot --dataset guests.csv --column name
//!
//! # Copy into ./renamed under the new names
//! shotlist export ./shoot --dataset guests.csv --column name --dest ./renamed
//!
//! # View configuration
//! shotlist config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Shotlist - rename photos in capture order from a tabular shot list.
#[derive(Parser, Debug)]
#[command(name = "shotlist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the planned renaming without copying anything
    Plan(cli::plan::PlanArgs),

    /// Copy photos into a destination folder under their new names
    Export(cli::export::ExportArgs),

    /// List the columns of a dataset
    Columns(cli::columns::ColumnsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match shotlist_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `shotlist config path`."
            );
            shotlist_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Shotlist v{}", shotlist_core::VERSION);

    match cli.command {
        Commands::Plan(args) => cli::plan::execute(args, config).await,
        Commands::Export(args) => cli::export::execute(args, config).await,
        Commands::Columns(args) => cli::columns::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_flags_parse() {
        let cli = Cli::try_parse_from([
            "shotlist", "-v", "export", "./shoot", "--dataset", "g.csv", "--column", "name",
            "--dest", "./out", "--parallel", "2",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.source.column.as_deref(), Some("name"));
                assert_eq!(args.source.parallel, Some(2));
                assert!(args.dest.is_some());
                assert!(!args.thumbnails);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_plan_requires_dataset() {
        assert!(Cli::try_parse_from(["shotlist", "plan", "./shoot"]).is_err());
    }
}
