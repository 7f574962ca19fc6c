//! Autopia CLI - Main Entry Point
//!
//! Reads and writes datatable values and prepares run results folders from
//! the shell.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{data, results};

/// Autopia - data-driven test automation support
#[derive(Parser)]
#[command(name = "autopia")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read and write datatable values
    #[command(subcommand)]
    Data(data::DataCommands),

    /// Manage run results folders
    #[command(subcommand)]
    Results(results::ResultsCommands),

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Data(cmd) => data::execute(cmd, cli.format),
        Commands::Results(cmd) => results::execute(cmd, cli.format),
        Commands::Version => {
            println!("Autopia CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Autopia common library v{}", autopia_common::VERSION);
            Ok(())
        }
    };

    if let Err(e) = outcome {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use test_case::test_case;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_data_get() {
        let cli = Cli::try_parse_from([
            "autopia",
            "data",
            "get",
            "--path",
            "data",
            "--name",
            "Orders",
            "--kind",
            "sub-iterative",
            "--testcase",
            "TC_001",
            "--iteration",
            "2",
            "--sub-iteration",
            "1",
            "--datasheet",
            "Checkout",
            "--field",
            "Item",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, output::OutputFormat::Json);
        match cli.command {
            Commands::Data(data::DataCommands::Get { row, datasheet, field }) => {
                assert_eq!(row.kind, data::DatatableKind::SubIterative);
                assert_eq!(row.iteration, Some(2));
                assert_eq!(row.sub_iteration, Some(1));
                assert_eq!(datasheet, "Checkout");
                assert_eq!(field, "Item");
            }
            _ => panic!("expected data get"),
        }
    }

    #[test_case("non-iterative" => data::DatatableKind::NonIterative)]
    #[test_case("iterative" => data::DatatableKind::Iterative)]
    #[test_case("sub-iterative" => data::DatatableKind::SubIterative)]
    fn test_parse_datatable_kind(kind: &str) -> data::DatatableKind {
        let cli = Cli::try_parse_from([
            "autopia", "data", "expected", "--path", "data", "--name", "Orders", "--kind", kind,
            "--testcase", "TC_001", "--field", "Total",
        ])
        .unwrap();

        match cli.command {
            Commands::Data(data::DataCommands::Expected { row, .. }) => row.kind,
            _ => panic!("expected data expected"),
        }
    }

    #[test]
    fn test_parse_results_init() {
        let cli = Cli::try_parse_from([
            "autopia", "-v", "results", "init", "--base", ".", "--run", "Smoke", "--framework",
            "keyword-driven",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Results(results::ResultsCommands::Init { run, framework, .. }) => {
                assert_eq!(run, "Smoke");
                assert_eq!(framework, Some(autopia_common::FrameworkType::KeywordDriven));
            }
            _ => panic!("expected results init"),
        }
    }

    #[test]
    fn test_unknown_framework_is_rejected() {
        let result = Cli::try_parse_from([
            "autopia", "results", "init", "--base", ".", "--run", "Smoke", "--framework", "hybrid",
        ]);
        assert!(result.is_err());
    }
}
