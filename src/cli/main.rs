//! naming-cli
//!
//! Generates and validates resource names from a naming configuration file.
//!
//! Usage:
//!   naming-cli --config naming.yaml generate --type vm \
//!     --component location=eus --component instance=001
//!   naming-cli --config naming.yaml validate --type st --name stprdeus001
//!   naming-cli --config naming.yaml bulk --types rg,vm,st --component environment=prd
//!
//! Generated names are recorded in `generatednames.json` inside `--ledger-dir`.
//! `--strategy` and `--short-name-case` override the configured settings.
//! Log output is controlled with `RUST_LOG`.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use resource_naming_sdk::{ConflictStrategy, ShortNameCase};
use tracing_subscriber::EnvFilter;

use commands::bulk::{BulkArgs, handle_bulk};
use commands::generate::{GenerateArgs, handle_generate};
use commands::validate::handle_validate;
use commands::{SettingsOverrides, build_service, parse_key_val};
use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "naming-cli")]
#[command(about = "Generate and validate cloud resource names", long_about = None)]
struct Args {
    /// Naming configuration file (JSON or YAML)
    #[arg(long, short = 'c')]
    config: PathBuf,

    /// Directory holding the generated name ledger
    #[arg(long, default_value = ".")]
    ledger_dir: PathBuf,

    /// Conflict strategy (AutoIncrement, NotifyOnly, Fail, SuffixRandom)
    #[arg(long)]
    strategy: Option<ConflictStrategy>,

    /// Short name case (preserve, lower, upper)
    #[arg(long)]
    short_name_case: Option<ShortNameCase>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and record a name
    Generate {
        /// Resource type short name
        #[arg(long = "type", short = 't')]
        resource_type: String,

        /// Component values in format key=value (can be specified multiple times)
        #[arg(long, value_parser = parse_key_val)]
        component: Vec<(String, String)>,

        /// User recorded with the name
        #[arg(long)]
        user: Option<String>,
    },

    /// Validate an existing name
    Validate {
        /// Resource type short name
        #[arg(long = "type", short = 't')]
        resource_type: String,

        /// Name to validate
        #[arg(long)]
        name: String,
    },

    /// Generate names for several resource types
    Bulk {
        /// Comma separated resource type short names
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,

        /// Component values in format key=value (can be specified multiple times)
        #[arg(long, value_parser = parse_key_val)]
        component: Vec<(String, String)>,

        /// Stop at the first failed resource type
        #[arg(long)]
        stop_on_error: bool,

        /// Assemble and validate without recording
        #[arg(long)]
        validate_only: bool,

        /// User recorded with the names
        #[arg(long)]
        user: Option<String>,
    },
}

async fn run(args: Args) -> Result<bool, CliError> {
    let overrides = SettingsOverrides {
        strategy: args.strategy,
        short_name_case: args.short_name_case,
    };
    let service = build_service(&args.config, &args.ledger_dir, overrides).await?;

    match args.command {
        Command::Generate {
            resource_type,
            component,
            user,
        } => {
            handle_generate(
                &service,
                GenerateArgs {
                    resource_type,
                    components: component,
                    user,
                },
            )
            .await
        }
        Command::Validate {
            resource_type,
            name,
        } => handle_validate(&service, &resource_type, &name).await,
        Command::Bulk {
            types,
            component,
            stop_on_error,
            validate_only,
            user,
        } => {
            handle_bulk(
                &service,
                BulkArgs {
                    resource_types: types,
                    components: component,
                    stop_on_error,
                    validate_only,
                    user,
                },
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
