//! # kkb
//!
//! Command-line bill splitter.
//!
//! ## Module Organization
//! ```text
//! kkb/
//! ├── main.rs       ◄─── You are here (argument parsing & logging setup)
//! ├── commands.rs   ◄─── split / encode / decode / template / currencies
//! ├── config.rs     ◄─── CliConfig (kkb.toml + KKB_* env)
//! ├── render.rs     ◄─── Text breakdown
//! └── error.rs      ◄─── CliError
//! ```

mod commands;
mod config;
mod error;
mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kkb_core::ServiceChargeKind;

use crate::commands::{BillSource, TemplateOptions};
use crate::config::CliConfig;
use crate::error::CliResult;

#[derive(Parser, Debug)]
#[command(name = "kkb", version, about = "Split a restaurant bill: everyone pays for what they ate")]
struct Cli {
    /// Config file (default: the platform config dir's kkb.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print what each person owes
    Split {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the split as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the share token and share link of a bill
    Encode {
        /// Bill JSON file (default: stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the bill behind a share token or link as JSON
    Decode {
        /// Share token, or a link carrying one
        #[arg(value_name = "TOKEN_OR_URL")]
        input: String,
    },

    /// Print an empty bill to start from
    Template {
        /// Currency symbol (default: display.currency_symbol from config)
        #[arg(long)]
        currency: Option<String>,

        /// Service charge, as typed on the bill form
        #[arg(long, value_name = "VALUE")]
        service_charge: Option<String>,

        /// How the service charge applies: fixed or percent
        #[arg(long, default_value_t = ServiceChargeKind::Fixed)]
        kind: ServiceChargeKind,
    },

    /// List the currency symbols offered by the bill form
    Currencies,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct SourceArgs {
    /// Bill JSON file (default: stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Share token
    #[arg(short, long)]
    token: Option<String>,

    /// Share link
    #[arg(short, long)]
    url: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    debug!(?config, "Configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut stdin = io::stdin().lock();

    match cli.command {
        Command::Split { source, json } => {
            let source = BillSource::from_args(source.file, source.token, source.url);
            let bill = commands::load_bill(&source, &mut stdin)?;
            commands::split(bill, json, &mut out)?;
        }
        Command::Encode { file } => {
            let source = BillSource::from_args(file, None, None);
            let bill = commands::load_bill(&source, &mut stdin)?;
            commands::encode(bill, &config, &mut out)?;
        }
        Command::Decode { input } => commands::decode(&input, &mut out)?,
        Command::Template {
            currency,
            service_charge,
            kind,
        } => {
            let options = TemplateOptions {
                currency,
                service_charge,
                kind,
            };
            commands::template(&config, &options, &mut out)?;
        }
        Command::Currencies => commands::currencies(&mut out)?,
    }

    out.flush()?;
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `warn,kkb=info`
/// - `--verbose`: `debug`
/// - `RUST_LOG` overrides both
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn,kkb=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
