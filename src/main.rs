use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};

mod cmd;
mod dlp;
mod utils;

use cmd::{Command, DispatchOptions, OutputFormat};
use dlp::{BlockingClient, DlpService, RestClient};
use utils::config::{self, Overrides, Settings};

/// dlp - command-line client for the Cloud DLP API
///
/// Command layout:
///   dlp inspect    "<text>"                                  Info types found (US SSN only)
///   dlp redact     "<text>"                                  SSNs replaced with "[redacted]"
///   dlp mask       "<text>"                                  Every detected value masked with '*'
///   dlp deidfpe    "<text>" <wrappedKey> <cryptoKeyName>     Format-preserving encryption
///   dlp infoTypes  <category>                                Info types in a root category
///   dlp categories                                           Root categories "NAME (Display)"
///
/// Global flags / env:
///   -v / -vv / -vvv   Increase verbosity (logs go to stderr; RUST_LOG overrides)
///   -q / --quiet      Errors only
///   --endpoint URL    Service endpoint (or DLP_ENDPOINT; default https://dlp.googleapis.com)
///   --token TOKEN     OAuth bearer token (or DLP_ACCESS_TOKEN). Required by the
///                     Google endpoint; without it the first call fails with 401.
///                     Get one with `gcloud auth print-access-token`.
///   --language-code   Localize infoTypes / categories (or DLP_LANGUAGE_CODE)
///   -c / --config     YAML or JSON file with endpoint / access_token / language_code (or DLP_CONFIG)
///   --json            Print the raw response body instead of text lines
///
/// Examples:
///   export DLP_ACCESS_TOKEN="$(gcloud auth print-access-token)"
///   dlp inspect "My SSN is 123-45-6789"
///   dlp --token "$(gcloud auth print-access-token)" categories
///   dlp infoTypes PII --json
#[derive(Parser, Debug)]
#[command(
    name = "dlp",
    version,
    author,
    about = "dlp - inspect, redact, mask and deidentify text with the Cloud DLP API",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// DLP API endpoint (falls back to DLP_ENDPOINT, then the config file)
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// OAuth access token sent as a bearer token (falls back to DLP_ACCESS_TOKEN).
    /// Required by the Google endpoint, which answers 401 without one;
    /// e.g. `gcloud auth print-access-token`
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    /// BCP-47 language code for info type / category display names
    #[arg(long = "language-code", global = true, value_name = "CODE")]
    language_code: Option<String>,

    /// Config file (YAML or JSON); falls back to DLP_CONFIG
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output the response as JSON instead of text lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            endpoint: self.endpoint.clone(),
            access_token: self.token.clone(),
            language_code: self.language_code.clone(),
        }
    }

    fn dispatch_options(&self, language_code: Option<String>) -> DispatchOptions {
        DispatchOptions {
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            language_code,
        }
    }
}

fn main() -> ExitCode {
    // Usage errors (unknown / missing subcommand or arguments) exit here with
    // status 2, before any client exists.
    let cli = Cli::parse();

    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));

    ExitCode::from(exit_status(&run(&cli)))
}

/// Log a failed run and map it to the process exit status.
fn exit_status(outcome: &Result<()>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:#}");
            1
        }
    }
}

/// Build the client, issue the one call, and drop the client before returning.
fn run(cli: &Cli) -> Result<()> {
    let settings = config::resolve_from_env(cli.overrides())?;
    if let Some(hint) = missing_token_hint(&settings) {
        warn!("{hint}");
    }

    let rest = RestClient::new(&settings.endpoint, settings.access_token.clone())
        .context("failed to create DLP client")?;
    let client = BlockingClient::new(rest).context("failed to create DLP client")?;

    let stdout = std::io::stdout();
    run_with(cli, settings.language_code, &client, &mut stdout.lock())
}

fn missing_token_hint(settings: &Settings) -> Option<String> {
    if settings.access_token.is_some() {
        return None;
    }
    Some(format!(
        "no access token set; {} will likely reject the call with 401. \
         Pass --token or set {} (e.g. `gcloud auth print-access-token`)",
        settings.endpoint,
        config::ENV_ACCESS_TOKEN
    ))
}

/// Dispatch the parsed command through `client`, writing to `out`.
fn run_with(
    cli: &Cli,
    language_code: Option<String>,
    client: &dyn DlpService,
    out: &mut dyn Write,
) -> Result<()> {
    let opts = cli.dispatch_options(language_code);
    cmd::dispatch(&cli.command, &opts, client, out)?;
    Ok(())
}
