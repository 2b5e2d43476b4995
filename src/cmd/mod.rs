/*!
Command dispatcher.

Every subcommand maps to exactly one remote DLP call:

  inspect    <TEXT>                                 -> InspectContent
  redact     <TEXT>                                 -> RedactContent
  mask       <TEXT>                                 -> DeidentifyContent (character mask)
  deidfpe    <TEXT> <WRAPPED_KEY> <CRYPTO_KEY_NAME> -> DeidentifyContent (FPE, KMS-wrapped key)
  infoTypes  <CATEGORY>                             -> ListInfoTypes
  categories                                        -> ListRootCategories

Layout:
  mod.rs        (this file: Command enum + dispatch)
  operation.rs  (request builders, Operation, CommandError)
  format.rs     (text / JSON rendering of responses)

The client is always passed in (`&dyn DlpService`) and output always goes to
a caller-supplied writer, so the whole path runs against test doubles.
*/

pub mod format;
pub mod operation;
#[cfg(test)]
pub mod testing;

use clap::Subcommand;
use std::io::Write;
use tracing::info;

use crate::dlp::DlpService;
pub use operation::{CommandError, Operation};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Report US social security numbers found in TEXT (one info type per line)
    Inspect {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// Replace US social security numbers in TEXT with "[redacted]"
    Redact {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// List the info types of a root category
    #[command(name = "infoTypes")]
    InfoTypes {
        #[arg(value_name = "CATEGORY", allow_hyphen_values = true)]
        category: String,
    },

    /// List root info type categories as "NAME (Display name)"
    Categories,

    /// Mask every detected sensitive value in TEXT with '*'
    Mask {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// Format-preserving encryption of TEXT using a KMS-wrapped key
    #[command(name = "deidfpe")]
    DeidFpe {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
        /// Wrapped key material (sent as the literal bytes of this argument)
        #[arg(value_name = "WRAPPED_KEY", allow_hyphen_values = true)]
        wrapped_key: String,
        /// KMS key resource name that unwraps WRAPPED_KEY
        #[arg(value_name = "CRYPTO_KEY_NAME", allow_hyphen_values = true)]
        crypto_key_name: String,
    },
}

/// How responses are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Line-oriented text (the default)
    #[default]
    Text,
    /// Pretty-printed response body
    Json,
}

/// Per-invocation knobs that are not part of the subcommand itself.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub format: OutputFormat,
    pub language_code: Option<String>,
}

/// Build the request for `command`, issue it through `client`, write the result to `out`.
pub fn dispatch(
    command: &Command,
    opts: &DispatchOptions,
    client: &dyn DlpService,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let op = Operation::from_command(command, opts.language_code.as_deref());
    info!(operation = op.name(), "dispatching");
    op.execute(client, opts.format, out)
}
