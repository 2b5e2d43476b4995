/*!
operation.rs

Request construction and execution for each subcommand.

Builders are pure: the same arguments always yield the same request.
`inspect` / `redact` are pinned to the US_SOCIAL_SECURITY_NUMBER info type,
while `mask` / `deidfpe` send an empty info type list and so apply to every
type the service detects.
*/

use std::io::Write;
use thiserror::Error;
use tracing::debug;

use super::{Command, OutputFormat, format};
use crate::dlp::model::{
    CharacterMaskConfig, ContentItem, CryptoKey, CryptoReplaceFfxFpeConfig,
    DeidentifyConfig, DeidentifyContentRequest, FfxCommonNativeAlphabet, InfoType,
    InfoTypeTransformation, InfoTypeTransformations, InspectConfig, InspectContentRequest,
    KmsWrappedCryptoKey, Likelihood, ListInfoTypesRequest, ListRootCategoriesRequest,
    PrimitiveTransformation, RedactContentRequest, ReplaceConfig,
};
use crate::dlp::{DlpError, DlpService};

pub const SSN_INFO_TYPE: &str = "US_SOCIAL_SECURITY_NUMBER";
pub const REDACTION_LITERAL: &str = "[redacted]";
pub const MASKING_CHARACTER: &str = "*";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{operation}: remote call failed")]
    Remote {
        operation: &'static str,
        #[source]
        source: DlpError,
    },

    #[error("{operation}: response contained no {missing}")]
    EmptyResponse {
        operation: &'static str,
        missing: &'static str,
    },

    #[error("failed to encode response as JSON")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

/// A fully built request, tagged by the subcommand that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Inspect(InspectContentRequest),
    Redact(RedactContentRequest),
    Mask(DeidentifyContentRequest),
    ListInfoTypes(ListInfoTypesRequest),
    ListCategories(ListRootCategoriesRequest),
    DeidentifyFpe(DeidentifyContentRequest),
}

/* ---- Builders ---- */

fn ssn_inspect_config() -> InspectConfig {
    InspectConfig {
        info_types: vec![InfoType::named(SSN_INFO_TYPE)],
        min_likelihood: Likelihood::LikelihoodUnspecified,
    }
}

/// Deidentify request applying `transformation` to all detected info types.
fn deidentify_all(text: &str, transformation: PrimitiveTransformation) -> DeidentifyContentRequest {
    DeidentifyContentRequest {
        deidentify_config: DeidentifyConfig {
            info_type_transformations: InfoTypeTransformations {
                transformations: vec![InfoTypeTransformation {
                    info_types: Vec::new(),
                    primitive_transformation: transformation,
                }],
            },
        },
        items: vec![ContentItem::text_plain(text)],
    }
}

pub fn inspect_request(text: &str) -> InspectContentRequest {
    InspectContentRequest {
        inspect_config: ssn_inspect_config(),
        items: vec![ContentItem::text_plain(text)],
    }
}

pub fn redact_request(text: &str) -> RedactContentRequest {
    RedactContentRequest {
        inspect_config: ssn_inspect_config(),
        replace_configs: vec![ReplaceConfig {
            info_type: InfoType::named(SSN_INFO_TYPE),
            replace_with: REDACTION_LITERAL.to_string(),
        }],
        items: vec![ContentItem::text_plain(text)],
    }
}

pub fn mask_request(text: &str) -> DeidentifyContentRequest {
    deidentify_all(
        text,
        PrimitiveTransformation::CharacterMaskConfig(CharacterMaskConfig {
            masking_character: MASKING_CHARACTER.to_string(),
        }),
    )
}

/// `wrapped_key` is forwarded as the raw bytes of the argument, not decoded.
pub fn fpe_request(text: &str, wrapped_key: &str, crypto_key_name: &str) -> DeidentifyContentRequest {
    deidentify_all(
        text,
        PrimitiveTransformation::CryptoReplaceFfxFpeConfig(CryptoReplaceFfxFpeConfig {
            crypto_key: CryptoKey::KmsWrapped(KmsWrappedCryptoKey {
                wrapped_key: wrapped_key.as_bytes().to_vec(),
                crypto_key_name: crypto_key_name.to_string(),
            }),
            common_alphabet: Some(FfxCommonNativeAlphabet::AlphaNumeric),
        }),
    )
}

pub fn info_types_request(category: &str, language_code: Option<&str>) -> ListInfoTypesRequest {
    ListInfoTypesRequest {
        category: category.to_string(),
        language_code: language_code.map(str::to_string),
    }
}

pub fn categories_request(language_code: Option<&str>) -> ListRootCategoriesRequest {
    ListRootCategoriesRequest {
        language_code: language_code.map(str::to_string),
    }
}

impl Operation {
    pub fn from_command(command: &Command, language_code: Option<&str>) -> Self {
        match command {
            Command::Inspect { text } => Operation::Inspect(inspect_request(text)),
            Command::Redact { text } => Operation::Redact(redact_request(text)),
            Command::Mask { text } => Operation::Mask(mask_request(text)),
            Command::InfoTypes { category } => {
                Operation::ListInfoTypes(info_types_request(category, language_code))
            }
            Command::Categories => Operation::ListCategories(categories_request(language_code)),
            Command::DeidFpe {
                text,
                wrapped_key,
                crypto_key_name,
            } => Operation::DeidentifyFpe(fpe_request(text, wrapped_key, crypto_key_name)),
        }
    }

    /// Subcommand name, as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Inspect(_) => "inspect",
            Operation::Redact(_) => "redact",
            Operation::Mask(_) => "mask",
            Operation::ListInfoTypes(_) => "infoTypes",
            Operation::ListCategories(_) => "categories",
            Operation::DeidentifyFpe(_) => "deidfpe",
        }
    }

    /// Issue the single remote call for this operation and write its rendering to `out`.
    ///
    /// Output is rendered in full before anything is written; a failed call writes nothing.
    pub fn execute(
        &self,
        client: &dyn DlpService,
        fmt: OutputFormat,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let operation = self.name();
        let remote = |source: DlpError| CommandError::Remote { operation, source };

        let rendered = match self {
            Operation::Inspect(req) => {
                let resp = client.inspect_content(req).map_err(remote)?;
                match fmt {
                    OutputFormat::Json => format::json(&resp)?,
                    OutputFormat::Text => {
                        let first = resp.results.first().ok_or(CommandError::EmptyResponse {
                            operation,
                            missing: "inspect result",
                        })?;
                        format::findings(&first.findings)
                    }
                }
            }
            Operation::Redact(req) => {
                let resp = client.redact_content(req).map_err(remote)?;
                match fmt {
                    OutputFormat::Json => format::json(&resp)?,
                    OutputFormat::Text => {
                        let first = resp.items.first().ok_or(CommandError::EmptyResponse {
                            operation,
                            missing: "content item",
                        })?;
                        format::items(std::slice::from_ref(first))
                    }
                }
            }
            Operation::Mask(req) | Operation::DeidentifyFpe(req) => {
                let resp = client.deidentify_content(req).map_err(remote)?;
                match fmt {
                    OutputFormat::Json => format::json(&resp)?,
                    OutputFormat::Text => format::items(&resp.items),
                }
            }
            Operation::ListInfoTypes(req) => {
                let resp = client.list_info_types(req).map_err(remote)?;
                match fmt {
                    OutputFormat::Json => format::json(&resp)?,
                    OutputFormat::Text => format::info_types(&resp.info_types),
                }
            }
            Operation::ListCategories(req) => {
                let resp = client.list_root_categories(req).map_err(remote)?;
                match fmt {
                    OutputFormat::Json => format::json(&resp)?,
                    OutputFormat::Text => format::categories(&resp.categories),
                }
            }
        };

        debug!(operation, bytes = rendered.len(), "writing output");
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
