//! Wire types for the DLP v2beta1 REST surface.
//!
//! Field names follow the service's JSON mapping (camelCase, enum values in
//! SCREAMING_SNAKE_CASE). Byte fields travel as standard base64.
//! Repeated fields missing from a response decode as empty vectors.

use serde::{Deserialize, Serialize};

/// MIME type used for every content item this tool submits.
pub const TEXT_PLAIN: &str = "text/plain";

/* ---- Shared ---- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoType {
    pub name: String,
}

impl InfoType {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Confidence tier attached to findings / used as an inspection threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    #[default]
    LikelihoodUnspecified,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectConfig {
    #[serde(default)]
    pub info_types: Vec<InfoType>,
    #[serde(default)]
    pub min_likelihood: Likelihood,
}

/// A unit of content sent to (or returned by) the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_opt"
    )]
    pub data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ContentItem {
    /// Plain-text item carrying `text` as raw bytes.
    pub fn text_plain(text: &str) -> Self {
        Self {
            mime_type: TEXT_PLAIN.to_string(),
            data: Some(text.as_bytes().to_vec()),
            value: None,
        }
    }

    /// Textual payload: `value` when present, otherwise `data` as (lossy) UTF-8.
    pub fn text(&self) -> String {
        match (&self.value, &self.data) {
            (Some(v), _) => v.clone(),
            (None, Some(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
            (None, None) => String::new(),
        }
    }
}

/* ---- Inspect ---- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectContentRequest {
    pub inspect_config: InspectConfig,
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectContentResponse {
    #[serde(default)]
    pub results: Vec<InspectResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectResult {
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub findings_truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub info_type: InfoType,
    #[serde(default)]
    pub likelihood: Likelihood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

/* ---- Redact ---- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactContentRequest {
    pub inspect_config: InspectConfig,
    pub replace_configs: Vec<ReplaceConfig>,
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceConfig {
    pub info_type: InfoType,
    pub replace_with: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactContentResponse {
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

/* ---- Deidentify ---- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeidentifyContentRequest {
    pub deidentify_config: DeidentifyConfig,
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeidentifyConfig {
    pub info_type_transformations: InfoTypeTransformations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoTypeTransformations {
    pub transformations: Vec<InfoTypeTransformation>,
}

/// One transformation rule. An empty `info_types` list applies the rule to
/// every info type the service detects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoTypeTransformation {
    #[serde(default)]
    pub info_types: Vec<InfoType>,
    pub primitive_transformation: PrimitiveTransformation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveTransformation {
    CharacterMaskConfig(CharacterMaskConfig),
    CryptoReplaceFfxFpeConfig(CryptoReplaceFfxFpeConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMaskConfig {
    pub masking_character: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoReplaceFfxFpeConfig {
    pub crypto_key: CryptoKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_alphabet: Option<FfxCommonNativeAlphabet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CryptoKey {
    KmsWrapped(KmsWrappedCryptoKey),
}

/// Key material encrypted by a KMS key; the service unwraps it before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmsWrappedCryptoKey {
    #[serde(with = "base64_vec")]
    pub wrapped_key: Vec<u8>,
    pub crypto_key_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FfxCommonNativeAlphabet {
    Numeric,
    Hexadecimal,
    UpperCaseAlphaNumeric,
    AlphaNumeric,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeidentifyContentResponse {
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

/* ---- Catalog ---- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInfoTypesRequest {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInfoTypesResponse {
    #[serde(default)]
    pub info_types: Vec<InfoTypeDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoTypeDescription {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub categories: Vec<CategoryDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRootCategoriesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRootCategoriesResponse {
    #[serde(default)]
    pub categories: Vec<CategoryDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDescription {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

/* ---- base64 byte fields ---- */

mod base64_vec {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(d)?;
        STANDARD
            .decode(raw.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

mod base64_opt {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => s.serialize_str(&STANDARD.encode(b)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| STANDARD.decode(s.as_bytes()))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
