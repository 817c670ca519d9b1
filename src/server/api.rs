use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversion::bands::{validate_output, BandValidationReport};
use crate::conversion::engine::convert_with_registry;
use crate::conversion::reference::compare_with_reference;
use crate::conversion::settings::{default_settings, ConversionSettings};
use crate::data::builtin::OSR_GENERIC_ID;
use crate::data::creature::{OutputCreatureData, ParsedCreatureData, SourceSystem};
use crate::data::packs::{all_packs, DISCLAIMER};
use crate::data::profile::effective_targets;
use crate::data::registry::ProfileRegistry;
use crate::data::role::{deserialize_lenient_role, CreatureRole};
use crate::data::tier::ThreatTier;
use crate::export::{json_export, render_text_card};
use crate::parser::{parse_stat_block, ParseResult};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("{0}")]
    Validation(String),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::InvalidBody(_) | Self::Validation(_) => (400, "Bad Request"),
            Self::Encode(_) => (500, "Internal Server Error"),
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::InvalidBody)
}

fn encode<T: Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn health_payload() -> Result<String, ApiError> {
    encode(&serde_json::json!({
        "status": "ok",
        "service": "statcard-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileListItem<'a> {
    pub id: &'a str,
    pub version: &'a str,
    pub display_name: &'a str,
    pub helper_text: &'a str,
    pub show_morale: bool,
    pub show_reaction: bool,
}

pub fn profiles_payload(registry: &ProfileRegistry) -> Result<String, ApiError> {
    let list: Vec<ProfileListItem<'_>> = registry
        .profiles()
        .map(|p| ProfileListItem {
            id: &p.id,
            version: &p.version,
            display_name: &p.display_name,
            helper_text: &p.helper_text,
            show_morale: p.show_morale,
            show_reaction: p.show_reaction,
        })
        .collect();
    encode(&serde_json::json!({ "profiles": list }))
}

pub fn packs_payload() -> Result<String, ApiError> {
    encode(&serde_json::json!({
        "packs": all_packs(),
        "disclaimer": DISCLAIMER
    }))
}

pub fn default_settings_payload() -> Result<String, ApiError> {
    encode(&default_settings())
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetsRequest {
    #[serde(default)]
    pub profile_id: Option<String>,
    pub tier: ThreatTier,
    #[serde(default, deserialize_with = "deserialize_lenient_role")]
    pub role: Option<CreatureRole>,
}

/// Effective targets for one profile, tier and role. Unknown profile ids fall back like
/// conversion does, so the response names the profile actually used.
pub fn targets_payload(registry: &ProfileRegistry, body: &str) -> Result<String, ApiError> {
    let req: TargetsRequest = parse_body(body)?;
    let profile = registry.resolve(req.profile_id.as_deref().unwrap_or(OSR_GENERIC_ID));
    let role = req.role.unwrap_or_default();
    encode(&serde_json::json!({
        "profile_id": profile.id,
        "tier": req.tier,
        "role": role,
        "targets": effective_targets(profile, req.tier, role),
        "tolerance": profile.tolerance,
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseRequest {
    pub text: String,
    #[serde(default)]
    pub system: Option<SourceSystem>,
}

pub fn parse_payload(body: &str) -> Result<String, ApiError> {
    let req: ParseRequest = parse_body(body)?;
    encode(&parse_stat_block(&req.text, req.system))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    pub parsed: ParsedCreatureData,
    #[serde(default)]
    pub settings: Option<ConversionSettings>,
}

pub fn convert_payload(registry: &ProfileRegistry, body: &str) -> Result<String, ApiError> {
    let req: ConvertRequest = parse_body(body)?;
    let settings = req.settings.unwrap_or_default();
    encode(&convert_with_registry(&req.parsed, &settings, registry))
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputRequest {
    pub output: OutputCreatureData,
}

pub fn validate_payload(registry: &ProfileRegistry, body: &str) -> Result<String, ApiError> {
    let req: OutputRequest = parse_body(body)?;
    encode(&validate_output(&req.output, registry))
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineRequest {
    pub text: String,
    #[serde(default)]
    pub system: Option<SourceSystem>,
    #[serde(default)]
    pub settings: Option<ConversionSettings>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResponse {
    pub parse: ParseResult,
    pub output: OutputCreatureData,
    pub validation: BandValidationReport,
}

/// Parse, convert and validate in one request.
pub fn pipeline_payload(registry: &ProfileRegistry, body: &str) -> Result<String, ApiError> {
    let req: PipelineRequest = parse_body(body)?;
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("text must not be empty".to_string()));
    }
    let parse = parse_stat_block(&req.text, req.system);
    let settings = req.settings.unwrap_or_default();
    let output = convert_with_registry(&parse.data, &settings, registry);
    let validation = validate_output(&output, registry);
    encode(&PipelineResponse {
        parse,
        output,
        validation,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    pub output: OutputCreatureData,
    #[serde(default)]
    pub format: ExportFormat,
}

pub fn export_payload(body: &str) -> Result<String, ApiError> {
    let req: ExportRequest = parse_body(body)?;
    match req.format {
        ExportFormat::Json => encode(&json_export(&req.output, Utc::now())?),
        ExportFormat::Text => encode(&serde_json::json!({ "text": render_text_card(&req.output) })),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceRequest {
    pub output: OutputCreatureData,
    #[serde(default)]
    pub reference_text: Option<String>,
}

pub fn reference_payload(body: &str) -> Result<String, ApiError> {
    let req: ReferenceRequest = parse_body(body)?;
    encode(&compare_with_reference(&req.output, req.reference_text.as_deref()))
}
