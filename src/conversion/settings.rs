//! User-controlled tuning knobs and their clamping rules.

use serde::{Deserialize, Serialize};

use crate::data::builtin::OSR_GENERIC_ID;
use crate::data::legacy::{deserialize_lenient_legacy, LegacyOutputProfile};
use crate::data::packs::SystemPackId;
use crate::data::role::{deserialize_lenient_role, CreatureRole};

pub const MIN_MULTIPLIER: f64 = 0.5;
pub const MAX_MULTIPLIER: f64 = 2.0;
pub const MAX_TARGET_LEVEL: i32 = 20;

fn neutral_multiplier() -> f64 {
    1.0
}

/// Fields missing from a payload deserialize as unset (multipliers as 1.0), so a payload that only
/// carries a legacy `output_profile` still reaches the legacy bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Damage multiplier, 0.5..=2.0.
    #[serde(default = "neutral_multiplier")]
    pub deadliness: f64,
    /// HP multiplier, 0.5..=2.0.
    #[serde(default = "neutral_multiplier")]
    pub durability: f64,
    /// Overrides any level, CR or HP found in the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_level: Option<i32>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<CreatureRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_profile_id: Option<String>,
    /// Older payloads select the profile through this label instead of `conversion_profile_id`.
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_legacy",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_profile: Option<LegacyOutputProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_pack_id: Option<String>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        default_settings()
    }
}

pub fn default_settings() -> ConversionSettings {
    ConversionSettings {
        deadliness: 1.0,
        durability: 1.0,
        target_level: None,
        role: None,
        conversion_profile_id: Some(OSR_GENERIC_ID.to_string()),
        output_profile: Some(LegacyOutputProfile::OsrGeneric),
        output_pack_id: Some(SystemPackId::OsrGeneric.as_str().to_string()),
    }
}

/// Clamp a multiplier into [MIN_MULTIPLIER, MAX_MULTIPLIER]. Non-finite input becomes 1.0.
pub fn clamp_multiplier(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    } else {
        1.0
    }
}

/// Settings with every numeric field forced into range. Never rejects; idempotent.
/// Identifier fields pass through untouched; the engine resolves them.
pub fn validate_settings(settings: &ConversionSettings) -> ConversionSettings {
    ConversionSettings {
        deadliness: clamp_multiplier(settings.deadliness),
        durability: clamp_multiplier(settings.durability),
        target_level: settings
            .target_level
            .map(|level| level.clamp(0, MAX_TARGET_LEVEL)),
        ..settings.clone()
    }
}
