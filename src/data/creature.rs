//! Creature records crossing the parse → convert → validate pipeline.
//! Plain data only: every type round-trips through JSON for external storage and export.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::legacy::LegacyOutputProfile;
use crate::data::packs::SystemPackId;
use crate::data::profile::EffectiveTargets;
use crate::data::role::CreatureRole;
use crate::data::tier::ThreatTier;

/// Rules system a stat block was written for. Used as a parse hint and as provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSystem {
    #[serde(rename = "5e")]
    Dnd5e,
    #[serde(rename = "bx")]
    Bx,
    #[serde(rename = "ose")]
    Ose,
    #[serde(rename = "other")]
    Other,
}

impl SourceSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dnd5e => "5e",
            Self::Bx => "bx",
            Self::Ose => "ose",
            Self::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "5e" | "dnd5e" => Self::Dnd5e,
            "bx" | "b/x" => Self::Bx,
            "ose" => Self::Ose,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attack. Order within a creature's list matters: the first entry is the primary attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<i32>,
    /// Dice expression `NdM[+/-K]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    /// Damage type word that followed the dice in the source text ("slashing").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attack {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bonus: None,
            damage: None,
            damage_type: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recharge: Option<String>,
}

/// Structured fields extracted from free text. Reviewers may edit it before conversion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedCreatureData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<String>,
    #[serde(default)]
    pub attacks: Vec<Attack>,
    #[serde(default)]
    pub special_actions: Vec<SpecialAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves: Option<String>,
    /// Challenge rating kept verbatim so fractions like "1/4" survive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SourceSystem>,
}

/// Where a converted card came from: source tag, target profile label and profile version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningProvenance {
    pub source_system: String,
    pub output_system: String,
    pub version: String,
}

/// Everything needed to reproduce and audit a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionTuning {
    pub profile_id: String,
    pub role: CreatureRole,
    pub hp_multiplier: f64,
    pub damage_multiplier: f64,
    pub targets: EffectiveTargets,
    pub provenance: TuningProvenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputCreatureData {
    pub name: String,
    pub ac: u32,
    pub hp: u32,
    pub movement: String,
    pub attacks: Vec<Attack>,
    pub saves: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub special_actions: Vec<SpecialAction>,
    pub morale: i32,
    pub loot_notes: String,
    pub threat_tier: ThreatTier,
    pub output_profile: LegacyOutputProfile,
    pub output_pack_id: SystemPackId,
    pub show_morale: bool,
    pub show_reaction: bool,
    /// Absent on cards produced before tuning metadata existed; such cards cannot be band-validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning: Option<ConversionTuning>,
}
