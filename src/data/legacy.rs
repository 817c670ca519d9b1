//! Bridge from older identifiers to current canonical ones.
//! Cards and settings saved before conversion profiles existed carry a coarse output-profile label;
//! older clients also send profile ids without a version suffix. Everything here is a pure
//! translation table so the engine only ever sees canonical profile ids.

use serde::{Deserialize, Deserializer, Serialize};

use crate::data::builtin::{LEAN_COMPATIBLE_ID, OSR_GENERIC_ID};

/// Coarse output-profile label kept on every card for older readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyOutputProfile {
    HouseDefault,
    OsrGeneric,
    LeanCompatible,
}

impl LegacyOutputProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HouseDefault => "house_default",
            Self::OsrGeneric => "osr_generic",
            Self::LeanCompatible => "lean_compatible",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "house_default" => Some(Self::HouseDefault),
            "osr_generic" => Some(Self::OsrGeneric),
            "lean_compatible" => Some(Self::LeanCompatible),
            _ => None,
        }
    }

    /// Human-readable label shown by older card renderers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HouseDefault => "House Stat Card (Default)",
            Self::OsrGeneric => "OSR Generic",
            Self::LeanCompatible => "Lean fast-play (compatibility)",
        }
    }
}

/// Deserialize an optional legacy label, dropping unknown values.
pub fn deserialize_lenient_legacy<'de, D>(
    deserializer: D,
) -> Result<Option<LegacyOutputProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(LegacyOutputProfile::parse))
}

/// Unversioned or renamed ids accepted from older payloads.
const PROFILE_ID_ALIASES: &[(&str, &str)] = &[
    ("osr_generic", OSR_GENERIC_ID),
    ("osr", OSR_GENERIC_ID),
    ("house_default", OSR_GENERIC_ID),
    ("lean_compatible", LEAN_COMPATIBLE_ID),
    ("lean", LEAN_COMPATIBLE_ID),
];

/// Map an alias to its canonical profile id. Returns None when the id is not an alias.
pub fn canonical_profile_alias(raw: &str) -> Option<&'static str> {
    let normalized = raw.trim().to_ascii_lowercase();
    PROFILE_ID_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| *canonical)
}

/// Canonical profile id for a settings payload: an explicit id (alias-mapped) wins, then the
/// legacy label, then the generic default. The result may still be unknown to the registry.
pub fn resolve_profile_id(explicit: Option<&str>, legacy: Option<LegacyOutputProfile>) -> String {
    match explicit.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => canonical_profile_alias(id).unwrap_or(id).to_string(),
        None => profile_id_for_legacy(legacy).to_string(),
    }
}

/// Profile id implied by a legacy label when no explicit profile id was chosen.
pub fn profile_id_for_legacy(label: Option<LegacyOutputProfile>) -> &'static str {
    match label {
        Some(LegacyOutputProfile::LeanCompatible) => LEAN_COMPATIBLE_ID,
        _ => OSR_GENERIC_ID,
    }
}

/// Legacy label written onto a card produced with the given canonical profile id.
pub fn legacy_label_for(profile_id: &str) -> LegacyOutputProfile {
    match profile_id {
        LEAN_COMPATIBLE_ID => LegacyOutputProfile::LeanCompatible,
        OSR_GENERIC_ID => LegacyOutputProfile::OsrGeneric,
        _ => LegacyOutputProfile::HouseDefault,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_ids() {
        assert_eq!(canonical_profile_alias("osr_generic"), Some(OSR_GENERIC_ID));
        assert_eq!(canonical_profile_alias(" Lean_Compatible "), Some(LEAN_COMPATIBLE_ID));
        assert_eq!(canonical_profile_alias("osr_generic_v1"), None);
    }

    #[test]
    fn explicit_profile_id_beats_legacy_label() {
        assert_eq!(
            resolve_profile_id(Some("homebrew_v2"), Some(LegacyOutputProfile::LeanCompatible)),
            "homebrew_v2"
        );
        assert_eq!(
            resolve_profile_id(Some("  "), Some(LegacyOutputProfile::LeanCompatible)),
            LEAN_COMPATIBLE_ID
        );
        assert_eq!(resolve_profile_id(Some("lean"), None), LEAN_COMPATIBLE_ID);
        assert_eq!(resolve_profile_id(None, None), OSR_GENERIC_ID);
    }

    #[test]
    fn legacy_labels_round_trip_through_profile_ids() {
        for label in [LegacyOutputProfile::OsrGeneric, LegacyOutputProfile::LeanCompatible] {
            assert_eq!(legacy_label_for(profile_id_for_legacy(Some(label))), label);
        }
        assert_eq!(profile_id_for_legacy(Some(LegacyOutputProfile::HouseDefault)), OSR_GENERIC_ID);
        assert_eq!(profile_id_for_legacy(None), OSR_GENERIC_ID);
        assert_eq!(legacy_label_for("homebrew_v2"), LegacyOutputProfile::HouseDefault);
    }
}
