//! System packs: licensing and provenance metadata for each output family.
//! A pack does not change the numbers (profiles do that); it decides what the exported card
//! says about where its data came from.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPackId {
    #[default]
    OsrGeneric,
    Dnd5eSrd,
    PrivateVerify,
}

impl SystemPackId {
    pub const ALL: [SystemPackId; 3] = [Self::OsrGeneric, Self::Dnd5eSrd, Self::PrivateVerify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OsrGeneric => "osr_generic",
            Self::Dnd5eSrd => "dnd5e_srd",
            Self::PrivateVerify => "private_verify",
        }
    }
}

impl fmt::Display for SystemPackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a pack id from settings. Unknown or missing ids resolve to the generic pack.
pub fn resolve_pack_id(raw: Option<&str>) -> SystemPackId {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return SystemPackId::default();
    };
    match raw.to_ascii_lowercase().as_str() {
        "dnd5e_srd" | "5e_srd" | "srd" => SystemPackId::Dnd5eSrd,
        "private_verify" | "verify" | "shadowdark_private_verify" => SystemPackId::PrivateVerify,
        _ => SystemPackId::OsrGeneric,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseType {
    #[serde(rename = "CC-BY-4.0")]
    CcBy4,
    #[serde(rename = "UserProvided")]
    UserProvided,
    #[serde(rename = "Internal")]
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackLicense {
    pub license_type: LicenseType,
    /// Attribution that must travel with exports of CC-BY data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution_text: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemPack {
    pub id: SystemPackId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub license: PackLicense,
    /// The user must paste their own reference stat block to verify the card.
    pub requires_user_reference: bool,
}

pub const DISCLAIMER: &str =
    "Independent conversion tool. Not affiliated with any tabletop game publisher.";

const SRD_ATTRIBUTION: &str = "This content derives from the System Reference Document 5.1, \
     licensed under CC-BY 4.0 (https://creativecommons.org/licenses/by/4.0/).";

const PACKS: [SystemPack; 3] = [
    SystemPack {
        id: SystemPackId::OsrGeneric,
        display_name: "OSR Generic",
        description: "Heuristic conversion targeting old-school stat cards. No embedded third-party data.",
        license: PackLicense {
            license_type: LicenseType::Internal,
            attribution_text: None,
        },
        requires_user_reference: false,
    },
    SystemPack {
        id: SystemPackId::Dnd5eSrd,
        display_name: "5e (SRD)",
        description: "Conversion of SRD 5.1 monsters; exports carry the CC-BY attribution.",
        license: PackLicense {
            license_type: LicenseType::CcBy4,
            attribution_text: Some(SRD_ATTRIBUTION),
        },
        requires_user_reference: false,
    },
    SystemPack {
        id: SystemPackId::PrivateVerify,
        display_name: "Private verify",
        description: "Compatibility card checked against a reference stat block you paste from your own book. Nothing is embedded.",
        license: PackLicense {
            license_type: LicenseType::UserProvided,
            attribution_text: None,
        },
        requires_user_reference: true,
    },
];

pub fn get_pack(id: SystemPackId) -> &'static SystemPack {
    match id {
        SystemPackId::OsrGeneric => &PACKS[0],
        SystemPackId::Dnd5eSrd => &PACKS[1],
        SystemPackId::PrivateVerify => &PACKS[2],
    }
}

pub fn all_packs() -> &'static [SystemPack] {
    &PACKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pack_ids_fall_back_to_generic() {
        assert_eq!(resolve_pack_id(None), SystemPackId::OsrGeneric);
        assert_eq!(resolve_pack_id(Some("  ")), SystemPackId::OsrGeneric);
        assert_eq!(resolve_pack_id(Some("mystery_pack")), SystemPackId::OsrGeneric);
        assert_eq!(resolve_pack_id(Some("DND5E_SRD")), SystemPackId::Dnd5eSrd);
    }

    #[test]
    fn pack_table_is_indexed_by_id() {
        for id in SystemPackId::ALL {
            assert_eq!(get_pack(id).id, id);
        }
        assert!(get_pack(SystemPackId::Dnd5eSrd).license.attribution_text.is_some());
    }
}
