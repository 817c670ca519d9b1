//! Creature role: the archetype whose modifiers bias a tier's base targets.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureRole {
    Brute,
    #[default]
    Skirmisher,
    Caster,
    Boss,
    Minion,
    Support,
}

impl CreatureRole {
    pub const ALL: [CreatureRole; 6] = [
        CreatureRole::Brute,
        CreatureRole::Skirmisher,
        CreatureRole::Caster,
        CreatureRole::Boss,
        CreatureRole::Minion,
        CreatureRole::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brute => "brute",
            Self::Skirmisher => "skirmisher",
            Self::Caster => "caster",
            Self::Boss => "boss",
            Self::Minion => "minion",
            Self::Support => "support",
        }
    }

    /// Case-insensitive lookup. Unknown names return None so callers fall back to the default role.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for CreatureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialize an optional role, mapping unrecognized names to None instead of failing.
pub fn deserialize_lenient_role<'de, D>(deserializer: D) -> Result<Option<CreatureRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(CreatureRole::parse))
}
