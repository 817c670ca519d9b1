//! Threat tier: ordinal 1..=5 severity derived from level, CR or HP.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("threat tier must be between 1 and 5, got {0}")]
pub struct TierError(pub u8);

/// Threat tier 1 (trivial) through 5 (deadly). Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ThreatTier(u8);

impl ThreatTier {
    pub const MIN: ThreatTier = ThreatTier(1);
    pub const MAX: ThreatTier = ThreatTier(5);
    pub const ALL: [ThreatTier; 5] = [
        ThreatTier(1),
        ThreatTier(2),
        ThreatTier(3),
        ThreatTier(4),
        ThreatTier(5),
    ];

    pub fn new(value: u8) -> Result<Self, TierError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TierError(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into per-tier tables.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for ThreatTier {
    type Error = TierError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ThreatTier> for u8 {
    fn from(tier: ThreatTier) -> Self {
        tier.0
    }
}

impl fmt::Display for ThreatTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Level bands: <=2, <=4, <=7, <=12, 13+.
pub fn level_to_tier(level: i64) -> ThreatTier {
    match level {
        i64::MIN..=2 => ThreatTier(1),
        3..=4 => ThreatTier(2),
        5..=7 => ThreatTier(3),
        8..=12 => ThreatTier(4),
        _ => ThreatTier(5),
    }
}

/// HP bands used when neither level nor CR is known: <=8, <=20, <=40, <=80, 81+.
pub fn hp_to_tier(hp: i64) -> ThreatTier {
    match hp {
        i64::MIN..=8 => ThreatTier(1),
        9..=20 => ThreatTier(2),
        21..=40 => ThreatTier(3),
        41..=80 => ThreatTier(4),
        _ => ThreatTier(5),
    }
}

/// Fractional CR ("1/4") maps to level 0. Whole CR parses its leading digits;
/// anything unreadable (or "0") counts as level 1.
pub fn cr_to_level(cr: &str) -> i64 {
    let cr = cr.trim();
    if cr.contains('/') {
        return 0;
    }
    let digits: String = cr.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<i64>() {
        Ok(0) | Err(_) => 1,
        Ok(level) => level,
    }
}
