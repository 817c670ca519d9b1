//! Conversion profile: per-tier base targets, per-role multipliers and band tolerances for one
//! output style. Profiles are read-only reference data; the engine and band validator only ever
//! see this shape, so new profiles (built-in or loaded from YAML) need no engine changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::role::CreatureRole;
use crate::data::tier::ThreatTier;

/// Round half toward positive infinity (2.5 -> 3, -2.5 -> -2).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place with [round_half_up].
pub fn round_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Base targets for one tier (standard creature, before role modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTargets {
    pub ac_target: i32,
    pub hp_target: i32,
    pub attack_bonus_target: i32,
    /// Average damage per round of the attack routine.
    pub dpr_target: f64,
    /// Profiles without morale leave this out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morale_target: Option<i32>,
}

/// Five tiers of [TierTargets]. On disk this is a map keyed 1..=5; every tier must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u8, TierTargets>", into = "BTreeMap<u8, TierTargets>")]
pub struct TierTable([TierTargets; 5]);

impl TierTable {
    pub fn new(tiers: [TierTargets; 5]) -> Self {
        Self(tiers)
    }

    pub fn get(&self, tier: ThreatTier) -> &TierTargets {
        &self.0[tier.index()]
    }

    /// Tiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (ThreatTier, &TierTargets)> {
        ThreatTier::ALL.into_iter().zip(self.0.iter())
    }
}

impl TryFrom<BTreeMap<u8, TierTargets>> for TierTable {
    type Error = String;

    fn try_from(map: BTreeMap<u8, TierTargets>) -> Result<Self, Self::Error> {
        if let Some(extra) = map.keys().find(|tier| !(1..=5).contains(*tier)) {
            return Err(format!("unexpected tier {extra}; tiers are 1 through 5"));
        }
        let mut tiers = Vec::with_capacity(5);
        for tier in ThreatTier::ALL {
            let targets = map
                .get(&tier.get())
                .ok_or_else(|| format!("missing targets for tier {tier}"))?;
            tiers.push(*targets);
        }
        let tiers: [TierTargets; 5] = tiers
            .try_into()
            .map_err(|_| "expected exactly five tiers".to_string())?;
        Ok(Self(tiers))
    }
}

impl From<TierTable> for BTreeMap<u8, TierTargets> {
    fn from(table: TierTable) -> Self {
        table
            .iter()
            .map(|(tier, targets)| (tier.get(), *targets))
            .collect()
    }
}

/// Multiplicative factors applied on top of a tier's base targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleModifiers {
    pub ac: f64,
    pub hp: f64,
    pub attack_bonus: f64,
    pub dpr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleModifierTable {
    pub brute: RoleModifiers,
    pub skirmisher: RoleModifiers,
    pub caster: RoleModifiers,
    pub boss: RoleModifiers,
    pub minion: RoleModifiers,
    pub support: RoleModifiers,
}

impl RoleModifierTable {
    pub fn get(&self, role: CreatureRole) -> &RoleModifiers {
        match role {
            CreatureRole::Brute => &self.brute,
            CreatureRole::Skirmisher => &self.skirmisher,
            CreatureRole::Caster => &self.caster,
            CreatureRole::Boss => &self.boss,
            CreatureRole::Minion => &self.minion,
            CreatureRole::Support => &self.support,
        }
    }
}

/// Band widths used by the band validator. AC and attack bonus are absolute (±points);
/// HP and DPR are fractions of the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub ac: f64,
    pub hp: f64,
    pub attack_bonus: f64,
    pub dpr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionProfile {
    pub id: String,
    pub version: String,
    pub display_name: String,
    #[serde(default)]
    pub helper_text: String,
    pub show_morale: bool,
    pub show_reaction: bool,
    pub base_tier_targets: TierTable,
    pub role_modifiers: RoleModifierTable,
    pub tolerance: Tolerance,
}

/// Numeric targets the engine aims for once tier and role are known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveTargets {
    pub ac_target: i32,
    pub hp_target: i32,
    pub attack_bonus_target: i32,
    pub dpr_target: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morale_target: Option<i32>,
}

/// Base tier targets scaled by the role's modifiers. AC, HP and attack bonus round to integers,
/// DPR to one decimal. Morale is taken from the tier unchanged.
pub fn effective_targets(
    profile: &ConversionProfile,
    tier: ThreatTier,
    role: CreatureRole,
) -> EffectiveTargets {
    let base = profile.base_tier_targets.get(tier);
    let modifiers = profile.role_modifiers.get(role);
    EffectiveTargets {
        ac_target: round_half_up(f64::from(base.ac_target) * modifiers.ac) as i32,
        hp_target: round_half_up(f64::from(base.hp_target) * modifiers.hp) as i32,
        attack_bonus_target: round_half_up(f64::from(base.attack_bonus_target) * modifiers.attack_bonus)
            as i32,
        dpr_target: round_tenth(base.dpr_target * modifiers.dpr),
        morale_target: base.morale_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin::osr_generic_profile;

    #[test]
    fn round_half_up_rounds_ties_toward_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-0.4), 0.0);
        assert_eq!(round_tenth(7.65), 7.7);
    }

    #[test]
    fn effective_targets_apply_role_modifiers() {
        let profile = osr_generic_profile();
        let tier = ThreatTier::new(3).unwrap();
        let targets = effective_targets(&profile, tier, CreatureRole::Skirmisher);
        assert_eq!(targets.ac_target, 15);
        assert_eq!(targets.hp_target, 18);
        assert_eq!(targets.attack_bonus_target, 6);
        assert_eq!(targets.dpr_target, 7.7);
        assert_eq!(targets.morale_target, Some(9));

        let brute = effective_targets(&profile, tier, CreatureRole::Brute);
        assert_eq!(brute.hp_target, 31);
        assert_eq!(brute.morale_target, Some(9), "role never changes morale");
    }

    #[test]
    fn tier_table_requires_all_five_tiers() {
        let yaml = r#"
1: { ac_target: 10, hp_target: 4, attack_bonus_target: 1, dpr_target: 3.0 }
2: { ac_target: 11, hp_target: 8, attack_bonus_target: 2, dpr_target: 5.0 }
"#;
        let parsed: Result<TierTable, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err());
    }
}
