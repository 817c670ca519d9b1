//! Band validation: score a converted card against the targets recorded in its tuning block.
//! "Balanced" means within the profile's own tolerance bands, nothing more.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conversion::dice::dice_average;
use crate::data::creature::{Attack, OutputCreatureData};
use crate::data::profile::{round_half_up, round_tenth, ConversionProfile, Tolerance};
use crate::data::registry::ProfileRegistry;

pub const NO_TUNING_SUMMARY: &str = "No tuning data; re-convert to generate a validation report.";
pub const BALANCED_SUMMARY: &str = "All stats within target bands. Balanced.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandStatus {
    Pass,
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandField {
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "HP")]
    Hp,
    #[serde(rename = "Attack Bonus")]
    AttackBonus,
    #[serde(rename = "DPR")]
    Dpr,
}

impl BandField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ac => "AC",
            Self::Hp => "HP",
            Self::AttackBonus => "Attack Bonus",
            Self::Dpr => "DPR",
        }
    }

    fn suggestion(&self, status: BandStatus) -> Option<&'static str> {
        match (self, status) {
            (_, BandStatus::Pass) => None,
            (Self::Ac, BandStatus::High) => Some("Reduce source AC or lower the tier."),
            (Self::Ac, BandStatus::Low) => Some("Increase source AC or raise the tier."),
            (Self::Hp, BandStatus::High) => Some("Lower the Durability slider or reduce the tier."),
            (Self::Hp, BandStatus::Low) => Some("Raise the Durability slider or increase the tier."),
            (Self::AttackBonus, BandStatus::High) => {
                Some("Lower the attack bonus or switch role to Minion.")
            }
            (Self::AttackBonus, BandStatus::Low) => {
                Some("Source attack bonus may be unusually low. Try changing role to Skirmisher.")
            }
            (Self::Dpr, BandStatus::High) => Some("Lower the Deadliness slider."),
            (Self::Dpr, BandStatus::Low) => Some("Raise the Deadliness slider or switch role to Brute."),
        }
    }
}

impl fmt::Display for BandField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandResult {
    pub field: BandField,
    pub value: f64,
    pub target: f64,
    pub status: BandStatus,
    /// Signed difference for display ("+3", "-1.5").
    pub delta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandValidationReport {
    /// Percentage of fields within tolerance, 0..=100.
    pub score: u8,
    pub balanced: bool,
    pub results: Vec<BandResult>,
    pub summary: String,
}

impl BandValidationReport {
    fn without_tuning() -> Self {
        Self {
            score: 0,
            balanced: false,
            results: Vec::new(),
            summary: NO_TUNING_SUMMARY.to_string(),
        }
    }

    pub fn out_of_band(&self) -> impl Iterator<Item = &BandResult> {
        self.results.iter().filter(|r| r.status != BandStatus::Pass)
    }
}

/// Average damage of the primary attack only; 0 when it has no parseable dice.
pub fn calc_dpr(attacks: &[Attack]) -> f64 {
    attacks
        .first()
        .and_then(|primary| primary.damage.as_deref())
        .and_then(dice_average)
        .unwrap_or(0.0)
}

fn status_for(excess: f64, tolerance: f64) -> BandStatus {
    if excess.abs() <= tolerance {
        BandStatus::Pass
    } else if excess > 0.0 {
        BandStatus::High
    } else {
        BandStatus::Low
    }
}

fn signed(delta: f64) -> String {
    if delta >= 0.0 {
        format!("+{delta}")
    } else {
        format!("{delta}")
    }
}

fn fraction_of(target: f64, actual: f64) -> f64 {
    if target > 0.0 {
        (actual - target) / target
    } else {
        0.0
    }
}

fn band(field: BandField, value: f64, target: f64, status: BandStatus, delta: f64) -> BandResult {
    BandResult {
        field,
        value,
        target,
        status,
        delta: signed(delta),
        suggestion: field.suggestion(status).map(str::to_string),
    }
}

/// Check AC, HP, primary attack bonus and primary-attack DPR against the recorded targets using
/// `profile`'s tolerances. A card without tuning scores 0.
pub fn validate_bands(output: &OutputCreatureData, profile: &ConversionProfile) -> BandValidationReport {
    let Some(tuning) = output.tuning.as_ref() else {
        return BandValidationReport::without_tuning();
    };
    let targets = &tuning.targets;
    let Tolerance {
        ac: ac_tolerance,
        hp: hp_tolerance,
        attack_bonus: ab_tolerance,
        dpr: dpr_tolerance,
    } = profile.tolerance;

    let ac = f64::from(output.ac);
    let ac_target = f64::from(targets.ac_target);
    let ac_delta = ac - ac_target;

    let hp = f64::from(output.hp);
    let hp_target = f64::from(targets.hp_target);

    let attack_bonus = f64::from(output.attacks.first().and_then(|a| a.bonus).unwrap_or(0));
    let ab_target = f64::from(targets.attack_bonus_target);
    let ab_delta = attack_bonus - ab_target;

    let dpr = calc_dpr(&output.attacks);

    let results = vec![
        band(BandField::Ac, ac, ac_target, status_for(ac_delta, ac_tolerance), ac_delta),
        band(
            BandField::Hp,
            hp,
            hp_target,
            status_for(fraction_of(hp_target, hp), hp_tolerance),
            hp - hp_target,
        ),
        band(
            BandField::AttackBonus,
            attack_bonus,
            ab_target,
            status_for(ab_delta, ab_tolerance),
            ab_delta,
        ),
        band(
            BandField::Dpr,
            round_tenth(dpr),
            targets.dpr_target,
            status_for(fraction_of(targets.dpr_target, dpr), dpr_tolerance),
            round_tenth(dpr - targets.dpr_target),
        ),
    ];

    let passed = results.iter().filter(|r| r.status == BandStatus::Pass).count();
    let score = round_half_up(100.0 * passed as f64 / results.len() as f64) as u8;
    let balanced = score == 100;
    let summary = if balanced {
        BALANCED_SUMMARY.to_string()
    } else {
        let fields: Vec<&str> = results
            .iter()
            .filter(|r| r.status != BandStatus::Pass)
            .map(|r| r.field.label())
            .collect();
        let noun = if fields.len() == 1 { "stat" } else { "stats" };
        format!("{} {noun} outside target bands: {}.", fields.len(), fields.join(", "))
    };

    BandValidationReport {
        score,
        balanced,
        results,
        summary,
    }
}

/// Validate against the profile named in the card's own tuning block.
pub fn validate_output(output: &OutputCreatureData, registry: &ProfileRegistry) -> BandValidationReport {
    match output.tuning.as_ref() {
        Some(tuning) => validate_bands(output, registry.resolve(&tuning.profile_id)),
        None => BandValidationReport::without_tuning(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpr_uses_primary_attack_only() {
        let attacks = vec![
            Attack {
                damage: Some("2d6+1".to_string()),
                ..Attack::named("Claw")
            },
            Attack {
                damage: Some("4d10".to_string()),
                ..Attack::named("Bite")
            },
        ];
        assert_eq!(calc_dpr(&attacks), 8.0);
        assert_eq!(calc_dpr(&[Attack::named("Gaze")]), 0.0);
        assert_eq!(calc_dpr(&[]), 0.0);
    }

    #[test]
    fn signed_delta_formatting() {
        assert_eq!(signed(3.0), "+3");
        assert_eq!(signed(0.0), "+0");
        assert_eq!(signed(-1.5), "-1.5");
    }

    #[test]
    fn status_respects_tolerance_edges() {
        assert_eq!(status_for(1.0, 1.0), BandStatus::Pass);
        assert_eq!(status_for(-1.0, 1.0), BandStatus::Pass);
        assert_eq!(status_for(2.0, 1.0), BandStatus::High);
        assert_eq!(status_for(-0.2, 0.15), BandStatus::Low);
    }
}
