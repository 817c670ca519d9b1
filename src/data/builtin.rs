//! Built-in conversion profiles. All numbers are house design targets, not figures from any
//! published bestiary. Tier rows must stay non-decreasing in every column; the registry tests
//! enforce that.

use crate::data::profile::{
    ConversionProfile, RoleModifierTable, RoleModifiers, TierTable, TierTargets, Tolerance,
};

pub const OSR_GENERIC_ID: &str = "osr_generic_v1";
pub const LEAN_COMPATIBLE_ID: &str = "lean_compatible_v1";

const fn tier(ac: i32, hp: i32, attack_bonus: i32, dpr: f64, morale: Option<i32>) -> TierTargets {
    TierTargets {
        ac_target: ac,
        hp_target: hp,
        attack_bonus_target: attack_bonus,
        dpr_target: dpr,
        morale_target: morale,
    }
}

const fn role(ac: f64, hp: f64, attack_bonus: f64, dpr: f64) -> RoleModifiers {
    RoleModifiers {
        ac,
        hp,
        attack_bonus,
        dpr,
    }
}

const STANDARD_TOLERANCE: Tolerance = Tolerance {
    ac: 1.0,
    hp: 0.15,
    attack_bonus: 1.0,
    dpr: 0.15,
};

/// Old-school generic: moderate HP, morale and reaction rolls, flat attack progression.
pub fn osr_generic_profile() -> ConversionProfile {
    ConversionProfile {
        id: OSR_GENERIC_ID.to_string(),
        version: "1.0.0".to_string(),
        display_name: "OSR Generic (conversion)".to_string(),
        helper_text: "Stat card balanced for old-school play: fast, lethal combat with morale and reaction rolls."
            .to_string(),
        show_morale: true,
        show_reaction: true,
        base_tier_targets: TierTable::new([
            tier(11, 6, 1, 3.5, Some(7)),
            tier(12, 12, 3, 5.5, Some(8)),
            tier(14, 22, 5, 8.5, Some(9)),
            tier(15, 40, 7, 13.5, Some(10)),
            tier(17, 72, 9, 21.0, Some(11)),
        ]),
        role_modifiers: RoleModifierTable {
            brute: role(1.0, 1.4, 0.9, 1.3),
            skirmisher: role(1.1, 0.8, 1.1, 0.9),
            caster: role(0.9, 0.8, 0.8, 1.1),
            boss: role(1.1, 2.0, 1.1, 1.4),
            minion: role(0.9, 0.5, 0.9, 0.7),
            support: role(1.0, 0.9, 0.8, 0.7),
        },
        tolerance: STANDARD_TOLERANCE,
    }
}

/// Lean fast-play: every HP cell at or below the generic profile's, no morale, no reaction roll.
pub fn lean_compatible_profile() -> ConversionProfile {
    ConversionProfile {
        id: LEAN_COMPATIBLE_ID.to_string(),
        version: "1.0.0".to_string(),
        display_name: "Lean fast-play (conversion)".to_string(),
        helper_text: "Lean HP and crisp damage for fast-play tables. Does not reproduce any official bestiary."
            .to_string(),
        show_morale: false,
        show_reaction: false,
        base_tier_targets: TierTable::new([
            tier(11, 4, 1, 3.5, None),
            tier(12, 8, 2, 5.5, None),
            tier(14, 16, 4, 8.5, None),
            tier(15, 28, 6, 13.5, None),
            tier(17, 50, 8, 21.0, None),
        ]),
        role_modifiers: RoleModifierTable {
            brute: role(1.0, 1.5, 0.9, 1.3),
            skirmisher: role(1.1, 0.8, 1.1, 0.9),
            caster: role(0.9, 0.7, 0.8, 1.1),
            boss: role(1.1, 2.2, 1.1, 1.5),
            minion: role(0.9, 0.5, 0.9, 0.7),
            support: role(0.9, 0.8, 0.8, 0.6),
        },
        tolerance: STANDARD_TOLERANCE,
    }
}

pub fn builtin_profiles() -> Vec<ConversionProfile> {
    vec![osr_generic_profile(), lean_compatible_profile()]
}
