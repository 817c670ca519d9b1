//! Conversion engine: parsed source creature + settings in, balanced stat card out.
//! Single pass, pure, deterministic. Settings are clamped on entry, so out-of-range multipliers
//! reaching [convert] behave exactly like their clamped values.

use serde::Serialize;
use tracing::debug;

use crate::conversion::dice::{parse_dice, scale_existing, scale_to_target, DiceExpr};
use crate::conversion::settings::{validate_settings, ConversionSettings};
use crate::data::creature::{
    Attack, ConversionTuning, OutputCreatureData, ParsedCreatureData, TuningProvenance,
};
use crate::data::legacy::{legacy_label_for, resolve_profile_id};
use crate::data::packs::resolve_pack_id;
use crate::data::profile::{effective_targets, round_half_up};
use crate::data::registry::{builtin_registry, ProfileRegistry};
use crate::data::tier::{cr_to_level, hp_to_tier, level_to_tier, ThreatTier};

pub const FALLBACK_NAME: &str = "Unnamed Creature";
pub const FALLBACK_MOVEMENT: &str = "30 ft";
pub const UNKNOWN_SOURCE_SYSTEM: &str = "unknown";
/// HP assumed for tier inference when the source gives no level, CR or HP.
pub const ASSUMED_HP: u32 = 10;
/// Attacks beyond this are dropped.
pub const MAX_OUTPUT_ATTACKS: usize = 3;
/// Share of the damage budget given to the primary attack when there are several.
pub const PRIMARY_DPR_SHARE: f64 = 0.6;
pub const SPECIAL_ACTION_LIMIT: usize = 3;

const MOVEMENT_TRAITS: [(&str, &str); 4] = [
    ("fly", "Flying: can fly"),
    ("swim", "Aquatic: can swim"),
    ("climb", "Climber: can climb"),
    ("burrow", "Burrower: can burrow"),
];

const LOOT_BY_TIER: [&str; 5] = [
    "Minor trinkets, 1d6 cp",
    "2d6 sp, common item",
    "1d6 gp, uncommon item chance",
    "2d6 gp, uncommon item",
    "3d6 gp, rare item chance",
];

/// Which input decided the threat tier. The first available one always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierBasis {
    TargetLevel,
    Level,
    ChallengeRating,
    HitPoints,
}

pub fn resolve_threat_tier(
    parsed: &ParsedCreatureData,
    target_level: Option<i32>,
) -> (ThreatTier, TierBasis) {
    if let Some(level) = target_level {
        return (level_to_tier(i64::from(level)), TierBasis::TargetLevel);
    }
    if let Some(level) = parsed.level {
        return (level_to_tier(i64::from(level)), TierBasis::Level);
    }
    if let Some(cr) = parsed.cr.as_deref() {
        return (level_to_tier(cr_to_level(cr)), TierBasis::ChallengeRating);
    }
    let hp = parsed.hp.unwrap_or(ASSUMED_HP);
    (hp_to_tier(i64::from(hp)), TierBasis::HitPoints)
}

/// Tier for a creature under the given settings (target level clamped first).
pub fn determine_threat_tier(parsed: &ParsedCreatureData, settings: &ConversionSettings) -> ThreatTier {
    resolve_threat_tier(parsed, validate_settings(settings).target_level).0
}

/// Usable source dice: parses, has at least one die with at least one face, averages above zero.
fn scalable_dice(damage: Option<&str>) -> Option<DiceExpr> {
    let dice = parse_dice(damage?)?;
    (dice.num_dice > 0 && dice.die_size > 0 && dice.average() != 0.0).then_some(dice)
}

fn damage_for_share(source: Option<&str>, share: f64) -> DiceExpr {
    match scalable_dice(source) {
        Some(dice) => scale_existing(&dice, share / dice.average()),
        None => {
            if source.is_some() {
                debug!(damage = source, share, "source damage not scalable, synthesizing dice");
            }
            scale_to_target(share)
        }
    }
}

/// Output attacks: flat bonus, damage budget `dpr_target * deadliness` split 60/40 between the
/// primary attack and the rest.
pub fn build_attacks(
    source: &[Attack],
    attack_bonus: i32,
    dpr_target: f64,
    deadliness: f64,
) -> Vec<Attack> {
    let budget = dpr_target * deadliness;

    if source.is_empty() {
        return vec![Attack {
            bonus: Some(attack_bonus),
            damage: Some(scale_to_target(budget).to_string()),
            ..Attack::named("Attack")
        }];
    }

    let capped = &source[..source.len().min(MAX_OUTPUT_ATTACKS)];
    let secondary_share = if capped.len() > 1 {
        budget * (1.0 - PRIMARY_DPR_SHARE) / (capped.len() - 1) as f64
    } else {
        0.0
    };

    capped
        .iter()
        .enumerate()
        .map(|(index, attack)| {
            let share = match (index, capped.len()) {
                (_, 1) => budget,
                (0, _) => budget * PRIMARY_DPR_SHARE,
                _ => secondary_share,
            };
            Attack {
                name: attack.name.clone(),
                bonus: Some(attack_bonus),
                damage: Some(damage_for_share(attack.damage.as_deref(), share).to_string()),
                damage_type: attack.damage_type.clone(),
                description: attack.description.clone(),
            }
        })
        .collect()
}

/// One trait per movement mode mentioned in the movement text.
pub fn movement_traits(movement: Option<&str>) -> Vec<String> {
    let Some(movement) = movement else {
        return Vec::new();
    };
    let movement = movement.to_lowercase();
    MOVEMENT_TRAITS
        .iter()
        .filter(|(keyword, _)| movement.contains(keyword))
        .map(|(_, description)| description.to_string())
        .collect()
}

pub fn loot_notes(tier: ThreatTier) -> &'static str {
    LOOT_BY_TIER[tier.index()]
}

/// Blend source AC with the target, then keep it within `[target - 1, target + 2]`.
pub fn blend_ac(source_ac: Option<u32>, ac_target: i32) -> i32 {
    let blended = match source_ac {
        Some(ac) => round_half_up((f64::from(ac) + f64::from(ac_target)) / 2.0) as i32,
        None => ac_target,
    };
    blended.clamp(ac_target.saturating_sub(1), ac_target.saturating_add(2))
}

/// Convert using the built-in profiles.
pub fn convert(parsed: &ParsedCreatureData, settings: &ConversionSettings) -> OutputCreatureData {
    convert_with_registry(parsed, settings, builtin_registry())
}

pub fn convert_with_registry(
    parsed: &ParsedCreatureData,
    settings: &ConversionSettings,
    registry: &ProfileRegistry,
) -> OutputCreatureData {
    let settings = validate_settings(settings);

    let requested_id =
        resolve_profile_id(settings.conversion_profile_id.as_deref(), settings.output_profile);
    let profile = registry.resolve(&requested_id);
    let role = settings.role.unwrap_or_default();
    let (tier, basis) = resolve_threat_tier(parsed, settings.target_level);
    debug!(
        requested = %requested_id,
        profile = %profile.id,
        %role,
        %tier,
        ?basis,
        "resolved conversion inputs"
    );

    let targets = effective_targets(profile, tier, role);

    let hp = round_half_up(f64::from(targets.hp_target) * settings.durability).max(1.0) as u32;
    let ac = blend_ac(parsed.ac, targets.ac_target).max(0) as u32;
    let attacks = build_attacks(
        &parsed.attacks,
        targets.attack_bonus_target,
        targets.dpr_target,
        settings.deadliness,
    );

    let saves = parsed
        .saves
        .clone()
        .unwrap_or_else(|| format!("+{} vs physical effects", tier.get() + 2));

    let tuning = ConversionTuning {
        profile_id: profile.id.clone(),
        role,
        hp_multiplier: settings.durability,
        damage_multiplier: settings.deadliness,
        targets,
        provenance: TuningProvenance {
            source_system: parsed
                .system
                .map_or(UNKNOWN_SOURCE_SYSTEM, |system| system.as_str())
                .to_string(),
            output_system: profile.display_name.clone(),
            version: profile.version.clone(),
        },
    };

    OutputCreatureData {
        name: parsed
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_NAME.to_string()),
        ac,
        hp,
        movement: parsed
            .movement
            .clone()
            .filter(|movement| !movement.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_MOVEMENT.to_string()),
        attacks,
        saves,
        traits: movement_traits(parsed.movement.as_deref()),
        special_actions: parsed
            .special_actions
            .iter()
            .take(SPECIAL_ACTION_LIMIT)
            .cloned()
            .collect(),
        morale: targets.morale_target.unwrap_or(0),
        loot_notes: loot_notes(tier).to_string(),
        threat_tier: tier,
        output_profile: legacy_label_for(&profile.id),
        output_pack_id: resolve_pack_id(settings.output_pack_id.as_deref()),
        show_morale: profile.show_morale,
        show_reaction: profile.show_reaction,
        tuning: Some(tuning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::settings::default_settings;

    #[test]
    fn ac_blend_stays_near_target() {
        assert_eq!(blend_ac(None, 15), 15);
        assert_eq!(blend_ac(Some(15), 15), 15);
        assert_eq!(blend_ac(Some(20), 14), 16);
        assert_eq!(blend_ac(Some(30), 14), 16);
        assert_eq!(blend_ac(Some(5), 14), 13);
        assert_eq!(blend_ac(Some(10), i32::MAX), i32::MAX - 1);
        assert_eq!(blend_ac(None, i32::MIN), i32::MIN);
    }

    #[test]
    fn tier_resolution_order() {
        let parsed = ParsedCreatureData {
            level: Some(10),
            cr: Some("1/4".to_string()),
            hp: Some(200),
            ..ParsedCreatureData::default()
        };
        assert_eq!(resolve_threat_tier(&parsed, Some(1)), (ThreatTier::MIN, TierBasis::TargetLevel));
        assert_eq!(resolve_threat_tier(&parsed, None).1, TierBasis::Level);

        let by_cr = ParsedCreatureData {
            cr: Some("1/4".to_string()),
            hp: Some(200),
            ..ParsedCreatureData::default()
        };
        assert_eq!(resolve_threat_tier(&by_cr, None), (ThreatTier::MIN, TierBasis::ChallengeRating));

        let by_hp = ParsedCreatureData {
            hp: Some(200),
            ..ParsedCreatureData::default()
        };
        assert_eq!(resolve_threat_tier(&by_hp, None), (ThreatTier::MAX, TierBasis::HitPoints));

        let bare = ParsedCreatureData::default();
        assert_eq!(resolve_threat_tier(&bare, None).0.get(), 2);
    }

    #[test]
    fn single_attack_takes_whole_budget() {
        let attacks = build_attacks(&[Attack::named("Bite")], 5, 8.0, 1.0);
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].bonus, Some(5));
        assert_eq!(attacks[0].damage.as_deref(), Some("3d4"));
    }

    #[test]
    fn several_attacks_split_sixty_forty() {
        let source = vec![
            Attack {
                damage: Some("2d6".to_string()),
                damage_type: Some("slashing".to_string()),
                ..Attack::named("Greatsword")
            },
            Attack::named("Kick"),
            Attack::named("Headbutt"),
            Attack::named("Spit"),
        ];
        let attacks = build_attacks(&source, 4, 10.0, 1.0);
        assert_eq!(attacks.len(), MAX_OUTPUT_ATTACKS);
        // 6.0 from 2d6 keeps d6s; 2.0 each for the others.
        assert_eq!(attacks[0].damage.as_deref(), Some("2d6-1"));
        assert_eq!(attacks[0].damage_type.as_deref(), Some("slashing"));
        assert_eq!(attacks[1].damage.as_deref(), Some("1d4"));
        assert_eq!(attacks[2].damage.as_deref(), Some("1d4"));
        assert!(attacks.iter().all(|a| a.bonus == Some(4)));
    }

    #[test]
    fn unparseable_damage_is_synthesized() {
        let source = vec![Attack {
            damage: Some("see text".to_string()),
            ..Attack::named("Gaze")
        }];
        let attacks = build_attacks(&source, 3, 7.7, 1.0);
        assert_eq!(attacks[0].damage.as_deref(), Some("3d4"));

        let zero = vec![Attack {
            damage: Some("0d6".to_string()),
            ..Attack::named("Touch")
        }];
        assert_eq!(build_attacks(&zero, 3, 7.7, 1.0)[0].damage.as_deref(), Some("3d4"));

        let flat = vec![Attack {
            damage: Some("2d6-7".to_string()),
            ..Attack::named("Nibble")
        }];
        assert_eq!(build_attacks(&flat, 3, 7.7, 1.0)[0].damage.as_deref(), Some("3d4"));
    }

    #[test]
    fn negative_source_damage_is_rescaled_not_replaced() {
        let source = vec![Attack {
            damage: Some("1d4-5".to_string()),
            ..Attack::named("Feeble Slap")
        }];
        let attacks = build_attacks(&source, 3, 7.7, 1.0);
        assert_eq!(attacks[0].damage.as_deref(), Some("5d4-5"));
    }

    #[test]
    fn traits_follow_movement_modes() {
        assert_eq!(
            movement_traits(Some("30 ft., fly 60 ft., swim 30 ft.")),
            vec!["Flying: can fly".to_string(), "Aquatic: can swim".to_string()]
        );
        assert!(movement_traits(Some("30 ft")).is_empty());
        assert!(movement_traits(None).is_empty());
    }

    #[test]
    fn extreme_profile_targets_do_not_overflow() {
        let mut fortress = crate::data::builtin::osr_generic_profile();
        fortress.id = "fortress_v1".to_string();
        let tiers: Vec<_> = fortress
            .base_tier_targets
            .iter()
            .map(|(_, targets)| crate::data::profile::TierTargets {
                ac_target: i32::MAX,
                ..*targets
            })
            .collect();
        fortress.base_tier_targets = crate::data::profile::TierTable::new([
            tiers[0], tiers[1], tiers[2], tiers[3], tiers[4],
        ]);
        let registry = ProfileRegistry::builtin().with_profile(fortress);

        let parsed = ParsedCreatureData {
            ac: Some(10),
            ..ParsedCreatureData::default()
        };
        let settings = ConversionSettings {
            conversion_profile_id: Some("fortress_v1".to_string()),
            ..default_settings()
        };
        let output = convert_with_registry(&parsed, &settings, &registry);
        assert_eq!(output.ac, (i32::MAX - 1) as u32);
    }

    #[test]
    fn convert_fills_fallbacks() {
        let output = convert(&ParsedCreatureData::default(), &default_settings());
        assert_eq!(output.name, FALLBACK_NAME);
        assert_eq!(output.movement, FALLBACK_MOVEMENT);
        assert_eq!(output.saves, "+4 vs physical effects");
        assert_eq!(output.attacks.len(), 1);
        assert_eq!(output.attacks[0].name, "Attack");
        assert_eq!(output.loot_notes, "2d6 sp, common item");
        let tuning = output.tuning.unwrap();
        assert_eq!(tuning.provenance.source_system, UNKNOWN_SOURCE_SYSTEM);
        assert_eq!(tuning.provenance.output_system, "OSR Generic (conversion)");
    }
}
