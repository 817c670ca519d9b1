use statcard::data::creature::SourceSystem;
use statcard::parser::{parse_stat_block, AttackFormat, UNKNOWN_NAME};

const GOBLIN_5E: &str = "Goblin
Small humanoid (goblinoid), neutral evil
Armor Class 15 (leather armor, shield)
Hit Points 7 (2d6)
Speed 30 ft.
Challenge 1/4 (50 XP)

Nimble Escape. The goblin can take the Disengage or Hide action as a bonus action on each of its turns.

Actions
Scimitar. Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage.
Shortbow. Ranged Weapon Attack: +4 to hit, range 80/320 ft., one target. Hit: 5 (1d6 + 2) piercing damage.";

const YOUNG_RED_DRAGON: &str = "## **Young Red Dragon**
Armor Class 18 (natural armor)
Hit Points 178 (17d10 + 85)
Speed 40 ft., climb 40 ft., fly 80 ft.
Saving Throws Dex +4, Con +9, Wis +4, Cha +8
Challenge 10 (5,900 XP)
***Fire Breath (Recharge 5-6).*** The dragon exhales fire in a 30-foot cone.
Bite. Melee Weapon Attack: +10 to hit, reach 10 ft., one target. Hit: 17 (2d10 + 6) piercing damage.
Claw. Melee Weapon Attack: +10 to hit, reach 5 ft., one target. Hit: 13 (2d6 + 6) slashing damage.";

const BX_ORC: &str = "Orc
AC 6 [13], HD 1 (4hp), Att 1 x weapon (1d6), THAC0 19 [+0], MV 120' (40'), SV D12 W13 P14 B15 S16 (1), ML 8, AL Chaotic, XP 10";

#[test]
fn simplified_goblin_parses_every_core_field() {
    let text = "Goblin\nAC 15\nHP 7\nSpeed 30 ft.\nMelee Attack: Scimitar +4 to hit, 1d6+2 slashing damage";
    let result = parse_stat_block(text, Some(SourceSystem::parse("5e")));

    assert!(result.success);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.attack_format, Some(AttackFormat::Simplified));
    assert_eq!(result.data.system, Some(SourceSystem::Dnd5e));
    assert_eq!(result.confidence, 0.75);

    let data = result.data;
    assert_eq!(data.name.as_deref(), Some("Goblin"));
    assert_eq!(data.ac, Some(15));
    assert_eq!(data.hp, Some(7));
    assert_eq!(data.movement.as_deref(), Some("30 ft."));
    assert_eq!(data.attacks.len(), 1);
    assert_eq!(data.attacks[0].name, "Scimitar");
    assert_eq!(data.attacks[0].bonus, Some(4));
    assert_eq!(data.attacks[0].damage.as_deref(), Some("1d6+2"));
    assert_eq!(data.attacks[0].damage_type.as_deref(), Some("slashing"));
}

#[test]
fn full_5e_block_reads_attacks_traits_and_challenge() {
    let result = parse_stat_block(GOBLIN_5E, Some(SourceSystem::Dnd5e));

    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.attack_format, Some(AttackFormat::Standard5e));
    assert!((result.confidence - 5.5 / 6.0).abs() < 1e-9);

    let data = result.data;
    assert_eq!(data.system, Some(SourceSystem::Dnd5e));
    assert_eq!(data.ac, Some(15));
    assert_eq!(data.hp, Some(7));
    assert_eq!(data.cr.as_deref(), Some("1/4"));
    assert_eq!(data.level, Some(0));
    let names: Vec<&str> = data.attacks.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Scimitar", "Shortbow"]);
    assert_eq!(data.attacks[1].damage_type.as_deref(), Some("piercing"));
    assert_eq!(data.special_actions.len(), 1);
    assert_eq!(data.special_actions[0].name, "Nimble Escape");
    assert!(data.saves.is_none());
}

#[test]
fn markdown_block_with_recharge_and_saves() {
    let result = parse_stat_block(YOUNG_RED_DRAGON, None);
    assert_eq!(result.confidence, 1.0);

    let data = result.data;
    assert_eq!(data.name.as_deref(), Some("Young Red Dragon"));
    assert_eq!(data.ac, Some(18));
    assert_eq!(data.hp, Some(178));
    assert_eq!(data.movement.as_deref(), Some("40 ft., climb 40 ft., fly 80 ft."));
    assert_eq!(data.saves.as_deref(), Some("Dex +4, Con +9, Wis +4, Cha +8"));
    assert_eq!(data.cr.as_deref(), Some("10"));
    assert_eq!(data.level, Some(10));

    let breath = &data.special_actions[0];
    assert_eq!(breath.name, "Fire Breath");
    assert_eq!(breath.recharge.as_deref(), Some("Recharge 5-6"));
    assert_eq!(breath.description, "The dragon exhales fire in a 30-foot cone.");

    assert_eq!(data.attacks[0].damage.as_deref(), Some("2d10+6"));
    assert_eq!(data.attacks[1].damage.as_deref(), Some("2d6+6"));
}

#[test]
fn old_school_line_keeps_descending_ac_and_movement() {
    let result = parse_stat_block(BX_ORC, Some(SourceSystem::Bx));
    let data = &result.data;
    assert_eq!(data.name.as_deref(), Some("Orc"));
    assert_eq!(data.ac, Some(6));
    assert_eq!(data.hp, Some(4));
    assert_eq!(data.movement.as_deref(), Some("120' (40')"));
    assert!(data.attacks.is_empty());
    assert!(data.cr.is_none() && data.level.is_none());
    assert_eq!(result.warnings, vec!["Could not extract attacks".to_string()]);
    assert!(result.success);
}

#[test]
fn unreadable_text_still_returns_a_result() {
    let result = parse_stat_block("???", None);
    assert!(!result.success);
    assert_eq!(result.data.name.as_deref(), Some("???"));
    assert!(result.warnings.iter().any(|w| w == "Could not extract AC"));
    assert!(result.warnings.iter().any(|w| w == "Could not extract HP"));

    let empty = parse_stat_block("", None);
    assert!(!empty.success);
    assert_eq!(empty.confidence, 0.0);
    assert_eq!(empty.warnings, vec!["Empty text provided".to_string()]);
    assert!(empty.data.name.is_none());
    assert_ne!(empty.data.name.as_deref(), Some(UNKNOWN_NAME));
}

#[test]
fn weapon_keywords_are_the_last_resort() {
    let result = parse_stat_block("Wolf\nAC 13 HP 11\nIt attacks with a bite and a claw.", None);
    assert_eq!(result.attack_format, Some(AttackFormat::WeaponKeyword));
    let names: Vec<&str> = result.data.attacks.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Bite", "Claw"]);
    assert!(result.data.attacks.iter().all(|a| a.damage.is_none()));
}

#[test]
fn parse_result_serializes_for_review() {
    let result = parse_stat_block(GOBLIN_5E, Some(SourceSystem::Dnd5e));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["data"]["system"], "5e");
    assert_eq!(json["data"]["cr"], "1/4");
    assert_eq!(json["attack_format"], "standard5e");
    assert_eq!(json["success"], true);
}
