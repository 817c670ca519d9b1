//! Attack extraction as an ordered cascade of text formats. Each format is tried only when every
//! earlier one found nothing.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::data::creature::Attack;

pub const MAX_ATTACKS: usize = 5;

/// "Scimitar. Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage."
static STANDARD_5E_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([A-Z][a-z]+(?:[ \t]+[A-Za-z]+)?)\.\s*(?:Melee|Ranged)\s*(?:Weapon\s*)?Attack:\s*\+?(\d+)\s*to\s*hit[^\n]*?Hit:\s*\d+\s*\(([^)]+)\)\s*(\w+)\s*damage",
    )
    .expect("valid regex")
});

/// "Melee Attack: Scimitar +4 to hit, 1d6+2 slashing damage"
static SIMPLIFIED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:Melee|Ranged)\s*Attack:\s*([A-Za-z]+(?:[ \t]+[A-Za-z]+)?)\s*([+-]\d+)\s*to\s*hit[,\s]+(\d+d\d+(?:\s*[+-]\s*\d+)?)\s*(\w+)?\s*damage",
    )
    .expect("valid regex")
});

/// "Bite (+3): 1d6"
static PARENTHETICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Z][a-z]+(?:[ \t]+[A-Za-z]+)?)\s*\(([+-]?\d+)\)[:\s]+(\d+d\d+(?:\s*[+-]\s*\d+)?)")
        .expect("valid regex")
});

/// Anything shaped like "Name ... Attack +B to hit ... Hit: N (dice)".
static GENERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\w+(?:[ \t]+\w+)?)[.:]?\s*(?:Melee|Ranged)?\s*(?:Weapon\s*)?Attack[:\s]*([+-]\d+)\s*to\s*hit[^\n]*?Hit[:\s]+\d+\s*\(([^)]+)\)",
    )
    .expect("valid regex")
});

static WEAPON_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(scimitar|longsword|shortbow|longbow|claw|bite|slam|sword|dagger|staff|bow|crossbow|fist|tentacle|gore|sting|mace|spear|axe|hammer|greataxe|javelin)\b",
    )
    .expect("valid regex")
});

/// Text layouts the attack cascade recognizes, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackFormat {
    Standard5e,
    Simplified,
    Parenthetical,
    Generic,
    WeaponKeyword,
}

impl AttackFormat {
    pub const CASCADE: [AttackFormat; 5] = [
        Self::Standard5e,
        Self::Simplified,
        Self::Parenthetical,
        Self::Generic,
        Self::WeaponKeyword,
    ];

    /// All attacks in `text` written in this format, de-duplicated by name.
    pub fn extract(self, text: &str) -> Vec<Attack> {
        let mut seen = HashSet::new();
        let mut attacks = Vec::new();
        let mut push = |attack: Attack| {
            if seen.insert(attack.name.to_lowercase()) {
                attacks.push(attack);
            }
        };
        match self {
            Self::Standard5e => STANDARD_5E_RE.captures_iter(text).for_each(|caps| {
                push(Attack {
                    damage_type: capture(&caps, 4),
                    ..dice_attack(&caps)
                })
            }),
            Self::Simplified => SIMPLIFIED_RE.captures_iter(text).for_each(|caps| {
                push(Attack {
                    damage_type: capture(&caps, 4),
                    ..dice_attack(&caps)
                })
            }),
            Self::Parenthetical => PARENTHETICAL_RE
                .captures_iter(text)
                .for_each(|caps| push(dice_attack(&caps))),
            Self::Generic => GENERIC_RE
                .captures_iter(text)
                .for_each(|caps| push(dice_attack(&caps))),
            Self::WeaponKeyword => WEAPON_KEYWORD_RE
                .captures_iter(text)
                .for_each(|caps| push(Attack::named(capitalize(&caps[1])))),
        }
        attacks
    }
}

fn capture(caps: &Captures<'_>, index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Shared shape of the dice-bearing formats: 1 = name, 2 = bonus, 3 = dice.
fn dice_attack(caps: &Captures<'_>) -> Attack {
    Attack {
        name: caps[1].trim().to_string(),
        bonus: caps[2].trim_start_matches('+').parse().ok(),
        damage: capture(caps, 3).map(|dice| dice.chars().filter(|c| !c.is_whitespace()).collect()),
        damage_type: None,
        description: None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Run the cascade: the first format that yields anything wins. Capped at [MAX_ATTACKS].
pub fn extract_attacks(text: &str) -> (Option<AttackFormat>, Vec<Attack>) {
    for format in AttackFormat::CASCADE {
        let mut attacks = format.extract(text);
        if !attacks.is_empty() {
            attacks.truncate(MAX_ATTACKS);
            return (Some(format), attacks);
        }
    }
    (None, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_5e_attack_keeps_dice_and_damage_type() {
        let text = "Scimitar. Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage.\n\
                    Shortbow. Ranged Weapon Attack: +4 to hit, range 80/320 ft., one target. Hit: 5 (1d6 + 2) piercing damage.";
        let (format, attacks) = extract_attacks(text);
        assert_eq!(format, Some(AttackFormat::Standard5e));
        assert_eq!(attacks.len(), 2);
        assert_eq!(attacks[0].name, "Scimitar");
        assert_eq!(attacks[0].bonus, Some(4));
        assert_eq!(attacks[0].damage.as_deref(), Some("1d6+2"));
        assert_eq!(attacks[0].damage_type.as_deref(), Some("slashing"));
        assert_eq!(attacks[1].name, "Shortbow");
        assert_eq!(attacks[1].damage_type.as_deref(), Some("piercing"));
    }

    #[test]
    fn simplified_attack_line() {
        let (format, attacks) = extract_attacks("Melee Attack: Scimitar +4 to hit, 1d6+2 slashing damage");
        assert_eq!(format, Some(AttackFormat::Simplified));
        assert_eq!(attacks[0].name, "Scimitar");
        assert_eq!(attacks[0].bonus, Some(4));
        assert_eq!(attacks[0].damage.as_deref(), Some("1d6+2"));
        assert_eq!(attacks[0].damage_type.as_deref(), Some("slashing"));
    }

    #[test]
    fn parenthetical_bonus_format() {
        let (format, attacks) = extract_attacks("Bite (+3): 1d6\nClaw (-1): 1d4 + 1");
        assert_eq!(format, Some(AttackFormat::Parenthetical));
        assert_eq!(attacks.len(), 2);
        assert_eq!(attacks[0].bonus, Some(3));
        assert_eq!(attacks[1].bonus, Some(-1));
        assert_eq!(attacks[1].damage.as_deref(), Some("1d4+1"));
    }

    #[test]
    fn keyword_scan_dedupes_and_capitalizes() {
        let (format, attacks) = extract_attacks("It bites with its bite, then a claw, then another CLAW.");
        assert_eq!(format, Some(AttackFormat::WeaponKeyword));
        let names: Vec<&str> = attacks.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Bite", "Claw"]);
        assert!(attacks.iter().all(|a| a.bonus.is_none() && a.damage.is_none()));
    }

    #[test]
    fn cascade_caps_attack_count() {
        let text = "sword dagger mace spear axe hammer javelin";
        let (_, attacks) = extract_attacks(text);
        assert_eq!(attacks.len(), MAX_ATTACKS);
    }

    #[test]
    fn nothing_recognizable_yields_no_format() {
        assert_eq!(extract_attacks("A quiet pond."), (None, Vec::new()));
    }
}
