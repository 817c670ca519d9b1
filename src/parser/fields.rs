//! Single-field extractors. Each returns `None` when nothing acceptable is found; the caller
//! decides what a missing field means.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::data::creature::SpecialAction;

pub const UNKNOWN_NAME: &str = "Unknown Creature";
pub const MAX_SPECIAL_ACTIONS: usize = 5;
const MAX_ACTION_NAME_LEN: usize = 50;
const MAX_SAVES_LEN: usize = 100;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^#+\s*"));
static TRAILING_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s*\([^)]+\)\s*$"));
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\*+|\*+$"));

static AC_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        compile(r"(?i)\bAC\s*[:=]?\s*(\d+)"),
        compile(r"(?i)Armor\s*Class\s*[:=]?\s*(\d+)"),
        compile(r"(?i)\bAC\s+(\d+)"),
        compile(r"(?i)Defense\s*[:=]?\s*(\d+)"),
    ]
});

static HP_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        compile(r"(?i)\bHP\s*[:=]?\s*(\d+)"),
        compile(r"(?i)Hit\s*Points?\s*[:=]?\s*(\d+)"),
        compile(r"(?i)(\d+)\s*(?:hit\s*points?|hp)\b"),
        compile(r"(?i)\bHD\s*[:=]?\s*(\d+)d"),
    ]
});

static ANY_DICE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)d(\d+)"));

// `[\w \t,.]` keeps each match on one line; greedy so extra modes ("fly 60 ft.") are kept.
static MOVEMENT_PATTERNS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        compile(r"(?i)Speed\s*[:=]?\s*([\w \t,.]+(?:ft\.?|feet|'))"),
        compile(r"(?i)Movement\s*[:=]?\s*([\w \t,.]+(?:ft\.?|feet|'))"),
        compile(r"(?i)\bMove\s*[:=]?\s*(\d+(?:[ \t]*(?:ft\.?|feet|'))?)"),
        compile(r"(?i)(\d+)[ \t]*(?:ft\.?|feet|')[ \t]*(?:speed|move|movement)"),
        compile(r"(?i)\bMV\s*[:=]?\s*(\d+'(?:[ \t]*\(\d+'\))?)"),
    ]
});

static CR_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        compile(r"(?i)\bCR\s*[:=]?\s*(\d+(?:/\d+)?)"),
        compile(r"(?i)Challenge\s*(?:Rating)?\s*[:=]?\s*(\d+(?:/\d+)?)"),
        compile(r"(?i)\bLevel\s*[:=]?\s*(\d+)"),
    ]
});

static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bLevel\s*[:=]?\s*(\d+)"));
static HIT_DICE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)(\d+)\s*HD\b"));

/// `**Name** (Recharge 5-6). Description`; indented lines continue the description.
static BOLD_ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\*{2,3}([^*\n]+)\*{2,3}[ \t]*(?:\(([^)]+)\))?[ \t]*[.:]?[ \t]*([^*\n]+(?:\n[ \t]+[^*\s][^\n]*)*)")
});

/// `Name (Recharge 6): Description` or `Name. Description` on one line.
static LINE_ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*)(?:[ \t]*\(([^)]+)\)[ \t]*[.:]?|[ \t]*[.:])[ \t]+(.+)$")
});

static RECHARGE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)Recharge\s*(\d+[-–]\d+|\d+)"));

static SAVES_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        compile(r"(?i)Saving\s*Throws?\s*[:=]?\s*([A-Za-z \t+,\d-]+)"),
        compile(r"(?i)\bSaves?\s*[:=]?\s*([A-Za-z \t+,\d-]+)"),
    ]
});

/// Section headers and stat labels that look like action names but are not.
const SECTION_HEADERS: &[&str] = &[
    "actions",
    "reactions",
    "traits",
    "legendary actions",
    "lair actions",
    "armor class",
    "hit points",
    "hit dice",
    "speed",
    "challenge",
    "abilities",
    "str",
    "dex",
    "con",
    "int",
    "wis",
    "cha",
    "description",
    "saving throws",
    "skills",
    "senses",
    "languages",
    "damage resistances",
    "damage immunities",
    "damage vulnerabilities",
    "condition immunities",
    "alignment",
    "treasure",
    "number appearing",
    "attacks",
    "attack",
    "damage",
    "hit",
    "move",
    "movement",
    "saves",
    "save",
    "morale",
    "level",
    "defense",
];

/// First-pattern-wins numeric lookup: each pattern contributes its first match only, and a value
/// outside `accept` moves on to the next pattern.
fn first_number(patterns: &[Regex], text: &str, accept: impl Fn(u32) -> bool) -> Option<u32> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .filter(|value| accept(*value))
    })
}

pub fn extract_name(first_line: &str) -> String {
    let name = HEADING_RE.replace(first_line, "");
    let name = TRAILING_PAREN_RE.replace(&name, "");
    let name = EMPHASIS_RE.replace_all(&name, "");
    let name = name.trim();
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name.to_string()
    }
}

pub fn extract_ac(text: &str) -> Option<u32> {
    first_number(AC_PATTERNS.as_slice(), text, |ac| ac <= 30)
}

/// Labelled HP in 1..=1000, else the expected value of the first `NdM` anywhere in the text.
pub fn extract_hp(text: &str) -> Option<u32> {
    if let Some(hp) = first_number(HP_PATTERNS.as_slice(), text, |hp| (1..=1000).contains(&hp)) {
        return Some(hp);
    }
    let caps = ANY_DICE_RE.captures(text)?;
    let dice: u64 = caps[1].parse().ok()?;
    let sides: u64 = caps[2].parse().ok()?;
    u32::try_from(dice.saturating_mul(sides + 1) / 2).ok()
}

pub fn extract_movement(text: &str) -> Option<String> {
    MOVEMENT_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let movement = caps[1].trim();
        if movement.is_empty() {
            return None;
        }
        if movement.chars().all(|c| c.is_ascii_digit()) {
            Some(format!("{movement} ft"))
        } else {
            Some(movement.to_string())
        }
    })
}

/// Challenge rating as written, so fractions survive.
pub fn extract_cr(text: &str) -> Option<String> {
    CR_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text).map(|caps| caps[1].to_string()))
}

/// Level from CR when present (fractions up to 1/4 are level 0, anything else under 1 is level 1),
/// then an explicit "Level N", then "N HD".
pub fn extract_level(text: &str, cr: Option<&str>) -> Option<u32> {
    if let Some(cr) = cr {
        if let Some((num, denom)) = cr.split_once('/') {
            let num: f64 = num.trim().parse().unwrap_or(0.0);
            let denom: f64 = denom.trim().parse().unwrap_or(0.0);
            if denom > 0.0 && num / denom <= 0.25 {
                return Some(0);
            }
            return Some(1);
        }
        return cr.trim().parse().ok();
    }
    if let Some(caps) = LEVEL_RE.captures(text) {
        return caps[1].parse().ok();
    }
    HIT_DICE_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

fn is_section_header(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SECTION_HEADERS.contains(&lowered.as_str())
}

/// `"Fire Breath (Recharge 5-6)"` → `("Fire Breath", Some("Recharge 5-6"))`.
fn split_parenthetical(name: &str) -> (&str, Option<&str>) {
    match (name.strip_suffix(')'), name.rfind('(')) {
        (Some(inner), Some(open)) if open > 0 => (name[..open].trim_end(), Some(inner[open + 1..].trim())),
        _ => (name, None),
    }
}

fn recharge_of(parenthetical: Option<&str>, description: &str) -> Option<String> {
    parenthetical
        .and_then(|p| RECHARGE_RE.captures(p))
        .or_else(|| RECHARGE_RE.captures(description))
        .map(|caps| format!("Recharge {}", &caps[1]))
}

pub fn extract_special_actions(text: &str) -> Vec<SpecialAction> {
    let mut seen = HashSet::new();
    let mut actions = Vec::new();

    for pattern in [&*BOLD_ACTION_RE, &*LINE_ACTION_RE] {
        for caps in pattern.captures_iter(text) {
            let (name, inline_parenthetical) =
                split_parenthetical(caps[1].trim().trim_end_matches(['.', ':']).trim());
            let parenthetical = caps.get(2).map(|m| m.as_str().trim()).or(inline_parenthetical);
            let description = caps.get(3).map_or("", |m| m.as_str().trim());

            if name.is_empty() || name.chars().count() > MAX_ACTION_NAME_LEN {
                continue;
            }
            if is_section_header(name) || description.to_lowercase().contains("to hit") {
                continue;
            }
            if !seen.insert(name.to_lowercase()) {
                continue;
            }
            actions.push(SpecialAction {
                name: name.to_string(),
                description: description.to_string(),
                recharge: recharge_of(parenthetical, description),
            });
        }
    }

    actions.truncate(MAX_SPECIAL_ACTIONS);
    actions
}

pub fn extract_saves(text: &str) -> Option<String> {
    SAVES_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let saves: String = caps[1].trim().chars().take(MAX_SAVES_LEN).collect();
        let saves = saves.trim_end().to_string();
        (!saves.is_empty()).then_some(saves)
    })
}
