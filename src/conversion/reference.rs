//! Compare a converted card with a reference stat block the user pasted from their own book.
//! The reference is parsed with the same stat-block parser; nothing is stored or embedded.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::conversion::engine::resolve_threat_tier;
use crate::data::creature::OutputCreatureData;
use crate::parser::{fields, parse_stat_block};

/// Numeric fields match within this fraction of the reference value.
pub const NUMERIC_TOLERANCE: f64 = 0.15;

static MORALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bMorale\s*[:=]?\s*(\d+)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMatchStatus {
    Match,
    Mismatch,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub status: FieldMatchStatus,
    pub converted: Value,
    pub reference: Value,
    /// Reference value offered as a replacement when the fields disagree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceReport {
    pub accuracy_score: u8,
    pub diffs: Vec<FieldDiff>,
    pub summary: String,
    pub has_reference: bool,
}

/// Fields pulled out of the reference text.
#[derive(Debug, Clone, Default)]
struct ReferenceFields {
    name: Option<String>,
    ac: Option<u32>,
    hp: Option<u32>,
    morale: Option<u32>,
    threat_tier: Option<u8>,
    movement: Option<String>,
    saves: Option<String>,
    attack_count: usize,
}

fn parse_reference(text: &str) -> ReferenceFields {
    let parsed = parse_stat_block(text, None).data;
    // Tier only when the reference states a level or CR; HP-only inference would always "agree".
    let threat_tier = (parsed.level.is_some() || parsed.cr.is_some())
        .then(|| resolve_threat_tier(&parsed, None).0.get());
    ReferenceFields {
        name: parsed.name,
        ac: parsed.ac,
        hp: parsed.hp,
        morale: MORALE_RE
            .captures(text)
            .and_then(|caps| caps[1].parse().ok()),
        threat_tier,
        // The parser substitutes a default movement; only a stated one is comparable.
        movement: fields::extract_movement(text),
        saves: parsed.saves,
        attack_count: parsed.attacks.len(),
    }
}

fn numeric_matches(converted: f64, reference: f64) -> bool {
    if reference == 0.0 {
        return converted == 0.0;
    }
    (converted - reference).abs() / reference.abs() <= NUMERIC_TOLERANCE
}

fn diff(field: &str, matched: bool, converted: Value, reference: Value) -> FieldDiff {
    FieldDiff {
        field: field.to_string(),
        status: if matched {
            FieldMatchStatus::Match
        } else {
            FieldMatchStatus::Mismatch
        },
        suggested: (!matched).then(|| reference.clone()),
        converted,
        reference,
    }
}

fn string_diff(field: &str, converted: &str, reference: &str) -> FieldDiff {
    if converted.trim().is_empty() {
        return FieldDiff {
            field: field.to_string(),
            status: FieldMatchStatus::Missing,
            converted: Value::Null,
            reference: json!(reference),
            suggested: Some(json!(reference)),
        };
    }
    let matched = converted.trim().to_lowercase() == reference.trim().to_lowercase();
    diff(field, matched, json!(converted), json!(reference))
}

/// Field-by-field comparison. No (or blank) reference text scores 0 with `has_reference = false`;
/// a reference with nothing comparable scores 100.
pub fn compare_with_reference(output: &OutputCreatureData, reference_text: Option<&str>) -> ReferenceReport {
    let Some(text) = reference_text.filter(|text| !text.trim().is_empty()) else {
        return ReferenceReport {
            accuracy_score: 0,
            diffs: Vec::new(),
            summary: "No reference provided. Paste the target stat block to verify accuracy."
                .to_string(),
            has_reference: false,
        };
    };
    let reference = parse_reference(text);
    let mut diffs = Vec::new();

    let numeric = [
        ("ac", f64::from(output.ac), reference.ac),
        ("hp", f64::from(output.hp), reference.hp),
        ("morale", f64::from(output.morale), reference.morale),
        (
            "threat_tier",
            f64::from(output.threat_tier.get()),
            reference.threat_tier.map(u32::from),
        ),
    ];
    for (field, converted, reference) in numeric {
        if let Some(reference) = reference {
            let reference = f64::from(reference);
            diffs.push(diff(
                field,
                numeric_matches(converted, reference),
                json!(converted),
                json!(reference),
            ));
        }
    }

    let strings = [
        ("name", output.name.as_str(), reference.name.as_deref()),
        ("movement", output.movement.as_str(), reference.movement.as_deref()),
        ("saves", output.saves.as_str(), reference.saves.as_deref()),
    ];
    for (field, converted, reference) in strings {
        if let Some(reference) = reference.filter(|r| !r.trim().is_empty()) {
            diffs.push(string_diff(field, converted, reference));
        }
    }

    if reference.attack_count > 0 {
        let converted = output.attacks.len();
        diffs.push(FieldDiff {
            field: "attacks (count)".to_string(),
            status: if converted == reference.attack_count {
                FieldMatchStatus::Match
            } else {
                FieldMatchStatus::Mismatch
            },
            converted: json!(converted),
            reference: json!(reference.attack_count),
            suggested: None,
        });
    }

    let matched = diffs
        .iter()
        .filter(|d| d.status == FieldMatchStatus::Match)
        .count();
    let accuracy_score = if diffs.is_empty() {
        100
    } else {
        (100.0 * matched as f64 / diffs.len() as f64 + 0.5).floor() as u8
    };

    let differing: Vec<&str> = diffs
        .iter()
        .filter(|d| d.status != FieldMatchStatus::Match)
        .map(|d| d.field.as_str())
        .collect();
    let summary = if differing.is_empty() {
        format!("All checked fields match the reference. Accuracy: {accuracy_score}%.")
    } else {
        format!(
            "{} field(s) differ from reference: {}. Accuracy: {accuracy_score}%.",
            differing.len(),
            differing.join(", ")
        )
    };

    ReferenceReport {
        accuracy_score,
        diffs,
        summary,
        has_reference: true,
    }
}
