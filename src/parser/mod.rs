//! Best-effort stat-block parser. Free text in, [ParsedCreatureData] out, with a confidence
//! score and one warning per field that could not be read. Never fails on malformed text.

pub mod attacks;
pub mod fields;

use serde::Serialize;
use tracing::debug;

use crate::data::creature::{ParsedCreatureData, SourceSystem};

pub use attacks::{extract_attacks, AttackFormat};
pub use fields::UNKNOWN_NAME;

pub const DEFAULT_MOVEMENT: &str = "30 ft";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    /// Advisory only: `confidence > 0.3`.
    pub success: bool,
    pub data: ParsedCreatureData,
    pub confidence: f64,
    pub warnings: Vec<String>,
    /// Which attack layout matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_format: Option<AttackFormat>,
}

pub fn parse_stat_block(text: &str, system_hint: Option<SourceSystem>) -> ParseResult {
    let mut data = ParsedCreatureData {
        system: system_hint,
        ..ParsedCreatureData::default()
    };
    let mut warnings = Vec::new();

    let Some(first_line) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return ParseResult {
            success: false,
            data,
            confidence: 0.0,
            warnings: vec!["Empty text provided".to_string()],
            attack_format: None,
        };
    };

    data.name = Some(fields::extract_name(first_line));

    data.ac = fields::extract_ac(text);
    if data.ac.is_none() {
        warnings.push("Could not extract AC".to_string());
    }

    data.hp = fields::extract_hp(text);
    if data.hp.is_none() {
        warnings.push("Could not extract HP".to_string());
    }

    data.movement = match fields::extract_movement(text) {
        Some(movement) => Some(movement),
        None => {
            warnings.push("Could not extract movement, using default".to_string());
            Some(DEFAULT_MOVEMENT.to_string())
        }
    };

    let (attack_format, attacks) = extract_attacks(text);
    if attacks.is_empty() {
        warnings.push("Could not extract attacks".to_string());
    }
    data.attacks = attacks;

    data.cr = fields::extract_cr(text);
    data.level = fields::extract_level(text, data.cr.as_deref());
    data.special_actions = fields::extract_special_actions(text);
    data.saves = fields::extract_saves(text);

    let confidence = confidence(&data);
    debug!(
        name = data.name.as_deref().unwrap_or_default(),
        confidence,
        warnings = warnings.len(),
        ?attack_format,
        "parsed stat block"
    );

    ParseResult {
        success: confidence > 0.3,
        data,
        confidence,
        warnings,
        attack_format,
    }
}

const MAX_SCORE: f64 = 6.0;

/// Weighted field coverage in 0..=1.
pub fn confidence(data: &ParsedCreatureData) -> f64 {
    let signals = [
        (data.name.as_deref().is_some_and(|name| name != UNKNOWN_NAME), 1.0),
        (data.ac.is_some(), 1.0),
        (data.hp.is_some(), 1.0),
        (data.movement.as_deref().is_some_and(|m| !m.is_empty()), 0.5),
        (!data.attacks.is_empty(), 1.0),
        (data.cr.is_some() || data.level.is_some(), 0.5),
        (!data.special_actions.is_empty(), 0.5),
        (data.saves.is_some(), 0.5),
    ];
    let score: f64 = signals
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, weight)| weight)
        .sum();
    (score / MAX_SCORE).clamp(0.0, 1.0)
}
