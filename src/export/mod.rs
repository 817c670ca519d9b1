//! Export formats for a finished card: JSON with provenance, plain text, and a CSV batch report.
//! Everything is rendered from [OutputCreatureData] alone; nothing is recomputed.

pub mod csv;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::data::creature::OutputCreatureData;
use crate::data::packs::{get_pack, DISCLAIMER};

pub use self::csv::{write_batch_csv, BatchCsvRow};

/// The card as JSON with `_provenance` (pack, license, disclaimer, timestamp) and `_meta`
/// (profile, tier, role, tuning) blocks added at the top level.
pub fn json_export(
    output: &OutputCreatureData,
    generated_at: DateTime<Utc>,
) -> Result<Value, serde_json::Error> {
    let pack = get_pack(output.output_pack_id);
    let tuning = output.tuning.as_ref();

    let mut payload = serde_json::to_value(output)?;
    if let Value::Object(fields) = &mut payload {
        fields.insert(
            "_provenance".to_string(),
            json!({
                "pack_id": pack.id,
                "pack_name": pack.display_name,
                "license_type": pack.license.license_type,
                "attribution": pack.license.attribution_text,
                "disclaimer": DISCLAIMER,
                "generated_at": generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            }),
        );
        fields.insert(
            "_meta".to_string(),
            json!({
                "conversion_profile_id": tuning.map(|t| t.profile_id.as_str()),
                "tier": output.threat_tier,
                "role": tuning.map(|t| t.role),
                "tuning": tuning,
            }),
        );
    }
    Ok(payload)
}

/// Plain-text stat card. The morale line only appears for profiles that show morale.
pub fn render_text_card(output: &OutputCreatureData) -> String {
    let mut lines = vec![
        output.name.to_uppercase(),
        format!("AC {} | HP {} | Move {}", output.ac, output.hp, output.movement),
    ];
    if output.show_morale {
        lines.push(format!("Morale {} | Threat Tier {}", output.morale, output.threat_tier));
    } else {
        lines.push(format!("Threat Tier {}", output.threat_tier));
    }

    lines.push(String::new());
    lines.push("ATTACKS:".to_string());
    for attack in &output.attacks {
        let mut line = format!("- {}", attack.name);
        if let Some(bonus) = attack.bonus {
            line.push_str(&format!(" {bonus:+}"));
        }
        match (&attack.damage, &attack.damage_type) {
            (Some(damage), Some(kind)) => line.push_str(&format!(" ({damage} {kind})")),
            (Some(damage), None) => line.push_str(&format!(" ({damage})")),
            _ => {}
        }
        lines.push(line);
    }

    if !output.saves.is_empty() {
        lines.push(String::new());
        lines.push(format!("SAVES: {}", output.saves));
    }

    if !output.traits.is_empty() {
        lines.push(String::new());
        lines.push("TRAITS:".to_string());
        lines.extend(output.traits.iter().map(|t| format!("- {t}")));
    }

    if !output.special_actions.is_empty() {
        lines.push(String::new());
        lines.push("SPECIAL ACTIONS:".to_string());
        for action in &output.special_actions {
            match &action.recharge {
                Some(recharge) => lines.push(format!("- {} ({recharge})", action.name)),
                None => lines.push(format!("- {}", action.name)),
            }
            if !action.description.is_empty() {
                lines.push(format!("  {}", action.description));
            }
        }
    }

    if !output.loot_notes.is_empty() {
        lines.push(String::new());
        lines.push(format!("LOOT: {}", output.loot_notes));
    }

    lines.join("\n")
}
