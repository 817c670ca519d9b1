//! CSV band report for a batch: one row per converted creature.

use std::io::Write;

use serde::Serialize;

use crate::conversion::bands::{calc_dpr, BandStatus};
use crate::data::profile::{round_half_up, round_tenth};
use crate::parallel::batch::BatchItem;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchCsvRow {
    pub index: usize,
    pub name: String,
    pub profile_id: String,
    pub role: String,
    pub threat_tier: u8,
    pub ac: u32,
    pub hp: u32,
    pub attack_bonus: i32,
    pub dpr: f64,
    pub band_score: u8,
    pub balanced: bool,
    /// Out-of-band fields separated by `;`.
    pub out_of_band: String,
    /// Hundredths.
    pub parse_confidence: f64,
}

impl From<&BatchItem> for BatchCsvRow {
    fn from(item: &BatchItem) -> Self {
        let output = &item.output;
        let tuning = output.tuning.as_ref();
        Self {
            index: item.index,
            name: output.name.clone(),
            profile_id: tuning.map(|t| t.profile_id.clone()).unwrap_or_default(),
            role: tuning.map(|t| t.role.to_string()).unwrap_or_default(),
            threat_tier: output.threat_tier.get(),
            ac: output.ac,
            hp: output.hp,
            attack_bonus: output.attacks.first().and_then(|a| a.bonus).unwrap_or(0),
            dpr: round_tenth(calc_dpr(&output.attacks)),
            band_score: item.validation.score,
            balanced: item.validation.balanced,
            out_of_band: item
                .validation
                .results
                .iter()
                .filter(|r| r.status != BandStatus::Pass)
                .map(|r| r.field.label())
                .collect::<Vec<_>>()
                .join(";"),
            parse_confidence: round_half_up(item.confidence * 100.0) / 100.0,
        }
    }
}

/// Write a header and one row per item.
pub fn write_batch_csv<W: Write>(writer: W, items: &[BatchItem]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for item in items {
        csv_writer.serialize(BatchCsvRow::from(item))?;
    }
    csv_writer.flush()?;
    Ok(())
}
