//! Batch conversion: many stat blocks in one document, processed in parallel.
//!
//! Blocks are separated by lines consisting only of `---`. Each block goes through the same
//! parse → convert → validate pipeline as a single creature; results come back in input order.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::conversion::bands::{validate_bands, BandValidationReport};
use crate::conversion::engine::convert_with_registry;
use crate::conversion::settings::ConversionSettings;
use crate::data::creature::{OutputCreatureData, SourceSystem};
use crate::data::registry::ProfileRegistry;
use crate::parallel::pool::WorkerPool;
use crate::parser::parse_stat_block;

pub const BLOCK_SEPARATOR: &str = "---";

#[derive(Debug, Error)]
pub enum BatchInputError {
    #[error("failed to read batch input {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("batch input {path} contains no stat blocks")]
    Empty { path: PathBuf },
}

/// One processed block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    /// Position of the block in the input, starting at 0.
    pub index: usize,
    pub confidence: f64,
    pub warnings: Vec<String>,
    pub output: OutputCreatureData,
    pub validation: BandValidationReport,
}

/// Split a document into stat blocks. Blank blocks are dropped; block text is trimmed.
pub fn split_batch_text(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim() == BLOCK_SEPARATOR {
            blocks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    blocks.push(current.join("\n"));
    blocks
        .into_iter()
        .map(|block| block.trim().to_string())
        .filter(|block| !block.is_empty())
        .collect()
}

/// Read and split a batch file. A file with no blocks is an error.
pub fn read_batch_file(path: &Path) -> Result<Vec<String>, BatchInputError> {
    let text = fs::read_to_string(path).map_err(|source| BatchInputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let blocks = split_batch_text(&text);
    if blocks.is_empty() {
        return Err(BatchInputError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(blocks)
}

pub fn process_block(
    index: usize,
    text: &str,
    system: Option<SourceSystem>,
    settings: &ConversionSettings,
    registry: &ProfileRegistry,
) -> BatchItem {
    let parsed = parse_stat_block(text, system);
    let output = convert_with_registry(&parsed.data, settings, registry);
    let profile_id = output
        .tuning
        .as_ref()
        .map(|tuning| tuning.profile_id.as_str())
        .unwrap_or_default();
    let validation = validate_bands(&output, registry.resolve(profile_id));
    BatchItem {
        index,
        confidence: parsed.confidence,
        warnings: parsed.warnings,
        output,
        validation,
    }
}

/// Parse, convert and validate every block on `pool`. Output order matches input order and is
/// identical to processing the blocks one by one.
pub fn run_batch(
    blocks: &[String],
    system: Option<SourceSystem>,
    settings: &ConversionSettings,
    registry: &ProfileRegistry,
    pool: &WorkerPool,
) -> Vec<BatchItem> {
    let items: Vec<BatchItem> = pool.install(|| {
        blocks
            .par_iter()
            .enumerate()
            .map(|(index, block)| process_block(index, block, system, settings, registry))
            .collect()
    });
    let balanced = items.iter().filter(|item| item.validation.balanced).count();
    info!(blocks = items.len(), balanced, "batch converted");
    items
}
