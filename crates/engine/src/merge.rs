//! Registry merge: first registry to claim a prefix keeps it.
//!
//! Registries must be fed in a fixed order (sorted by name) so that
//! precedence between overlapping assignments is deterministic. Every row is
//! counted; a registry that comes back shorter than its floor aborts the run.

use std::collections::BTreeMap;

use crate::entities::decode_html_entities;
use crate::error::EngineError;
use crate::model::{MergedEntry, RegistryRecord, RegistryStats, RowOutcome, PRIVATE};
use crate::normalize::{alpha_tokens, sanitize, shorten};

/// Parse one registry export.
///
/// Columns: registry type, prefix assignment, organization name,
/// organization address. The header row is discarded. A missing address
/// column reads as empty; fewer than three columns is an error.
pub fn parse_registry_csv(registry: &str, body: &str) -> Result<Vec<RegistryRecord>, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| EngineError::RegistryParse {
            registry: registry.to_string(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        if row.len() < 3 {
            return Err(EngineError::RegistryParse {
                registry: registry.to_string(),
                line,
                message: format!("expected at least 3 columns, found {}", row.len()),
            });
        }

        records.push(RegistryRecord {
            line,
            registry_type: row[0].to_string(),
            prefix: row[1].to_uppercase(),
            raw_name: row[2].to_string(),
            raw_address: row.get(3).unwrap_or("").to_string(),
        });
    }

    Ok(records)
}

/// Result of merging every registry.
#[derive(Debug, Default)]
pub struct MergeResult {
    /// Keyed and therefore ordered by prefix.
    pub entries: BTreeMap<String, MergedEntry>,
    /// In processing order.
    pub stats: Vec<RegistryStats>,
}

impl MergeResult {
    pub fn total_assessed(&self) -> usize {
        self.stats.iter().map(|s| s.total).sum()
    }

    pub fn total_added(&self) -> usize {
        self.stats.iter().map(|s| s.added).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.stats.iter().map(|s| s.skipped).sum()
    }
}

#[derive(Debug, Default)]
pub struct Merger {
    result: MergeResult,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &BTreeMap<String, MergedEntry> {
        &self.result.entries
    }

    /// Classify one row and add it if nothing claimed its prefix yet.
    pub fn assess(&mut self, registry: &str, record: &RegistryRecord) -> Result<RowOutcome, EngineError> {
        let prefix = &record.prefix;
        let name = decode_html_entities(record.raw_name.trim());

        if let Some(kept) = self.result.entries.get(prefix) {
            let tokens = alpha_tokens(&name);
            if tokens == alpha_tokens(&kept.raw_name) || tokens == alpha_tokens(&kept.name) {
                tracing::debug!(registry, %prefix, "skipping duplicate \"{}\" in favor of \"{}\"", name, kept.name);
                return Ok(RowOutcome::SkippedDuplicate { kept: kept.name.clone() });
            }
            tracing::info!(registry, %prefix, "skipping \"{}\" in favor of \"{}\"", name, kept.name);
            return Ok(RowOutcome::SkippedConflict { kept: kept.name.clone() });
        }

        if name == PRIVATE {
            tracing::debug!(registry, %prefix, "skipping private assignment");
            return Ok(RowOutcome::SkippedPrivate);
        }

        let short = shorten(&name)?;
        let address = sanitize(&decode_html_entities(record.raw_address.trim()));

        self.result.entries.insert(
            prefix.clone(),
            MergedEntry {
                prefix: prefix.clone(),
                name: short,
                address,
                raw_name: name,
                registry: registry.to_string(),
            },
        );

        Ok(RowOutcome::Added)
    }

    /// Merge every row of one registry, then enforce its row floor.
    ///
    /// `stats` arrives seeded with the registry name, its floor and any
    /// response metadata; counters are filled in here.
    pub fn merge_registry(
        &mut self,
        mut stats: RegistryStats,
        records: &[RegistryRecord],
    ) -> Result<&RegistryStats, EngineError> {
        for record in records {
            let outcome = self.assess(&stats.name, record)?;
            stats.record(&outcome);
        }

        if stats.total < stats.min_entries {
            return Err(EngineError::TooFewEntries {
                registry: stats.name.clone(),
                got: stats.total,
                wanted: stats.min_entries,
            });
        }

        tracing::info!(
            registry = %stats.name,
            added = stats.added,
            skipped = stats.skipped,
            total = stats.total,
            "merged registry"
        );

        let idx = self.result.stats.len();
        self.result.stats.push(stats);
        Ok(&self.result.stats[idx])
    }

    /// Enforce the global floor and hand back the merged table.
    pub fn finish(self, min_total: usize) -> Result<MergeResult, EngineError> {
        let total = self.result.total_assessed();
        if total < min_total {
            return Err(EngineError::TooFewTotal { got: total, wanted: min_total });
        }
        Ok(self.result)
    }
}
