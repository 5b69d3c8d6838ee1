/// Organization name the registries use when the assignee is undisclosed.
pub const PRIVATE: &str = "Private";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One data row of a registry CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRecord {
    pub line: u64,
    pub registry_type: String,
    pub prefix: String,
    pub raw_name: String,
    pub raw_address: String,
}

// ---------------------------------------------------------------------------
// Merge state
// ---------------------------------------------------------------------------

/// The entry that claimed a prefix first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEntry {
    pub prefix: String,
    /// Normalized (shortened) manufacturer name.
    pub name: String,
    /// Sanitized address.
    pub address: String,
    /// Trimmed, entity-decoded organization name as published.
    pub raw_name: String,
    /// Registry that contributed the entry.
    pub registry: String,
}

/// What happened to a single registry row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Added,
    SkippedPrivate,
    /// Prefix already claimed under a name with the same alphabetic tokens.
    SkippedDuplicate { kept: String },
    /// Prefix already claimed by a different organization.
    SkippedConflict { kept: String },
}

impl RowOutcome {
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::Added)
    }
}

/// Per-registry counters, returned by the merge step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub name: String,
    pub added: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub conflicts: usize,
    pub private: usize,
    /// Every row assessed, added or not.
    pub total: usize,
    pub min_entries: usize,
    pub last_modified: Option<String>,
    pub content_length: Option<u64>,
}

impl RegistryStats {
    pub fn new(name: &str, min_entries: usize) -> Self {
        Self {
            name: name.to_string(),
            min_entries,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Added => self.added += 1,
            RowOutcome::SkippedPrivate => self.private += 1,
            RowOutcome::SkippedDuplicate { .. } => self.duplicates += 1,
            RowOutcome::SkippedConflict { .. } => self.conflicts += 1,
        }
        if outcome.is_skip() {
            self.skipped += 1;
        }
        self.total += 1;
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Which rule field the prefix table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableValue {
    #[default]
    Display,
    Canonical,
}

/// One line of the prefix table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub prefix: String,
    pub value: String,
}
