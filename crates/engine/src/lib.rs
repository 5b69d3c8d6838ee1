//! `ouimap-engine`: OUI table engine.
//!
//! Pure engine crate: receives rule text and registry CSV bodies, returns the
//! merged prefix table and the rendered outputs. No network or filesystem
//! access.

pub mod entities;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod output;
pub mod rules;

pub use error::EngineError;
pub use merge::{parse_registry_csv, MergeResult, Merger};
pub use model::{MergedEntry, OutputRow, RegistryRecord, RegistryStats, RowOutcome, TableValue, PRIVATE};
pub use normalize::{sanitize, shorten};
pub use rules::{OverrideRule, RuleSet};
