//! `ouimap build`: fetch, merge, match, write.

use std::fs;
use std::path::Path;
use std::time::Duration;

use ouimap_config::{BuildConfig, TableValueSetting};
use ouimap_engine::output::{build_prefix_table, render_canonical_map, render_prefix_table};
use ouimap_engine::{parse_registry_csv, Merger, RegistryStats, RuleSet, TableValue};

use crate::fetch::RegistryClient;
use crate::{report, write, CliError};

pub fn load_rules(path: &Path) -> Result<RuleSet, CliError> {
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::fatal(format!("cannot read rules file {}: {}", path.display(), e))
            .with_hint("pass --rules <FILE> or set `rules` in the config file")
    })?;
    let rules = RuleSet::from_csv(&text).map_err(|e| {
        let mut err = CliError::engine(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })?;
    tracing::info!(path = %path.display(), rules = rules.len(), "loaded override rules");
    Ok(rules)
}

fn table_value(setting: TableValueSetting) -> TableValue {
    match setting {
        TableValueSetting::Display => TableValue::Display,
        TableValueSetting::Canonical => TableValue::Canonical,
    }
}

/// Run a full build and return the report text.
///
/// Nothing is written unless every registry was fetched, merged and passed
/// its floor, and the global floor held.
pub fn run(config: &BuildConfig) -> Result<String, CliError> {
    let rules = load_rules(&config.rules)?;
    let client = RegistryClient::with_timeout(
        &config.base_url,
        config.fetch_timeout_secs.map(Duration::from_secs),
    )?;

    let mut merger = Merger::new();
    for registry in config.registries_in_processing_order() {
        let fetched = client.fetch(&registry.path)?;
        tracing::info!(registry = %registry.name, url = %fetched.url, "merging registry");

        let records = parse_registry_csv(&registry.name, &fetched.text).map_err(CliError::engine)?;

        let mut stats = RegistryStats::new(&registry.name, registry.min_entries);
        stats.last_modified = fetched.last_modified;
        stats.content_length = fetched.content_length;
        merger.merge_registry(stats, &records).map_err(CliError::engine)?;
    }
    let result = merger.finish(config.min_total).map_err(CliError::engine)?;

    let rows = build_prefix_table(&result.entries, &rules, table_value(config.output.table_value));
    let table = render_prefix_table(&rows);
    let map = render_canonical_map(&rules).map_err(CliError::engine)?;

    let table_path = config.prefix_table_path();
    let map_path = config.canonical_map_path();
    write::write_all_atomic(&[
        (table_path.as_path(), table.as_str()),
        (map_path.as_path(), map.as_str()),
    ])?;
    tracing::info!(
        table = %table_path.display(),
        map = %map_path.display(),
        rows = rows.len(),
        "outputs written"
    );

    let declared: Vec<&str> = config.registries.iter().map(|r| r.name.as_str()).collect();
    Ok(report::render(&result, &declared, rules.len(), rows.len()))
}
