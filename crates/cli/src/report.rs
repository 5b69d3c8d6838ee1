//! End-of-run summary printed to stdout.

use std::fmt::Write;

use ouimap_engine::{MergeResult, RegistryStats};

const LABEL_WIDTH: usize = 20;

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{:<width$}: {}", label, value, width = LABEL_WIDTH);
}

/// Render the summary. Registries are listed in `declared` order, which is
/// the order they appear in the configuration, not the merge order.
pub fn render(result: &MergeResult, declared: &[&str], rule_count: usize, table_rows: usize) -> String {
    let stats: Vec<&RegistryStats> = declared
        .iter()
        .filter_map(|name| result.stats.iter().find(|s| s.name == *name))
        .collect();

    let mut out = String::new();
    line(&mut out, "Override rules", rule_count);
    for s in &stats {
        line(&mut out, &format!("IEEE {} added", s.name), s.added);
    }
    line(&mut out, "Total added", result.total_added());
    line(&mut out, "Table rows", table_rows);

    out.push('\n');
    for s in &stats {
        line(&mut out, &format!("IEEE {} total", s.name), s.total);
    }
    line(&mut out, "Total assessed", result.total_assessed());

    out.push('\n');
    for s in &stats {
        line(&mut out, &format!("IEEE {} skipped", s.name), s.skipped);
    }

    let dated: Vec<&&RegistryStats> = stats
        .iter()
        .filter(|s| s.last_modified.is_some() || s.content_length.is_some())
        .collect();
    if !dated.is_empty() {
        out.push('\n');
        for s in dated {
            let mut value = s.last_modified.clone().unwrap_or_else(|| "-".to_string());
            if let Some(len) = s.content_length {
                let _ = write!(value, " ({} bytes)", len);
            }
            line(&mut out, &format!("IEEE {} source", s.name), value);
        }
    }

    out
}
