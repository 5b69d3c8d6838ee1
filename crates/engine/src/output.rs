//! Output builders: the prefix table and the canonical-name map.
//!
//! Both are produced as strings; writing them to disk is the caller's job.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::model::{MergedEntry, OutputRow, TableValue, PRIVATE};
use crate::rules::RuleSet;

/// Match every merged prefix against the rules.
///
/// Prefixes come out in ascending order. Entries whose normalized name
/// matches no rule are dropped.
pub fn build_prefix_table(
    entries: &BTreeMap<String, MergedEntry>,
    rules: &RuleSet,
    value: TableValue,
) -> Vec<OutputRow> {
    entries
        .values()
        .filter(|entry| entry.name != PRIVATE)
        .filter_map(|entry| {
            let Some(rule) = rules.find_match(&entry.name) else {
                tracing::debug!(prefix = %entry.prefix, name = %entry.name, "no rule matches");
                return None;
            };
            tracing::trace!(prefix = %entry.prefix, pattern = %rule.source, "matched rule");
            let value = match value {
                TableValue::Display => rule.display_name.clone(),
                TableValue::Canonical => rule.canonical_name.clone(),
            };
            Some(OutputRow { prefix: entry.prefix.clone(), value })
        })
        .collect()
}

/// `prefix<TAB>value` lines, newline-terminated.
pub fn render_prefix_table(rows: &[OutputRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.prefix);
        out.push('\t');
        out.push_str(&row.value);
        out.push('\n');
    }
    out
}

/// Canonical name → display name, in rule sort order, closed by an empty
/// catch-all entry.
pub fn build_canonical_map(rules: &RuleSet) -> Map<String, Value> {
    let mut map = Map::new();
    for entry in rules.canonical_entries() {
        map.insert(entry.canonical_name, Value::String(entry.display_name));
    }
    map.insert(String::new(), Value::String(String::new()));
    map
}

pub fn render_canonical_map(rules: &RuleSet) -> Result<String, EngineError> {
    let map = build_canonical_map(rules);
    let mut json = serde_json::to_string_pretty(&Value::Object(map))
        .map_err(|e| EngineError::Serialize(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prefix: &str, name: &str) -> (String, MergedEntry) {
        (
            prefix.to_string(),
            MergedEntry {
                prefix: prefix.into(),
                name: name.into(),
                address: String::new(),
                raw_name: name.into(),
                registry: "OUI".into(),
            },
        )
    }

    fn rules() -> RuleSet {
        RuleSet::from_csv(
            "pattern,canonical_name,display_name\n\
             Acme%,ACME,Acme Corp.\n\
             Cisco%,Cisco,Cisco Systems\n\
             Private,Private,Private\n",
        )
        .unwrap()
    }

    #[test]
    fn table_sorted_matched_only() {
        let entries: BTreeMap<_, _> = [
            entry("FFEEDD", "Cisco"),
            entry("AABBCC", "Acme"),
            entry("112233", "Unknown Maker"),
        ]
        .into_iter()
        .collect();

        let rows = build_prefix_table(&entries, &rules(), TableValue::Display);
        assert_eq!(render_prefix_table(&rows), "AABBCC\tAcme Corp.\nFFEEDD\tCisco Systems\n");
    }

    #[test]
    fn table_can_carry_canonical_names() {
        let entries: BTreeMap<_, _> = [entry("AABBCC", "Acme")].into_iter().collect();
        let rows = build_prefix_table(&entries, &rules(), TableValue::Canonical);
        assert_eq!(rows[0].value, "ACME");
    }

    #[test]
    fn private_names_never_written() {
        let entries: BTreeMap<_, _> = [entry("001122", "Private")].into_iter().collect();
        let rows = build_prefix_table(&entries, &rules(), TableValue::Display);
        assert!(rows.is_empty());
    }

    #[test]
    fn canonical_map_ends_with_catch_all() {
        let json = render_canonical_map(&rules()).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["ACME"], "Acme Corp.");
        assert_eq!(parsed[""], "");

        let keys: Vec<_> = build_canonical_map(&rules()).keys().cloned().collect();
        assert_eq!(keys, vec!["ACME", "Cisco", "Private", ""]);
        assert!(json.ends_with("}\n"));
    }
}
