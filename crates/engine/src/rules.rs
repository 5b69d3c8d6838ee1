//! Override rules: ordered `(pattern, canonical, display)` triples.
//!
//! The rule file is CSV with a header row:
//!
//! ```text
//! pattern,canonical_name,display_name
//! Cisco%,Cisco,Cisco Systems
//! ```
//!
//! `%` in a pattern matches any sequence; the rest of the pattern is a
//! regular expression. Matching is case-insensitive and anchored at both
//! ends. The first rule that matches a normalized name wins.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::error::EngineError;

/// Placeholder that expands to "any sequence" in a rule pattern.
pub const WILDCARD: char = '%';

#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub source: String,
    pub pattern: Regex,
    pub canonical_name: String,
    pub display_name: String,
}

impl OverrideRule {
    pub fn new(source: &str, canonical_name: &str, display_name: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            pattern: compile_pattern(source)?,
            canonical_name: canonical_name.to_string(),
            display_name: display_name.to_string(),
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// Compile a rule pattern into an anchored, case-insensitive regex.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let expanded = pattern.replace(WILDCARD, ".*");
    RegexBuilder::new(&format!("^(?:{expanded})$"))
        .case_insensitive(true)
        .build()
}

/// One `canonical → display` entry of the canonical-name map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEntry {
    pub canonical_name: String,
    pub display_name: String,
}

/// Rules in file order. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<OverrideRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<OverrideRule>) -> Self {
        Self { rules }
    }

    /// Parse a rule file. Any bad row fails the whole load.
    pub fn from_csv(input: &str) -> Result<Self, EngineError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_bytes());

        let mut rules = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| EngineError::RuleParse {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                message: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() != 3 {
                return Err(EngineError::RuleParse {
                    line,
                    message: format!(
                        "expected 3 fields (pattern, canonical_name, display_name), found {}",
                        record.len()
                    ),
                });
            }

            let (pattern, canonical, display) = (&record[0], &record[1], &record[2]);
            if pattern.is_empty() {
                return Err(EngineError::RuleParse { line, message: "empty pattern".into() });
            }
            if canonical.is_empty() {
                return Err(EngineError::RuleParse { line, message: "empty canonical name".into() });
            }

            let rule = OverrideRule::new(pattern, canonical, display).map_err(|e| {
                EngineError::InvalidPattern {
                    line,
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                }
            })?;
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverrideRule> {
        self.rules.iter()
    }

    /// First rule, in file order, whose pattern matches `name`.
    pub fn find_match(&self, name: &str) -> Option<&OverrideRule> {
        self.rules.iter().find(|rule| rule.matches(name))
    }

    /// Canonical names sorted case-insensitively, first occurrence of each
    /// canonical name wins.
    pub fn canonical_entries(&self) -> Vec<CanonicalEntry> {
        let mut sorted: Vec<&OverrideRule> = self.rules.iter().collect();
        // Stable, so equal keys keep file order
        sorted.sort_by_key(|rule| rule.canonical_name.to_lowercase());

        let mut seen = HashSet::new();
        sorted
            .into_iter()
            .filter(|rule| seen.insert(rule.canonical_name.as_str()))
            .map(|rule| CanonicalEntry {
                canonical_name: rule.canonical_name.clone(),
                display_name: rule.display_name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
pattern,canonical_name,display_name
Cisco%,Cisco,Cisco Systems
%Apple%,Apple,Apple Inc.
Cisco Meraki,Meraki,Cisco Meraki
";

    #[test]
    fn loads_in_file_order() {
        let rules = RuleSet::from_csv(RULES).unwrap();
        assert_eq!(rules.len(), 3);
        let canon: Vec<_> = rules.iter().map(|r| r.canonical_name.as_str()).collect();
        assert_eq!(canon, vec!["Cisco", "Apple", "Meraki"]);
    }

    #[test]
    fn wildcard_and_anchoring() {
        let rule = OverrideRule::new("ACME%", "ACME", "Acme Corp.").unwrap();
        assert!(rule.matches("Acme"));
        assert!(rule.matches("acme widgets"));
        assert!(!rule.matches("Big Acme"));

        let exact = OverrideRule::new("Foo", "Foo", "Foo").unwrap();
        assert!(exact.matches("FOO"));
        assert!(!exact.matches("Foobar"));
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let rule = OverrideRule::new("Foo|Bar", "FB", "FB").unwrap();
        assert!(rule.matches("bar"));
        assert!(!rule.matches("Foo Baz"));
        assert!(!rule.matches("Rebar"));
    }

    #[test]
    fn earlier_rule_wins() {
        let rules = RuleSet::from_csv(RULES).unwrap();
        // Both "Cisco%" and "Cisco Meraki" match; file order decides.
        let hit = rules.find_match("Cisco Meraki").unwrap();
        assert_eq!(hit.canonical_name, "Cisco");
        assert_eq!(hit.source, "Cisco%");
        assert!(rules.find_match("Juniper Networks").is_none());
    }

    #[test]
    fn wrong_field_count_fails_whole_load() {
        let input = "pattern,canonical_name,display_name\nA%,A,A\nB%,B\n";
        let err = RuleSet::from_csv(input).unwrap_err();
        match err {
            EngineError::RuleParse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 3 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_pattern_fails_whole_load() {
        let input = "pattern,canonical_name,display_name\n(unclosed%,X,X\n";
        let err = RuleSet::from_csv(input).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern { line: 2, .. }));
    }

    #[test]
    fn empty_canonical_rejected() {
        let input = "pattern,canonical_name,display_name\nA%,,A\n";
        assert!(RuleSet::from_csv(input).is_err());
    }

    #[test]
    fn header_only_is_empty_set() {
        let rules = RuleSet::from_csv("pattern,canonical_name,display_name\n").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn canonical_entries_sorted_and_deduplicated() {
        let input = "\
pattern,canonical_name,display_name
z%,zeta,Zeta One
a%,Alpha,Alpha One
b%,beta,Beta
a2%,Alpha,Alpha Two
";
        let rules = RuleSet::from_csv(input).unwrap();
        let entries = rules.canonical_entries();
        let pairs: Vec<_> = entries
            .iter()
            .map(|e| (e.canonical_name.as_str(), e.display_name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("Alpha", "Alpha One"), ("beta", "Beta"), ("zeta", "Zeta One")]
        );
    }
}
