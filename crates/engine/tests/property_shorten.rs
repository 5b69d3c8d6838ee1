// Property-based tests for name normalization.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;
use ouimap_engine::normalize::{shorten, GENERAL_TERMS};

static GENERIC_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?i)^(?:{})$", GENERAL_TERMS.join("|"))).unwrap()
});

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// True if `word` would be stripped as a generic term on its own.
fn is_generic(word: &str) -> bool {
    GENERIC_WORD.is_match(word)
}

/// A capitalized word that is not itself a generic term.
fn arb_word() -> impl Strategy<Value = String> {
    r"[A-Z][a-z]{3,9}".prop_filter("generic term", |w| !is_generic(w))
}

fn arb_clean_name() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 1..4).prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn clean_names_are_fixed_points(name in arb_clean_name()) {
        let once = shorten(&name).unwrap();
        prop_assert_eq!(&once, &name);
        prop_assert_eq!(shorten(&once).unwrap(), once);
    }

    #[test]
    fn suffixes_stripped_without_touching_words(
        name in arb_clean_name(),
        suffix in prop::sample::select(vec!["Inc", "Ltd.", "GmbH", "Co., Ltd.", "PLC", "Pty Ltd"]),
    ) {
        let long = format!("{name} {suffix}");
        prop_assert_eq!(shorten(&long).unwrap(), name);
    }

    #[test]
    fn upper_case_names_are_title_cased(name in arb_clean_name()) {
        let upper = name.to_uppercase();
        prop_assert_eq!(shorten(&upper).unwrap(), name);
    }

    #[test]
    fn never_empty_for_alphabetic_input(name in r"[A-Za-z]{1,12}( [A-Za-z]{1,12}){0,3}") {
        let short = shorten(&name).unwrap();
        prop_assert!(!short.is_empty());
    }
}
