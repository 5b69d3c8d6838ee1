//! Manufacturer name normalization.
//!
//! `shorten` turns a registry organization name such as
//! `"ACME Corporation, Ltd."` into the short form `"Acme"` that override
//! rules are matched against. `sanitize` is the lighter cleanup applied to
//! addresses.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EngineError;

/// Business-entity and industry-generic terms removed by [`shorten`].
///
/// Each entry is a regex fragment matched case-insensitively after
/// punctuation has been replaced by spaces, so `"A/S"` and `"A.S."` both
/// arrive as `"A S"`.
pub const GENERAL_TERMS: &[&str] = &[
    "a +s", // A/S and A.S. but not "As" as in "Connect As"
    "ab",
    "ag",
    "b ?v",
    "closed joint stock company",
    "co",
    "company",
    "corp",
    "corporation",
    "de c ?v",
    "gmbh",
    "holding",
    "inc",
    "incorporated",
    "jsc",
    "kg",
    "k k", // K.K., not K+K
    "limited",
    "llc",
    "ltd",
    "n ?v",
    "oao",
    "of",
    "open joint stock company",
    "ooo",
    "o√º",
    "oy",
    "oyj",
    "plc",
    "pty",
    "pvt",
    "s ?a ?r ?l",
    "s ?a",
    "s ?p ?a",
    "sp ?k",
    "s ?r ?l",
    "systems",
    "the",
    "zao",
    "z ?o ?o",
    "technology",
    "technologies",
    "electronics",
    "communication",
    "communications",
    "telecommunications",
    "semiconductor",
    "device",
];

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["',./:()]"#).expect("punctuation pattern"));

// A term must follow a non-word character and be followed by a space. The
// trailing space is part of the match here; `strip_general_terms` gives it
// back so it can lead the next term.
static GENERAL_TERMS_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\W(?:{}) ", GENERAL_TERMS.join("|"));
    Regex::new(&pattern).expect("general terms pattern")
});

static ALPHA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("alpha pattern"));

/// Join all whitespace-separated words with single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert a long manufacturer name to its short canonical form.
///
/// Fails when nothing is left of the name, which always indicates bad
/// upstream data.
pub fn shorten(name: &str) -> Result<String, EngineError> {
    let collapsed = collapse_whitespace(name);

    // One space on each end so terms at the boundaries have delimiters.
    let padded = format!(" {collapsed} ");
    let cleaned = PUNCTUATION.replace_all(&padded, " ").replace(" & ", " ");

    let plain = strip_general_terms(&cleaned);
    let mut short = if plain.chars().all(|c| c == ' ') {
        cleaned
    } else {
        plain
    };

    if is_all_upper(&short) {
        short = title_case(&short);
    }

    let short = collapse_whitespace(&short);
    if short.is_empty() {
        return Err(EngineError::ShortenedToNothing { name: collapsed });
    }

    Ok(short)
}

/// Light cleanup for addresses: collapse whitespace, blank out quotes.
pub fn sanitize(address: &str) -> String {
    collapse_whitespace(address).replace(|c| c == '"' || c == '\'', " ")
}

/// Lowercased alphabetic runs of `name`, used to tell a reformatted
/// duplicate from a genuinely different organization.
pub fn alpha_tokens(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    ALPHA_RUN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn strip_general_terms(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    let mut pos = 0;

    while let Some(m) = GENERAL_TERMS_RE.find_at(s, pos) {
        out.push_str(&s[last..m.start()]);
        last = m.end() - 1;
        pos = last;
    }

    out.push_str(&s[last..]);
    out
}

/// True when `s` has at least one cased character and none are lowercase.
fn is_all_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// Upper-case every cased character that follows an uncased one, lower-case
/// the rest: `"3COM"` becomes `"3Com"`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;

    for c in s.chars() {
        if is_cased(c) {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }

    out
}
