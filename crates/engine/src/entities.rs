// HTML entity decoding for registry organization names and addresses.
//
// Registry exports carry entities such as `&amp;`, `&#39;` and, now and then,
// legacy forms without the closing semicolon (`&eacute`). Decoding follows
// the HTML5 rules for text content: the full named-entity table, legacy
// semicolon-less names, and the Windows-1252 remap of `&#128;`-`&#159;`.
// Anything unrecognized is left as-is.

/// Decode HTML character references in `s`.
pub fn decode_html_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    htmlize::unescape(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_untouched() {
        assert_eq!(decode_html_entities("Acme Widgets"), "Acme Widgets");
    }

    #[test]
    fn named_entities() {
        assert_eq!(decode_html_entities("AT&amp;T"), "AT&T");
        assert_eq!(decode_html_entities("&quot;Q&quot;"), "\"Q\"");
        assert_eq!(decode_html_entities("Soci&eacute;t&eacute;"), "Soci\u{e9}t\u{e9}");
        assert_eq!(decode_html_entities("&ograve;&Ograve;"), "\u{f2}\u{d2}");
        assert_eq!(decode_html_entities("Non&hyphen;Stop"), "Non\u{2010}Stop");
    }

    #[test]
    fn legacy_entities_without_semicolon() {
        assert_eq!(decode_html_entities("Caf&eacute"), "Caf\u{e9}");
        assert_eq!(decode_html_entities("AT&amp T"), "AT& T");
        assert_eq!(decode_html_entities("trailing &amp"), "trailing &");
    }

    #[test]
    fn numeric_entities() {
        assert_eq!(decode_html_entities("O&#39;Brien"), "O'Brien");
        assert_eq!(decode_html_entities("&#x4E2D;"), "\u{4e2d}");
        assert_eq!(decode_html_entities("&#0;"), "\u{fffd}");
    }

    #[test]
    fn c1_references_use_windows_1252() {
        assert_eq!(decode_html_entities("&#150;x"), "\u{2013}x");
        assert_eq!(decode_html_entities("Macy&#146;s"), "Macy\u{2019}s");
        assert_eq!(decode_html_entities("&#x80;"), "\u{20ac}");
    }

    #[test]
    fn unknown_left_alone() {
        assert_eq!(decode_html_entities("A & B"), "A & B");
        assert_eq!(decode_html_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_html_entities("&&amp;"), "&&");
    }
}
