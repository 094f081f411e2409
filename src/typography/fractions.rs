//! Stacked fractions: `3/4` becomes a numerator superscript over a
//! denominator

use regex::Regex;
use std::sync::LazyLock;

// Denominators have at most two digits so that law identifiers such as
// `33/1944` are left alone.
static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/(\d{1,2})([^0-9]|$)").expect("valid fraction pattern"));

pub fn format(text: &str) -> String {
    FRACTION
        .replace_all(
            text,
            "<sup class=\"fraction-numerator\">${1}</sup>/<span class=\"fraction-denominator\">${2}</span>${3}",
        )
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fraction() {
        assert_eq!(
            format("3/4 hluta"),
            "<sup class=\"fraction-numerator\">3</sup>/<span class=\"fraction-denominator\">4</span> hluta"
        );
    }

    #[test]
    fn test_fraction_at_end() {
        assert_eq!(
            format("að 2/3"),
            "að <sup class=\"fraction-numerator\">2</sup>/<span class=\"fraction-denominator\">3</span>"
        );
    }

    #[test]
    fn test_law_identifiers_untouched() {
        assert_eq!(format("lög nr. 33/1944"), "lög nr. 33/1944");
    }
}
