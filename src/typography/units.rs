//! Unit exponents: `m2` becomes `m<sup>2</sup>`

use regex::Regex;
use std::sync::LazyLock;

static UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(m|km|cm|mm|dm)([23])\b").expect("valid unit pattern"));

pub fn format(text: &str) -> String {
    UNIT.replace_all(text, "${1}<sup>${2}</sup>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_and_volume() {
        assert_eq!(format("100 m2 og 3 km3"), "100 m<sup>2</sup> og 3 km<sup>3</sup>");
    }

    #[test]
    fn test_other_words_untouched() {
        assert_eq!(format("gm2 m4 m23"), "gm2 m4 m23");
    }
}
