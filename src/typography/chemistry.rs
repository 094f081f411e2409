//! Chemical formulas: digits of known formulas are subscripted (`CO2` → `CO<sub>2</sub>`)

use regex::{Captures, Regex};

/// Formulas recognized when no list is configured
pub const DEFAULT_FORMULAS: &[&str] = &[
    "CO2", "SO2", "SO3", "NO2", "N2O", "NH3", "CH4", "H2O", "H2S", "O2", "O3", "SF6", "NF3", "H2",
    "N2",
];

/// Compiled formula matcher
#[derive(Debug, Clone)]
pub struct Chemistry {
    pattern: Option<Regex>,
}

impl Chemistry {
    pub fn new<S: AsRef<str>>(formulas: &[S]) -> Self {
        let mut formulas: Vec<&str> = formulas
            .iter()
            .map(|f| f.as_ref().trim())
            .filter(|f| !f.is_empty())
            .collect();
        // Longest first so that `CO2` is never split by a shorter `O2`
        formulas.sort_by_key(|f| std::cmp::Reverse(f.len()));

        let pattern = if formulas.is_empty() {
            None
        } else {
            let alternation = formulas
                .iter()
                .map(|f| regex::escape(f))
                .collect::<Vec<_>>()
                .join("|");
            compile_pattern(&format!(r"\b({})\b", alternation))
        };
        Self { pattern }
    }

    pub fn format(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures| subscript_digits(&caps[1]))
                .into_owned(),
            None => text.to_string(),
        }
    }
}

impl Default for Chemistry {
    fn default() -> Self {
        Self::new(DEFAULT_FORMULAS)
    }
}

/// Compile the formula alternation; a failure disables the pass
fn compile_pattern(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(error = %e, "Chemical formula pass disabled");
            None
        }
    }
}

fn subscript_digits(formula: &str) -> String {
    let mut out = String::with_capacity(formula.len() + 16);
    let mut in_digits = false;
    for ch in formula.chars() {
        match (ch.is_ascii_digit(), in_digits) {
            (true, false) => {
                out.push_str("<sub>");
                in_digits = true;
            }
            (false, true) => {
                out.push_str("</sub>");
                in_digits = false;
            }
            _ => {}
        }
        out.push(ch);
    }
    if in_digits {
        out.push_str("</sub>");
    }
    out
}
