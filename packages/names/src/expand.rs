//! Display names for abbreviated authoritative street names.

use crate::abbreviations;

/// Expands abbreviations and normalizes casing.
///
/// Each whitespace-separated token is upper-cased and looked up in the
/// abbreviation table; unknown tokens are lower-cased instead. Every token
/// is then title-cased and the result joined with single spaces.
#[must_use]
pub fn expand(raw_name: &str) -> String {
    raw_name
        .split_whitespace()
        .map(|token| {
            let word = abbreviations::lookup(&token.to_uppercase())
                .map_or_else(|| token.to_lowercase(), str::to_string);
            title_case(&word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-cases the first character, leaving the rest untouched.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
