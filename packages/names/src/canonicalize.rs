//! Comparison keys for street names.

use regex::Regex;
use std::sync::LazyLock;

/// Everything that is not an ASCII letter, ASCII digit, or a macron vowel
/// used in local place names.
static NON_KEY_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9āēīōū]+").expect("valid regex"));

/// Spelling variants folded before punctuation is stripped. Only the first
/// occurrence of each is replaced.
const VARIANTS: &[(&str, &str)] = &[("saint ", "st "), ("mount ", "mt "), ("number ", "no ")];

/// Produces the comparison key for a street name.
///
/// Lower-cases, folds `saint`/`mount`/`number` to their short forms, then
/// drops every character outside `[a-z0-9āēīōū]`. Abbreviations such as
/// "St" vs "Street" are *not* unified here; that is [`crate::expand`]'s job.
#[must_use]
pub fn canonicalize(name: &str) -> String {
    let mut lower = name.to_lowercase();
    for (from, to) in VARIANTS {
        if lower.contains(from) {
            lower = lower.replacen(from, to, 1);
        }
    }
    NON_KEY_CHARS_RE.replace_all(&lower, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_whitespace_and_punctuation() {
        assert_eq!(canonicalize("Main St."), "mainst");
        assert_eq!(canonicalize("O'Connell  Street"), "oconnellstreet");
        assert_eq!(canonicalize("State Highway 1"), "statehighway1");
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(canonicalize("Main St"), canonicalize("MAIN ST"));
    }

    #[test]
    fn is_deterministic() {
        let name = "Saint Mary's Road";
        assert_eq!(canonicalize(name), canonicalize(name));
    }

    #[test]
    fn folds_spelling_variants() {
        assert_eq!(canonicalize("Saint Albans Avenue"), "stalbansavenue");
        assert_eq!(canonicalize("Mount Eden Road"), "mtedenroad");
        assert_eq!(canonicalize("Number One Line"), "nooneline");
    }

    #[test]
    fn folds_only_first_variant_occurrence() {
        assert_eq!(canonicalize("Saint Saint Lane"), "stsaintlane");
    }

    #[test]
    fn keeps_macron_vowels() {
        assert_eq!(canonicalize("Tōtara Street"), "tōtarastreet");
        assert_eq!(canonicalize("MĀORI BANK"), "māoribank");
    }

    #[test]
    fn drops_other_non_ascii_letters() {
        assert_eq!(canonicalize("Café Lane"), "caflane");
    }

    #[test]
    fn does_not_unify_abbreviations() {
        assert_ne!(canonicalize("123 Main St"), canonicalize("123 Main Street"));
    }

    #[test]
    fn accepts_empty_input() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("  -- "), "");
    }
}
