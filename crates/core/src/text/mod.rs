//! Text normalization and tokenization.
//!
//! Normalization applies Unicode NFKC, transliterates a small fixed set of
//! Greek letters to their Latin names (so "TGF-β" and "TGF-beta" index
//! identically), and collapses whitespace runs. Tokenization lowercases and
//! extracts maximal runs of word characters; punctuation separates tokens
//! and never appears inside one.

use unicode_normalization::UnicodeNormalization;

pub mod expand;

pub use expand::expand_query_terms;

/// Greek letters that occur in gene/cytokine names across the corpus.
const GREEK_MAP: [(char, &str); 5] = [
    ('β', "beta"),
    ('α', "alpha"),
    ('κ', "kappa"),
    ('γ', "gamma"),
    ('δ', "delta"),
];

/// Normalize text: NFKC, Greek transliteration, whitespace collapse, trim.
///
/// Pure and idempotent; empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    let mut out = String::with_capacity(composed.len());
    for c in composed.chars() {
        match GREEK_MAP.iter().find(|(g, _)| *g == c) {
            Some((_, name)) => out.push_str(name),
            None => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokenize text: normalize, lowercase, split into maximal word-character
/// runs. Word characters are alphanumerics and underscore; digits count.
pub fn tokenize(text: &str) -> Vec<String> {
    let buffer = normalize(text).to_lowercase();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in buffer.char_indices() {
        if is_word_char(c) {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push(buffer[s..i].to_string());
        }
    }
    if let Some(s) = start {
        tokens.push(buffer[s..].to_string());
    }

    tokens
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  TGF\t\tsignaling\n pathway "), "TGF signaling pathway");
    }

    #[test]
    fn test_normalize_transliterates_greek() {
        assert_eq!(normalize("NF-κB and TGF-β1"), "NF-kappaB and TGF-beta1");
        assert_eq!(normalize("IFN-γ / IL-1α / TCR-δ"), "IFN-gamma / IL-1alpha / TCR-delta");
    }

    #[test]
    fn test_normalize_idempotent() {
        let cases = ["NF-κB  activation", "  plain   text ", "TGF-β", "", "ℕ𝒐𝓇𝓂"];
        for case in cases {
            let once = normalize(case);
            assert_eq!(normalize(&once), once, "not idempotent for {case:?}");
        }
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
    }

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(
            tokenize("MicroRNA-21 regulates SMAD2/SMAD3!"),
            vec!["microrna", "21", "regulates", "smad2", "smad3"]
        );
    }

    #[test]
    fn test_tokenize_keeps_digits_and_underscores() {
        assert_eq!(tokenize("hsa_mir_21 IL6"), vec!["hsa_mir_21", "il6"]);
    }

    #[test]
    fn test_tokenize_greek_folds_into_tokens() {
        assert_eq!(tokenize("TGF-β"), vec!["tgf", "beta"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("...!?").is_empty());
    }

    #[test]
    fn test_tokenize_deterministic_and_clean() {
        let text = "Gut microbiota, epithelial barrier; and IL-6.";
        let a = tokenize(text);
        let b = tokenize(text);
        assert_eq!(a, b);
        for tok in &a {
            assert!(!tok.chars().any(|c| c.is_whitespace()), "whitespace in {tok:?}");
            assert!(tok.chars().all(is_word_char), "punctuation in {tok:?}");
        }
    }
}
