//! Text normalization for food names and free-text categories.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Removes diacritics by decomposing (NFD) and dropping combining marks.
///
/// # Examples
///
/// ```
/// use nutri_normalization::strip_accents;
///
/// assert_eq!(strip_accents("Feijão, carioca"), "Feijao, carioca");
/// ```
pub fn strip_accents(raw: &str) -> String {
    raw.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalized form of a food name used for matching and deduplication.
///
/// Lower-cases, strips accents, turns every non-alphanumeric character into a
/// separator and collapses runs of whitespace.
///
/// # Examples
///
/// ```
/// use nutri_normalization::normalize_name;
///
/// assert_eq!(normalize_name("  Pão de Queijo (assado) "), "pao de queijo assado");
/// assert_eq!(normalize_name("Arroz, tipo 1, cozido"), "arroz tipo 1 cozido");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let folded: String = strip_accents(&raw.to_lowercase())
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accent- and case-insensitive substring test.
pub fn contains_normalized(haystack: &str, normalized_needle: &str) -> bool {
    normalized_needle.is_empty() || normalize_name(haystack).contains(normalized_needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_portuguese_diacritics() {
        assert_eq!(strip_accents("açúcar"), "acucar");
        assert_eq!(strip_accents("Maçã"), "Maca");
        assert_eq!(strip_accents("Hortaliças"), "Hortalicas");
    }

    #[test]
    fn punctuation_collapses_to_single_spaces() {
        assert_eq!(normalize_name("Leite, de vaca, integral"), "leite de vaca integral");
        assert_eq!(normalize_name("Bebida láctea/pêssego"), "bebida lactea pessego");
        assert_eq!(normalize_name("---"), "");
    }

    #[test]
    fn accent_variants_share_a_key() {
        assert_eq!(normalize_name("Feijão preto"), normalize_name("FEIJAO  PRETO"));
    }

    #[test]
    fn substring_match_ignores_accents() {
        assert!(contains_normalized("Pão francês", &normalize_name("pao franc")));
        assert!(!contains_normalized("Arroz", "feijao"));
        assert!(contains_normalized("anything", ""));
    }

    proptest! {
        #[test]
        fn normalize_name_is_idempotent(raw in "[a-zA-Z0-9À-ÿ ,.()/-]{0,40}") {
            let once = normalize_name(&raw);
            prop_assert_eq!(normalize_name(&once), once);
        }
    }
}
