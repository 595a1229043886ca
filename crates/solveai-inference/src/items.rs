//! Detection of lettered sub-items (`a)`, `item b`, ...) in question text.
//!
//! Heuristic only. The model splits the question into items itself and its
//! `questionItems` are never rewritten from this detector.

use once_cell::sync::Lazy;
use regex::Regex;

static ITEM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([a-e])\s*\)|item\s+([a-e])").expect("item pattern is a valid regex")
});

/// Letters of lettered items, upper-cased, in first-seen order.
///
/// Matching is case-insensitive and de-duplication is case-folded, so
/// `a)` and `Item A` count once.
pub fn detect_item_letters(text: &str) -> Vec<String> {
    let mut letters: Vec<String> = Vec::new();
    for caps in ITEM_PATTERN.captures_iter(text) {
        let Some(m) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let letter = m.as_str().to_uppercase();
        if !letters.contains(&letter) {
            letters.push(letter);
        }
    }
    letters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_parenthesized_letters() {
        let text = "Um bloco de 2 kg... a) Calcule a força. b) Calcule o trabalho. c) A potência.";
        assert_eq!(detect_item_letters(text), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_detects_item_keyword() {
        let text = "Item a: determine v. Item B: determine t.";
        assert_eq!(detect_item_letters(text), vec!["A", "B"]);
    }

    #[test]
    fn test_first_seen_order_and_case_folded_dedup() {
        let text = "b) primeiro. A) segundo. item b de novo. a ) outra vez. C)";
        assert_eq!(detect_item_letters(text), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_letters_outside_range_ignored() {
        let text = "f) nada. g) nada. item z.";
        assert!(detect_item_letters(text).is_empty());
    }

    #[test]
    fn test_plain_question_has_no_items() {
        assert!(detect_item_letters("Calcule a força para m=2kg, a=3m/s²").is_empty());
    }
}
