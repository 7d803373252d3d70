//! strategies.rs - Ordered text-extraction strategies for the page-scrape path
//!
//! Each strategy is a stateless pattern with its own validity gate. The set
//! is built once and evaluated as a single reduction in priority order, so
//! the first valid candidate wins deterministically.
//!
//! The validity thresholds are deliberately uneven: attribute, label and
//! currency matches anchor on page structure and are trusted at anything
//! above zero, while the generic long-number scan matches unrelated large
//! numbers easily and is gated at > 1 000 000. Kept as per-strategy
//! configuration rather than a unified threshold.

use log::debug;
use regex::Regex;

/// Floor for the generic long-number scan.
pub const GENERIC_SCAN_FLOOR: u64 = 1_000_000;

/// A digit span with optional internal whitespace: regular space, NBSP or
/// narrow NBSP, the separators the page actually uses.
const DIGIT_SPAN: &str = r"\d[\d \u{a0}\u{202f}]*";

/// One extraction rule: a pattern whose first capture group is a digit span,
/// plus the gates a candidate must clear.
pub struct Strategy {
    id: &'static str,
    pattern: Regex,
    /// Minimum digit count after whitespace normalization.
    min_digits: usize,
    /// Candidate must be strictly greater than this.
    min_valid: u64,
}

impl Strategy {
    fn new(id: &'static str, pattern: &str, min_digits: usize, min_valid: u64) -> Self {
        Strategy {
            id,
            pattern: Regex::new(pattern).expect("Failed to compile strategy pattern"),
            min_digits,
            min_valid,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Scan `text` for the first candidate that clears this strategy's gates.
    pub fn apply(&self, text: &str) -> Option<u64> {
        for captures in self.pattern.captures_iter(text) {
            let raw = captures.get(1)?.as_str();
            let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

            if digits.len() < self.min_digits {
                continue;
            }
            let Ok(value) = digits.parse::<u64>() else {
                continue;
            };
            if value > self.min_valid {
                return Some(value);
            }
            debug!("strategy {}: candidate {} below gate {}", self.id, value, self.min_valid);
        }
        None
    }
}

/// The standard ordered strategy set, highest priority first.
pub struct StrategySet {
    strategies: Vec<Strategy>,
}

impl StrategySet {
    pub fn standard() -> Self {
        let strategies = vec![
            // 1. counter widget: class="counter-content"...><span>12 345 678</span>
            Strategy::new(
                "attr_counter",
                &format!(r#"counter-content"[^>]*>\s*<span[^>]*>\s*({})"#, DIGIT_SPAN),
                1,
                0,
            ),
            // 2. label phrase ("зібрано" = "collected") followed by a number
            Strategy::new(
                "label_zibrano",
                &format!(r"(?i)зібрано\D{{0,40}}?({})", DIGIT_SPAN),
                1,
                0,
            ),
            // 3. hryvnia glyph immediately before a number
            Strategy::new("currency_uah", &format!(r"₴\s*({})", DIGIT_SPAN), 1, 0),
            // 4. any long digit span; prone to false positives, gated hard
            Strategy::new(
                "long_number_scan",
                &format!(r"({})", DIGIT_SPAN),
                7,
                GENERIC_SCAN_FLOOR,
            ),
        ];

        StrategySet { strategies }
    }

    /// Single reduction over the ordered set: the first strategy producing a
    /// valid candidate wins, and its id becomes the source tag.
    pub fn extract(&self, text: &str) -> Option<(u64, &'static str)> {
        self.strategies.iter().find_map(|strategy| {
            strategy
                .apply(text)
                .map(|value| {
                    debug!("strategy {} matched: {}", strategy.id, value);
                    (value, strategy.id)
                })
        })
    }
}

impl Default for StrategySet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_counter_match() {
        let set = StrategySet::standard();
        let html = r#"<div class="counter-content"><span>7 654 321</span></div>"#;

        assert_eq!(set.extract(html), Some((7_654_321, "attr_counter")));
    }

    #[test]
    fn test_internal_whitespace_normalization() {
        let set = StrategySet::standard();
        // regular space, NBSP and narrow NBSP all collapse
        let html = "Вже зібрано 12\u{a0}345\u{202f}678 грн";

        assert_eq!(set.extract(html), Some((12_345_678, "label_zibrano")));
    }

    #[test]
    fn test_currency_symbol_match() {
        let set = StrategySet::standard();
        let html = "<b>₴2 500 000</b>";

        assert_eq!(set.extract(html), Some((2_500_000, "currency_uah")));
    }

    #[test]
    fn test_generic_scan_needs_seven_digits_and_floor() {
        let set = StrategySet::standard();

        // 7 digits but exactly at the floor: rejected
        assert_eq!(set.extract("order id 1000000 pending"), None);
        // 7+ digits above the floor: accepted
        assert_eq!(
            set.extract("raised 9876543 so far"),
            Some((9_876_543, "long_number_scan"))
        );
        // long enough span, value too small after normalization never happens
        // for 7 digits above 1000000, but short spans are skipped outright
        assert_eq!(set.extract("tel 123456"), None);
    }

    #[test]
    fn test_generic_scan_skips_small_spans_for_later_large_one() {
        let set = StrategySet::standard();
        // first span is 4 digits, second clears both gates
        assert_eq!(
            set.extract("year 2024, total 7654321"),
            Some((7_654_321, "long_number_scan"))
        );
    }

    #[test]
    fn test_priority_label_beats_generic() {
        let set = StrategySet::standard();
        // generic scan would find 99999999 first in document order,
        // but the labeled match has higher priority
        let html = "visits 99999999 ... зібрано 5 000 000 грн";

        assert_eq!(set.extract(html), Some((5_000_000, "label_zibrano")));
    }

    #[test]
    fn test_zero_candidates_are_invalid() {
        let set = StrategySet::standard();
        assert_eq!(set.extract("зібрано 0 грн"), None);
    }

    #[test]
    fn test_no_match_at_all() {
        let set = StrategySet::standard();
        assert_eq!(set.extract("<html><body>no numbers here</body></html>"), None);
    }
}
