//! Number-to-words conversion using the Indian numbering system
//!
//! Amounts are grouped by thousand, lakh (10^5) and crore (10^7), which is
//! how sale prices in Ngultrum are written out on the deed.

const ONES: [&str; 10] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

const TEENS: [&str; 10] = [
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const THOUSAND: u64 = 1_000;
const LAKH: u64 = 100_000;
const CRORE: u64 = 10_000_000;

/// Convert a non-negative integer to lowercase English words
///
/// ```
/// use deed::core::words::number_to_words;
///
/// assert_eq!(number_to_words(450_000), "four lakh fifty thousand");
/// assert_eq!(number_to_words(105), "one hundred and five");
/// ```
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "zero".to_string();
    }
    convert(n)
}

/// Convert a decimal digit string to words
///
/// Anything that is not a plain non-negative integer (a sign, separators,
/// an empty string, overflow) falls back to `"zero"`.
pub fn amount_in_words(amount: &str) -> String {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return "zero".to_string();
    }
    amount.parse::<u64>().map(number_to_words).unwrap_or_else(|_| "zero".to_string())
}

fn convert(n: u64) -> String {
    match n {
        0 => String::new(),
        1..=9 => ONES[n as usize].to_string(),
        10..=19 => TEENS[(n - 10) as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                ones => format!("{} {}", tens, ONES[ones as usize]),
            }
        }
        100..=999 => {
            let head = format!("{} hundred", ONES[(n / 100) as usize]);
            match n % 100 {
                0 => head,
                rest => format!("{} and {}", head, convert(rest)),
            }
        }
        1_000..=99_999 => band(n, THOUSAND, "thousand"),
        100_000..=9_999_999 => band(n, LAKH, "lakh"),
        _ => band(n, CRORE, "crore"),
    }
}

fn band(n: u64, unit: u64, name: &str) -> String {
    let head = format!("{} {}", convert(n / unit), name);
    match n % unit {
        0 => head,
        rest => format!("{} {}", head, convert(rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(number_to_words(0), "zero");
    }

    #[test]
    fn test_ones_and_teens() {
        assert_eq!(number_to_words(1), "one");
        assert_eq!(number_to_words(9), "nine");
        assert_eq!(number_to_words(10), "ten");
        assert_eq!(number_to_words(15), "fifteen");
        assert_eq!(number_to_words(19), "nineteen");
    }

    #[test]
    fn test_tens_are_not_hyphenated() {
        assert_eq!(number_to_words(20), "twenty");
        assert_eq!(number_to_words(21), "twenty one");
        assert_eq!(number_to_words(99), "ninety nine");
    }

    #[test]
    fn test_hundreds() {
        assert_eq!(number_to_words(100), "one hundred");
        assert_eq!(number_to_words(105), "one hundred and five");
        assert_eq!(number_to_words(110), "one hundred and ten");
        assert_eq!(number_to_words(999), "nine hundred and ninety nine");
    }

    #[test]
    fn test_thousand_band() {
        assert_eq!(number_to_words(1_000), "one thousand");
        assert_eq!(number_to_words(1_005), "one thousand five");
        assert_eq!(number_to_words(1_100), "one thousand one hundred");
        assert_eq!(number_to_words(12_345), "twelve thousand three hundred and forty five");
        assert_eq!(
            number_to_words(99_999),
            "ninety nine thousand nine hundred and ninety nine"
        );
    }

    #[test]
    fn test_lakh_band() {
        assert_eq!(number_to_words(100_000), "one lakh");
        assert_eq!(number_to_words(450_000), "four lakh fifty thousand");
        assert_eq!(number_to_words(100_001), "one lakh one");
        assert_eq!(
            number_to_words(9_999_999),
            "ninety nine lakh ninety nine thousand nine hundred and ninety nine"
        );
    }

    #[test]
    fn test_crore_band() {
        assert_eq!(number_to_words(10_000_000), "one crore");
        assert_eq!(number_to_words(10_000_001), "one crore one");
        assert_eq!(number_to_words(12_500_000), "one crore twenty five lakh");
        assert_eq!(
            number_to_words(99_999_999),
            "nine crore ninety nine lakh ninety nine thousand nine hundred and ninety nine"
        );
    }

    #[test]
    fn test_crore_part_recurses_past_ninety_nine() {
        assert_eq!(number_to_words(1_000_000_000), "one hundred crore");
        assert_eq!(number_to_words(10_000_000_000), "one thousand crore");
    }

    #[test]
    fn test_no_digits_and_deterministic_across_bands() {
        let samples = (0..2_000u64)
            .chain((0..100_000_000u64).step_by(99_991))
            .chain([99_999, 100_000, 9_999_999, 10_000_000, 99_999_999]);
        for n in samples {
            let words = number_to_words(n);
            assert!(!words.is_empty(), "empty output for {}", n);
            assert!(!words.chars().any(|c| c.is_ascii_digit()), "digit in output for {}", n);
            assert!(!words.contains("  "), "double space for {}", n);
            assert!(!words.starts_with(' ') && !words.ends_with(' '), "padding for {}", n);
            assert_eq!(words, number_to_words(n));
        }
    }

    #[test]
    fn test_amount_in_words_fallbacks() {
        assert_eq!(amount_in_words("450000"), "four lakh fifty thousand");
        assert_eq!(amount_in_words(""), "zero");
        assert_eq!(amount_in_words("-5"), "zero");
        assert_eq!(amount_in_words("12.5"), "zero");
        assert_eq!(amount_in_words("abc"), "zero");
        assert_eq!(amount_in_words("99999999999999999999999"), "zero");
    }
}
