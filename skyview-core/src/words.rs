//! Rupee amounts spelled out with Indian (lakh / crore) grouping.

use crate::money::Money;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// `118.50` -> "One Hundred Eighteen Rupees and Fifty Paise Only".
/// Negative amounts read as zero.
pub fn amount_in_words(amount: Money) -> String {
    let paise_total = amount.paise().max(0) as u64;
    let rupees = paise_total / 100;
    let paise = paise_total % 100;

    let unit = if rupees == 1 { "Rupee" } else { "Rupees" };
    let mut out = format!("{} {}", number_in_words(rupees), unit);
    if paise > 0 {
        out.push_str(&format!(" and {} Paise", number_in_words(paise)));
    }
    out.push_str(" Only");
    out
}

/// Whole number in words: 1,23,45,678 -> "One Crore Twenty Three Lakh
/// Forty Five Thousand Six Hundred Seventy Eight".
pub fn number_in_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut parts = Vec::new();
    let crore = n / 10_000_000;
    let lakh = (n / 100_000) % 100;
    let thousand = (n / 1_000) % 100;
    let rest = n % 1_000;

    if crore > 0 {
        parts.push(format!("{} Crore", number_in_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", below_hundred(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", below_hundred(thousand)));
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], below_hundred(r)),
    }
}

fn below_hundred(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        _ if n % 10 == 0 => TENS[(n / 10) as usize].to_string(),
        _ => format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(number_in_words(0), "Zero");
        assert_eq!(number_in_words(7), "Seven");
        assert_eq!(number_in_words(19), "Nineteen");
        assert_eq!(number_in_words(40), "Forty");
        assert_eq!(number_in_words(118), "One Hundred Eighteen");
        assert_eq!(number_in_words(900), "Nine Hundred");
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(number_in_words(53_100), "Fifty Three Thousand One Hundred");
        assert_eq!(number_in_words(1_00_000), "One Lakh");
        assert_eq!(
            number_in_words(1_23_45_678),
            "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight"
        );
        assert_eq!(number_in_words(150_00_00_000), "One Hundred Fifty Crore");
    }

    #[test]
    fn rupees_and_paise() {
        assert_eq!(
            amount_in_words(Money::from_rupees(118)),
            "One Hundred Eighteen Rupees Only"
        );
        assert_eq!(
            amount_in_words(Money::from_paise(11850)),
            "One Hundred Eighteen Rupees and Fifty Paise Only"
        );
        assert_eq!(amount_in_words(Money::from_rupees(1)), "One Rupee Only");
        assert_eq!(amount_in_words(Money::ZERO), "Zero Rupees Only");
        assert_eq!(amount_in_words(Money::from_paise(-5)), "Zero Rupees Only");
    }
}
