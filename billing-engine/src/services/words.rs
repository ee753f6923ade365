//! Amounts in words, Indian numbering system (Hundred, Thousand, Lakh).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Returned for amounts of one crore and above.
pub const AMOUNT_TOO_LARGE: &str = "Amount too large";

/// One crore; the formatter stops below this.
pub const WORDS_LIMIT: u64 = 10_000_000;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// (divisor, magnitude word), largest first.
const MAGNITUDES: [(u64, &str); 3] = [(100_000, "Lakh"), (1_000, "Thousand"), (100, "Hundred")];

/// Convert a whole amount to words. `0` is "Zero"; one crore and above
/// yields [`AMOUNT_TOO_LARGE`].
pub fn number_to_words(amount: u64) -> String {
    if amount == 0 {
        return "Zero".to_string();
    }
    if amount >= WORDS_LIMIT {
        return AMOUNT_TOO_LARGE.to_string();
    }
    compose(amount)
}

fn compose(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return join(tens.to_string(), n % 10);
    }

    let (divisor, word) = MAGNITUDES
        .into_iter()
        .find(|(divisor, _)| n >= *divisor)
        .unwrap_or((100, "Hundred"));
    let head = format!("{} {}", compose(n / divisor), word);
    join(head, n % divisor)
}

fn join(head: String, rest: u64) -> String {
    if rest == 0 {
        head
    } else {
        format!("{} {}", head, compose(rest))
    }
}

/// Words for a money amount, rounded half away from zero to whole rupees,
/// as "Rupees ... Only". Negative amounts are prefixed with "Minus".
pub fn amount_in_words(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(whole) = rounded.abs().to_u64() else {
        return AMOUNT_TOO_LARGE.to_string();
    };

    let words = number_to_words(whole);
    if words == AMOUNT_TOO_LARGE {
        return words;
    }

    if rounded.is_sign_negative() && whole > 0 {
        format!("Minus Rupees {} Only", words)
    } else {
        format!("Rupees {} Only", words)
    }
}
