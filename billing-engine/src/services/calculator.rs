//! Discount and GST arithmetic.
//!
//! The order is fixed: the discount is applied to the subtotal first, then each
//! flagged GST component is computed independently off the discounted amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Discount, DiscountType, TaxFlags};

/// GST rates in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRates {
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            cgst: Decimal::from(9),
            sgst: Decimal::from(9),
            igst: Decimal::from(18),
        }
    }
}

/// Result of a total computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub discounted: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    pub total_tax: Decimal,
    pub total: Decimal,
}

fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}

/// Apply a discount. A discount larger than the subtotal yields a negative amount.
pub fn apply_discount(subtotal: Decimal, discount: Discount) -> Decimal {
    match discount.discount_type {
        DiscountType::Percent => subtotal - percent_of(subtotal, discount.value),
        DiscountType::Fixed => subtotal - discount.value,
    }
}

/// Compute totals with the standard 9/9/18 GST rates.
pub fn calculate(subtotal: Decimal, discount: Discount, flags: TaxFlags) -> TaxBreakdown {
    calculate_with_rates(subtotal, discount, flags, &TaxRates::default())
}

/// Compute totals. LUT is declarative only and never suppresses a flagged component.
pub fn calculate_with_rates(
    subtotal: Decimal,
    discount: Discount,
    flags: TaxFlags,
    rates: &TaxRates,
) -> TaxBreakdown {
    let discounted = apply_discount(subtotal, discount);

    let component = |enabled: bool, rate: Decimal| {
        if enabled {
            percent_of(discounted, rate)
        } else {
            Decimal::ZERO
        }
    };

    let cgst_amount = component(flags.cgst, rates.cgst);
    let sgst_amount = component(flags.sgst, rates.sgst);
    let igst_amount = component(flags.igst, rates.igst);
    let total_tax = cgst_amount + sgst_amount + igst_amount;

    TaxBreakdown {
        subtotal,
        discount_amount: subtotal - discounted,
        discounted,
        cgst_amount,
        sgst_amount,
        igst_amount,
        total_tax,
        total: discounted + total_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn flags(cgst: bool, sgst: bool, igst: bool, lut: bool) -> TaxFlags {
        TaxFlags {
            cgst,
            sgst,
            igst,
            lut,
        }
    }

    #[test]
    fn test_percent_discount_then_intra_state_gst() {
        let result = calculate(
            dec("1000"),
            Discount::percent(dec("10")),
            flags(true, true, false, false),
        );
        assert_eq!(result.discounted, dec("900"));
        assert_eq!(result.discount_amount, dec("100"));
        assert_eq!(result.cgst_amount, dec("81"));
        assert_eq!(result.sgst_amount, dec("81"));
        assert_eq!(result.igst_amount, Decimal::ZERO);
        assert_eq!(result.total_tax, dec("162"));
        assert_eq!(result.total, dec("1062"));
    }

    #[test]
    fn test_fixed_discount_then_igst() {
        let result = calculate(
            dec("2500"),
            Discount::fixed(dec("500")),
            flags(false, false, true, false),
        );
        assert_eq!(result.discounted, dec("2000"));
        assert_eq!(result.igst_amount, dec("360"));
        assert_eq!(result.total, dec("2360"));
    }

    #[test]
    fn test_components_are_not_mutually_exclusive() {
        let result = calculate(dec("100"), Discount::none(), flags(true, true, true, false));
        assert_eq!(result.total_tax, dec("36"));
        assert_eq!(result.total, dec("136"));
    }

    #[test]
    fn test_no_flags_total_equals_discounted() {
        for discount in [
            Discount::none(),
            Discount::percent(dec("12.5")),
            Discount::fixed(dec("49.99")),
        ] {
            let result = calculate(dec("1499.50"), discount, TaxFlags::default());
            assert_eq!(result.total, result.discounted);
            assert_eq!(result.total_tax, Decimal::ZERO);
        }
    }

    #[test]
    fn test_lut_does_not_zero_flagged_components() {
        let result = calculate(dec("1000"), Discount::none(), flags(false, false, true, true));
        assert_eq!(result.igst_amount, dec("180"));

        let lut_only = calculate(dec("1000"), Discount::none(), flags(false, false, false, true));
        assert_eq!(lut_only.total, dec("1000"));
    }

    #[test]
    fn test_discount_larger_than_subtotal_is_not_clamped() {
        let result = calculate(
            dec("100"),
            Discount::fixed(dec("150")),
            flags(true, true, false, false),
        );
        assert_eq!(result.discounted, dec("-50"));
        assert_eq!(result.cgst_amount, dec("-4.5"));
        assert_eq!(result.total, dec("-59"));
    }

    #[test]
    fn test_custom_rates() {
        let rates = TaxRates {
            cgst: dec("6"),
            sgst: dec("6"),
            igst: dec("12"),
        };
        let result = calculate_with_rates(
            dec("200"),
            Discount::none(),
            flags(true, true, false, false),
            &rates,
        );
        assert_eq!(result.total, dec("224"));
    }

    #[test]
    fn test_repeat_calls_are_identical() {
        let first = calculate(dec("333.33"), Discount::percent(dec("7")), flags(true, true, false, false));
        let second = calculate(dec("333.33"), Discount::percent(dec("7")), flags(true, true, false, false));
        assert_eq!(first, second);
        assert_eq!(first.total.to_string(), second.total.to_string());
    }
}
