//! Test helper module for billing-engine integration tests.
//!
//! Provides record fixtures built the way collaborators hand them to the engine.

#![allow(dead_code)]

use billing_engine::models::{
    Discount, Invoice, InvoiceStatus, PlanAssignment, PlanKind, PlanMode, PricingPlan,
    ProductCredit, TaxFlags,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

// Test constants
pub const TEST_RESTAURANT_ID: u128 = 0x2222;
pub const OTHER_RESTAURANT_ID: u128 = 0x3333;
pub const TEST_PLAN_ID: u128 = 0x4444;
pub const TEST_ASSIGNMENT_ID: u128 = 10;

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal")
}

pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

/// Pending opening record with a 1000 total.
pub fn invoice(invoice_id: u128, pricing_plan_id: u128, created_at: &str) -> Invoice {
    Invoice {
        invoice_id: id(invoice_id),
        restaurant_id: id(TEST_RESTAURANT_ID),
        pricing_plan_id: id(pricing_plan_id),
        proforma_number: format!("PI/2025-26/{:04}", pricing_plan_id),
        invoice_number: None,
        sub_total_amount: dec("1000"),
        discount_amount: None,
        total_amount: dec("1000"),
        partial_amount: Decimal::ZERO,
        remaining_amount: Some(dec("1000")),
        status: InvoiceStatus::Pending,
        payment_date: None,
        due_date: None,
        created_at: at(created_at),
    }
}

/// One cycle: an opening record for `total` followed by one record per
/// partial payment, a day apart, with stored balances as the engine writes them.
pub fn ledger_records(total: &str, partials: &[&str]) -> Vec<Invoice> {
    let total = dec(total);
    let mut opening = invoice(1, TEST_ASSIGNMENT_ID, "2025-05-01T09:00:00Z");
    opening.sub_total_amount = total;
    opening.total_amount = total;
    opening.remaining_amount = Some(total);

    let mut records = vec![opening.clone()];
    let mut paid = Decimal::ZERO;
    for (n, partial) in partials.iter().enumerate() {
        let amount = dec(partial);
        paid += amount;
        let day = n as u32 + 2;
        records.push(Invoice {
            invoice_id: id(100 + n as u128),
            invoice_number: Some("INV/2025-26/0001".to_string()),
            partial_amount: amount,
            remaining_amount: Some((total - paid).max(Decimal::ZERO)),
            status: InvoiceStatus::derive(total, paid),
            payment_date: Some(date(&format!("2025-05-{:02}", day))),
            created_at: at(&format!("2025-05-{:02}T09:00:00Z", day)),
            ..opening.clone()
        });
    }
    records
}

pub fn fixed_plan(price: &str, validity: i32) -> PricingPlan {
    PricingPlan {
        plan_id: id(TEST_PLAN_ID),
        plan_name: "Outlet POS Standard".to_string(),
        description: Some("Single terminal licence".to_string()),
        kind: PlanKind::Fixed {
            fixed_price: dec(price),
        },
        base_price: Decimal::ZERO,
        credits_included: 0,
        validity,
        included_products: vec![],
        created_at: at("2025-01-01T00:00:00Z"),
    }
}

pub fn hybrid_plan(base: &str, top_up: &str) -> PricingPlan {
    PricingPlan {
        kind: PlanKind::Hybrid {
            fixed_price: dec(top_up),
            metered_products: vec![ProductCredit {
                product_id: id(0x9001),
                credits: 500,
            }],
        },
        base_price: dec(base),
        credits_included: 100,
        ..fixed_plan("0", 12)
    }
}

pub fn live_assignment(created_at: &str) -> PlanAssignment {
    PlanAssignment {
        assignment_id: id(TEST_ASSIGNMENT_ID),
        restaurant_id: id(TEST_RESTAURANT_ID),
        pricing_plan_id: id(TEST_PLAN_ID),
        tax: TaxFlags {
            cgst: true,
            sgst: true,
            igst: false,
            lut: false,
        },
        plan_mode: PlanMode::Live,
        trial_days: None,
        start_date: at(created_at).date_naive(),
        custom_duration: None,
        discount: Some(Discount::percent(dec("10"))),
        created_at: at(created_at),
    }
}

pub fn trial_assignment(created_at: &str, days: i32) -> PlanAssignment {
    PlanAssignment {
        plan_mode: PlanMode::Trial,
        trial_days: Some(days),
        ..live_assignment(created_at)
    }
}
