//! Proforma and tax-invoice numbering.
//!
//! Numbers take the form `{prefix}/{financial year}/{sequence}`, e.g.
//! `PI/2025-26/0007`. The sequence restarts every Indian financial year
//! (April to March) and is derived from the numbers already issued, so the
//! same history always yields the same next number.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Invoice;

/// Financial year label for a date, e.g. `2025-26` for 2025-04-01..=2026-03-31.
pub fn financial_year(date: NaiveDate) -> String {
    let start_year = if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{:02}", start_year, (start_year + 1).rem_euclid(100))
}

/// Number prefixes for the two document kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNumbering {
    pub proforma_prefix: String,
    pub invoice_prefix: String,
}

impl Default for DocumentNumbering {
    fn default() -> Self {
        Self {
            proforma_prefix: "PI".to_string(),
            invoice_prefix: "INV".to_string(),
        }
    }
}

impl DocumentNumbering {
    /// Next proforma number for `on`. `issued` must be the full set of issued
    /// invoices; numbers are unique only within the set they are drawn from.
    pub fn next_proforma_number(&self, issued: &[Invoice], on: NaiveDate) -> String {
        let numbers = issued.iter().map(|i| i.proforma_number.as_str());
        next_number(&self.proforma_prefix, numbers, on)
    }

    /// Next tax-invoice number for `on`, drawn from the same `issued` set.
    pub fn next_invoice_number(&self, issued: &[Invoice], on: NaiveDate) -> String {
        let numbers = issued.iter().filter_map(|i| i.invoice_number.as_deref());
        next_number(&self.invoice_prefix, numbers, on)
    }
}

pub fn format_number(prefix: &str, financial_year: &str, sequence: u32) -> String {
    format!("{}/{}/{:04}", prefix, financial_year, sequence)
}

/// Sequence part of `number` when it belongs to `prefix` and `financial_year`.
pub fn parse_sequence(number: &str, prefix: &str, financial_year: &str) -> Option<u32> {
    number
        .strip_prefix(prefix)?
        .strip_prefix('/')?
        .strip_prefix(financial_year)?
        .strip_prefix('/')?
        .parse()
        .ok()
}

fn next_number<'a>(prefix: &str, numbers: impl Iterator<Item = &'a str>, on: NaiveDate) -> String {
    let fy = financial_year(on);
    let highest = numbers
        .filter_map(|n| parse_sequence(n, prefix, &fy))
        .max()
        .unwrap_or(0);
    format_number(prefix, &fy, highest + 1)
}
