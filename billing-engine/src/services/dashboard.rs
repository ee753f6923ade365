//! Dashboard and per-restaurant reporting over invoice history.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Business, DashboardFilter, Invoice, InvoiceStatus, Outlet};
use crate::services::cycles::{group_cycles, sort_by_creation};
use crate::services::ledger::CycleLedger;

/// Paid/pending classification for the selected range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub paid_count: usize,
    pub pending_count: usize,
    pub business_count: usize,
    pub outlet_count: usize,
    pub paid: Vec<Invoice>,
    pub pending: Vec<Invoice>,
}

/// One row of a restaurant's billing table, one per cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRow {
    pub pricing_plan_id: Uuid,
    pub proforma_number: String,
    pub invoice_number: Option<String>,
    pub total: Decimal,
    pub paid_to_date: Decimal,
    pub remaining: Decimal,
    pub status: InvoiceStatus,
    /// True for anything not fully paid, partially paid included.
    pub counts_as_pending: bool,
    pub last_activity: DateTime<Utc>,
}

/// Inclusive instant bounds: start of the first day, end of the last day.
pub fn date_bounds(filter: &DashboardFilter) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = filter.start_date.map(start_of_day);
    let to = filter.end_date.map(end_of_day);
    (from, to)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
        .and_utc()
}

fn within(at: DateTime<Utc>, bounds: &(Option<DateTime<Utc>>, Option<DateTime<Utc>>)) -> bool {
    bounds.0.map_or(true, |from| at >= from) && bounds.1.map_or(true, |to| at <= to)
}

pub fn filter_invoices(invoices: &[Invoice], filter: &DashboardFilter) -> Vec<Invoice> {
    let bounds = date_bounds(filter);
    invoices
        .iter()
        .filter(|invoice| within(invoice.created_at, &bounds))
        .cloned()
        .collect()
}

/// Most recently created record per proforma number, ordered by restaurant
/// then proforma number. Numbers are scoped to their restaurant so two cycles
/// never merge on a reused number. Equal timestamps resolve to the record later
/// in input order.
pub fn latest_per_proforma(invoices: &[Invoice]) -> Vec<Invoice> {
    let mut latest: BTreeMap<(Uuid, String), Invoice> = BTreeMap::new();
    for invoice in sort_by_creation(invoices) {
        latest.insert((invoice.restaurant_id, invoice.proforma_number.clone()), invoice);
    }
    latest.into_values().collect()
}

/// Summary counts. Partially paid records land in both buckets: they count
/// as recognised revenue and as outstanding.
pub fn summarize(
    invoices: &[Invoice],
    businesses: &[Business],
    outlets: &[Outlet],
    filter: &DashboardFilter,
) -> DashboardSummary {
    let bounds = date_bounds(filter);
    let latest = latest_per_proforma(&filter_invoices(invoices, filter));

    let paid: Vec<Invoice> = latest
        .iter()
        .filter(|i| matches!(i.status, InvoiceStatus::Paid | InvoiceStatus::PartiallyPaid))
        .cloned()
        .collect();
    let pending: Vec<Invoice> = latest
        .iter()
        .filter(|i| matches!(i.status, InvoiceStatus::Pending | InvoiceStatus::PartiallyPaid))
        .cloned()
        .collect();

    DashboardSummary {
        paid_count: paid.len(),
        pending_count: pending.len(),
        business_count: businesses
            .iter()
            .filter(|b| within(b.created_at, &bounds))
            .count(),
        outlet_count: outlets
            .iter()
            .filter(|o| within(o.created_at, &bounds))
            .count(),
        paid,
        pending,
    }
}

/// Billing table for one restaurant, oldest cycle first.
pub fn restaurant_cycle_rows(invoices: &[Invoice], restaurant_id: Uuid) -> Vec<CycleRow> {
    let history: Vec<Invoice> = invoices
        .iter()
        .filter(|i| i.restaurant_id == restaurant_id)
        .cloned()
        .collect();

    group_cycles(&history)
        .iter()
        .filter_map(CycleLedger::from_cycle)
        .map(|ledger| {
            let latest = ledger.latest();
            CycleRow {
                pricing_plan_id: latest.pricing_plan_id,
                proforma_number: latest.proforma_number.clone(),
                invoice_number: ledger.invoice_number().map(str::to_string),
                total: ledger.total(),
                paid_to_date: ledger.paid_to_date(),
                remaining: ledger.remaining(),
                status: latest.status,
                counts_as_pending: latest.status != InvoiceStatus::Paid,
                last_activity: latest.created_at,
            }
        })
        .collect()
}
