//! Dashboard aggregation and restaurant table tests.

mod common;

use billing_engine::models::{Business, DashboardFilter, InvoiceStatus, Outlet};
use billing_engine::services::dashboard::{latest_per_proforma, restaurant_cycle_rows, summarize};
use billing_engine::BillingEngine;
use common::{at, date, dec, id, invoice, ledger_records, OTHER_RESTAURANT_ID, TEST_RESTAURANT_ID};

fn with_proforma(
    mut record: billing_engine::models::Invoice,
    proforma: &str,
    status: InvoiceStatus,
) -> billing_engine::models::Invoice {
    record.proforma_number = proforma.to_string();
    record.status = status;
    record
}

#[test]
fn latest_record_per_proforma_decides_the_bucket() {
    let invoices = vec![
        with_proforma(invoice(2, 10, "2025-03-02T10:00:00Z"), "P-1", InvoiceStatus::Paid),
        with_proforma(invoice(1, 10, "2025-03-01T10:00:00Z"), "P-1", InvoiceStatus::Pending),
    ];

    let summary = summarize(&invoices, &[], &[], &DashboardFilter::default());

    assert_eq!(summary.paid_count, 1);
    assert_eq!(summary.pending_count, 0);
    assert_eq!(summary.paid[0].invoice_id, id(2));
}

#[test]
fn partially_paid_counts_in_both_buckets() {
    let invoices = vec![
        with_proforma(invoice(1, 10, "2025-03-01T10:00:00Z"), "P-1", InvoiceStatus::PartiallyPaid),
        with_proforma(invoice(2, 11, "2025-03-01T10:00:00Z"), "P-2", InvoiceStatus::Pending),
        with_proforma(invoice(3, 12, "2025-03-01T10:00:00Z"), "P-3", InvoiceStatus::Paid),
    ];

    let summary = summarize(&invoices, &[], &[], &DashboardFilter::default());

    assert_eq!(summary.paid_count, 2);
    assert_eq!(summary.pending_count, 2);
}

#[test]
fn date_range_is_inclusive_of_whole_days() {
    let invoices = vec![
        with_proforma(invoice(1, 10, "2025-03-01T00:00:00Z"), "P-1", InvoiceStatus::Pending),
        with_proforma(invoice(2, 11, "2025-03-31T23:59:59Z"), "P-2", InvoiceStatus::Pending),
        with_proforma(invoice(3, 12, "2025-04-01T00:00:00Z"), "P-3", InvoiceStatus::Pending),
        with_proforma(invoice(4, 13, "2025-02-28T23:59:59Z"), "P-4", InvoiceStatus::Pending),
    ];
    let filter = DashboardFilter {
        start_date: Some(date("2025-03-01")),
        end_date: Some(date("2025-03-31")),
    };

    let summary = summarize(&invoices, &[], &[], &filter);

    assert_eq!(summary.pending_count, 2);
    let ids: Vec<_> = summary.pending.iter().map(|i| i.invoice_id).collect();
    assert_eq!(ids, vec![id(1), id(2)]);
}

#[test]
fn filtering_happens_before_picking_the_latest_record() {
    let invoices = vec![
        with_proforma(invoice(1, 10, "2025-03-01T10:00:00Z"), "P-1", InvoiceStatus::Pending),
        with_proforma(invoice(2, 10, "2025-04-02T10:00:00Z"), "P-1", InvoiceStatus::Paid),
    ];
    let filter = DashboardFilter {
        start_date: None,
        end_date: Some(date("2025-03-31")),
    };

    let summary = summarize(&invoices, &[], &[], &filter);

    assert_eq!(summary.pending_count, 1);
    assert_eq!(summary.paid_count, 0);
}

#[test]
fn equal_timestamps_pick_the_later_input_record() {
    let invoices = vec![
        with_proforma(invoice(1, 10, "2025-03-01T10:00:00Z"), "P-1", InvoiceStatus::Pending),
        with_proforma(invoice(2, 10, "2025-03-01T10:00:00Z"), "P-1", InvoiceStatus::Paid),
    ];

    let latest = latest_per_proforma(&invoices);

    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].invoice_id, id(2));
}

#[test]
fn reused_proforma_numbers_stay_per_restaurant() {
    let mut foreign = with_proforma(
        invoice(2, 11, "2025-03-02T10:00:00Z"),
        "P-1",
        InvoiceStatus::Pending,
    );
    foreign.restaurant_id = id(OTHER_RESTAURANT_ID);
    let invoices = vec![
        with_proforma(invoice(1, 10, "2025-03-01T10:00:00Z"), "P-1", InvoiceStatus::Pending),
        foreign,
    ];

    let latest = latest_per_proforma(&invoices);
    assert_eq!(latest.len(), 2);

    let summary = summarize(&invoices, &[], &[], &DashboardFilter::default());
    assert_eq!(summary.pending_count, 2);
}

#[test]
fn business_and_outlet_counts_follow_the_range() {
    let businesses = vec![
        Business {
            business_id: id(1),
            name: "Spice Route Hospitality".to_string(),
            created_at: at("2025-01-10T10:00:00Z"),
        },
        Business {
            business_id: id(2),
            name: "Chai Point Foods".to_string(),
            created_at: at("2025-03-10T10:00:00Z"),
        },
    ];
    let outlets = vec![Outlet {
        restaurant_id: id(TEST_RESTAURANT_ID),
        business_id: id(2),
        brand_id: None,
        name: "Indiranagar".to_string(),
        created_at: at("2025-03-11T10:00:00Z"),
    }];
    let filter = DashboardFilter {
        start_date: Some(date("2025-03-01")),
        end_date: None,
    };

    let summary = BillingEngine::default().dashboard(&[], &businesses, &outlets, &filter);

    assert_eq!(summary.business_count, 1);
    assert_eq!(summary.outlet_count, 1);
    assert_eq!(summary.paid_count, 0);
}

#[test]
fn restaurant_rows_show_one_row_per_cycle() {
    let mut invoices = ledger_records("1000", &["300"]);
    let mut next_cycle = invoice(7, 11, "2025-08-01T09:00:00Z");
    next_cycle.proforma_number = "PI/2025-26/0011".to_string();
    invoices.push(next_cycle);
    let mut foreign = invoice(8, 12, "2025-08-01T09:00:00Z");
    foreign.restaurant_id = id(OTHER_RESTAURANT_ID);
    invoices.push(foreign);

    let rows = restaurant_cycle_rows(&invoices, id(TEST_RESTAURANT_ID));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, InvoiceStatus::PartiallyPaid);
    assert!(rows[0].counts_as_pending);
    assert_eq!(rows[0].paid_to_date, dec("300"));
    assert_eq!(rows[0].remaining, dec("700"));
    assert_eq!(rows[0].invoice_number.as_deref(), Some("INV/2025-26/0001"));
    assert_eq!(rows[1].proforma_number, "PI/2025-26/0011");
    assert_eq!(rows[1].status, InvoiceStatus::Pending);
}
