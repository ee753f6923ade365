//! Billing document payload (proforma or tax invoice) for a ledger record.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::BillingError;
use crate::models::{Discount, Invoice, InvoiceStatus, PlanAssignment, PricingPlan};
use crate::services::calculator::{calculate_with_rates, TaxBreakdown, TaxRates};
use crate::services::cycles::{find_cycle, group_cycles};
use crate::services::ledger::{CycleLedger, PaymentEntry};
use crate::services::period::{period_for_assignment, SubscriptionPeriod};
use crate::services::words::amount_in_words;

/// Proforma before any payment, tax invoice once money has been received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Proforma,
    TaxInvoice,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Proforma => "proforma",
            DocumentKind::TaxInvoice => "tax_invoice",
        }
    }

    pub fn for_status(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Pending => DocumentKind::Proforma,
            InvoiceStatus::PartiallyPaid | InvoiceStatus::Paid => DocumentKind::TaxInvoice,
        }
    }

    /// Kind for a stored record. A zero-total cycle (a trial) is settled from
    /// its opening record but never receives money, so it stays a proforma.
    pub fn for_record(record: &Invoice) -> Self {
        if record.total_amount.is_zero() {
            DocumentKind::Proforma
        } else {
            Self::for_status(record.status)
        }
    }
}

/// Everything a presentation layer needs to render one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDocument {
    pub kind: DocumentKind,
    pub document_number: String,
    pub invoice_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax_breakdown: TaxBreakdown,
    pub total: Decimal,
    pub total_in_words: String,
    pub subscription_period: SubscriptionPeriod,
    pub payment_history: Vec<PaymentEntry>,
    pub remaining_due: Decimal,
}

/// Inputs for [`assemble`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentRequest<'a> {
    pub history: &'a [Invoice],
    pub restaurant_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub plan: &'a PricingPlan,
    pub assignment: &'a PlanAssignment,
    pub rates: &'a TaxRates,
}

/// Assemble the document for `invoice_id` within the restaurant's history.
///
/// An unknown or absent `invoice_id` falls back to the latest record of the
/// most recent cycle. A restaurant without invoices is `NotFound`. Payment
/// history and remaining due are frozen at the target record, so reprinting
/// an older record never shows later payments.
pub fn assemble(request: DocumentRequest<'_>) -> Result<BillingDocument, BillingError> {
    let history: Vec<Invoice> = request
        .history
        .iter()
        .filter(|i| i.restaurant_id == request.restaurant_id)
        .cloned()
        .collect();

    let cycles = group_cycles(&history);
    let cycle = request
        .invoice_id
        .and_then(|id| find_cycle(&cycles, id))
        .or_else(|| cycles.last())
        .ok_or(BillingError::NotFound {
            restaurant_id: request.restaurant_id,
        })?;
    let ledger = CycleLedger::from_cycle(cycle).ok_or(BillingError::NotFound {
        restaurant_id: request.restaurant_id,
    })?;

    let record = ledger.resolve(request.invoice_id);
    if request.invoice_id.is_some_and(|id| id != record.invoice_id) {
        warn!(
            restaurant_id = %request.restaurant_id,
            requested_invoice_id = ?request.invoice_id,
            resolved_invoice_id = %record.invoice_id,
            "Invoice not in history, using latest record of the cycle"
        );
    }
    if record.pricing_plan_id != request.assignment.assignment_id {
        warn!(
            invoice_id = %record.invoice_id,
            pricing_plan_id = %record.pricing_plan_id,
            assignment_id = %request.assignment.assignment_id,
            "Document assignment does not match the invoice's cycle"
        );
    }

    let discount = record.discount_amount.unwrap_or(Decimal::ZERO);
    let tax_breakdown = calculate_with_rates(
        record.sub_total_amount,
        Discount::fixed(discount),
        request.assignment.tax,
        request.rates,
    );
    if tax_breakdown.total != record.total_amount {
        warn!(
            invoice_id = %record.invoice_id,
            stored_total = %record.total_amount,
            computed_total = %tax_breakdown.total,
            "Stored invoice total differs from recomputed total"
        );
    }

    let kind = DocumentKind::for_record(record);
    let document_number = match kind {
        DocumentKind::Proforma => record.proforma_number.clone(),
        DocumentKind::TaxInvoice => record
            .invoice_number
            .clone()
            .unwrap_or_else(|| record.proforma_number.clone()),
    };

    Ok(BillingDocument {
        kind,
        document_number,
        invoice_id: record.invoice_id,
        restaurant_id: record.restaurant_id,
        status: record.status,
        issued_at: record.created_at,
        due_date: record.due_date,
        subtotal: record.sub_total_amount,
        discount,
        tax_breakdown,
        total: record.total_amount,
        total_in_words: amount_in_words(record.total_amount),
        subscription_period: period_for_assignment(request.plan, request.assignment)?,
        payment_history: ledger.payment_history(request.invoice_id),
        remaining_due: ledger.remaining_due_at(request.invoice_id),
    })
}
