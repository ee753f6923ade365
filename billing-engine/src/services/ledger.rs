//! Payment waterfall over a billing cycle.
//!
//! A cycle's ledger is its records in creation order. The first record is the
//! opening bill and fixes the cycle total; every later record carries the
//! amount paid by that record alone. Paid-to-date, remaining balance and status
//! are derived on read from the running sum, never trusted from storage.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BillingError;
use crate::models::{Invoice, InvoiceStatus, PlanAssignment, RecordPayment};
use crate::services::calculator::TaxBreakdown;
use crate::services::cycles::BillingCycle;

/// Derived state immediately after one ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub invoice_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub partial_amount: Decimal,
    pub paid_to_date: Decimal,
    pub remaining_amount: Decimal,
    pub status: InvoiceStatus,
}

/// One payment as shown on a billing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub invoice_id: Uuid,
    pub invoice_number: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub remaining_after: Decimal,
}

/// A stored record whose balance or status disagrees with the derived ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub invoice_id: Uuid,
    pub stored_remaining: Option<Decimal>,
    pub derived_remaining: Decimal,
    pub stored_status: InvoiceStatus,
    pub derived_status: InvoiceStatus,
}

fn remaining(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

/// Derived view over one cycle.
#[derive(Debug, Clone)]
pub struct CycleLedger {
    total: Decimal,
    records: Vec<Invoice>,
    entries: Vec<LedgerEntry>,
}

impl CycleLedger {
    /// Build the ledger for a cycle; `None` for a cycle without records.
    pub fn from_cycle(cycle: &BillingCycle) -> Option<Self> {
        let total = cycle.opening()?.total_amount;

        let mut paid = Decimal::ZERO;
        let entries = cycle
            .records
            .iter()
            .map(|record| {
                paid += record.partial_amount;
                LedgerEntry {
                    invoice_id: record.invoice_id,
                    created_at: record.created_at,
                    partial_amount: record.partial_amount,
                    paid_to_date: paid,
                    remaining_amount: remaining(total, paid),
                    status: InvoiceStatus::derive(total, paid),
                }
            })
            .collect();

        Some(Self {
            total,
            records: cycle.records.clone(),
            entries,
        })
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn records(&self) -> &[Invoice] {
        &self.records
    }

    fn last_entry(&self) -> &LedgerEntry {
        // from_cycle refuses empty cycles
        &self.entries[self.entries.len() - 1]
    }

    pub fn latest(&self) -> &Invoice {
        &self.records[self.records.len() - 1]
    }

    pub fn opening(&self) -> &Invoice {
        &self.records[0]
    }

    pub fn paid_to_date(&self) -> Decimal {
        self.last_entry().paid_to_date
    }

    pub fn remaining(&self) -> Decimal {
        self.last_entry().remaining_amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.last_entry().status
    }

    pub fn is_settled(&self) -> bool {
        self.status() == InvoiceStatus::Paid
    }

    /// Tax-invoice number already issued in this cycle, if any.
    pub fn invoice_number(&self) -> Option<&str> {
        self.records
            .iter()
            .rev()
            .find_map(|r| r.invoice_number.as_deref())
    }

    /// Position of `invoice_id`, falling back to the latest record when the id
    /// is absent from the cycle.
    fn position(&self, invoice_id: Option<Uuid>) -> usize {
        invoice_id
            .and_then(|id| self.records.iter().position(|r| r.invoice_id == id))
            .unwrap_or(self.records.len() - 1)
    }

    /// The record a document should describe.
    pub fn resolve(&self, invoice_id: Option<Uuid>) -> &Invoice {
        &self.records[self.position(invoice_id)]
    }

    /// Payments made up to and including the target record.
    pub fn payment_history(&self, invoice_id: Option<Uuid>) -> Vec<PaymentEntry> {
        let end = self.position(invoice_id);
        self.records[..=end]
            .iter()
            .zip(&self.entries)
            .filter(|(record, _)| record.is_payment())
            .map(|(record, entry)| PaymentEntry {
                invoice_id: record.invoice_id,
                invoice_number: record.invoice_number.clone(),
                payment_date: record.payment_date,
                amount: record.partial_amount,
                remaining_after: entry.remaining_amount,
            })
            .collect()
    }

    /// Balance as of the target record: its stored remaining amount, or the
    /// derived balance at that point when none was stored.
    pub fn remaining_due_at(&self, invoice_id: Option<Uuid>) -> Decimal {
        let position = self.position(invoice_id);
        self.records[position]
            .remaining_amount
            .unwrap_or(self.entries[position].remaining_amount)
    }

    /// Records whose stored balance or status differs from the derived ledger.
    pub fn discrepancies(&self) -> Vec<Discrepancy> {
        self.records
            .iter()
            .zip(&self.entries)
            .filter(|(record, entry)| {
                record.status != entry.status
                    || record
                        .remaining_amount
                        .is_some_and(|stored| stored != entry.remaining_amount)
            })
            .map(|(record, entry)| Discrepancy {
                invoice_id: record.invoice_id,
                stored_remaining: record.remaining_amount,
                derived_remaining: entry.remaining_amount,
                stored_status: record.status,
                derived_status: entry.status,
            })
            .collect()
    }

    /// Reject a payment the cycle cannot accept.
    pub fn check_payment(&self, payment: &RecordPayment) -> Result<(), BillingError> {
        let reject = |reason: String| BillingError::InvalidPayment {
            amount: payment.amount,
            reason,
        };

        if payment.amount <= Decimal::ZERO {
            return Err(reject("amount must be positive".to_string()));
        }
        if self.is_settled() {
            return Err(reject("cycle is already settled".to_string()));
        }
        if payment.amount > self.remaining() {
            return Err(reject(format!(
                "exceeds remaining balance {}",
                self.remaining()
            )));
        }
        if payment.recorded_at < self.latest().created_at {
            return Err(reject(format!(
                "recorded at {} before the latest ledger entry at {}",
                payment.recorded_at,
                self.latest().created_at
            )));
        }
        Ok(())
    }

    /// Build the record to append for `payment`, after the running-total guard.
    pub fn record_payment(
        &self,
        payment: &RecordPayment,
        invoice_number: String,
    ) -> Result<Invoice, BillingError> {
        self.check_payment(payment)?;

        let opening = self.opening();
        let paid = self.paid_to_date() + payment.amount;

        Ok(Invoice {
            invoice_id: Uuid::new_v4(),
            restaurant_id: opening.restaurant_id,
            pricing_plan_id: opening.pricing_plan_id,
            proforma_number: opening.proforma_number.clone(),
            invoice_number: Some(invoice_number),
            sub_total_amount: opening.sub_total_amount,
            discount_amount: opening.discount_amount,
            total_amount: self.total,
            partial_amount: payment.amount,
            remaining_amount: Some(remaining(self.total, paid)),
            status: InvoiceStatus::derive(self.total, paid),
            payment_date: Some(payment.payment_date),
            due_date: opening.due_date,
            created_at: payment.recorded_at,
        })
    }
}

/// Opening record of a new cycle for `assignment`.
pub fn opening_record(
    assignment: &PlanAssignment,
    breakdown: &TaxBreakdown,
    proforma_number: String,
    created_at: DateTime<Utc>,
    payment_terms_days: u32,
) -> Invoice {
    let discount_amount = if breakdown.discount_amount.is_zero() {
        None
    } else {
        Some(breakdown.discount_amount)
    };

    Invoice {
        invoice_id: Uuid::new_v4(),
        restaurant_id: assignment.restaurant_id,
        pricing_plan_id: assignment.assignment_id,
        proforma_number,
        invoice_number: None,
        sub_total_amount: breakdown.subtotal,
        discount_amount,
        total_amount: breakdown.total,
        partial_amount: Decimal::ZERO,
        remaining_amount: Some(remaining(breakdown.total, Decimal::ZERO)),
        status: InvoiceStatus::derive(breakdown.total, Decimal::ZERO),
        payment_date: None,
        due_date: created_at
            .date_naive()
            .checked_add_days(Days::new(u64::from(payment_terms_days))),
        created_at,
    }
}
