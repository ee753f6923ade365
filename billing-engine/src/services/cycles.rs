//! Groups a restaurant's invoice history into billing cycles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Invoice;

/// A contiguous run of records sharing one plan assignment, in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCycle {
    pub pricing_plan_id: Uuid,
    pub records: Vec<Invoice>,
}

impl BillingCycle {
    /// The opening bill of the cycle.
    pub fn opening(&self) -> Option<&Invoice> {
        self.records.first()
    }

    /// The most recently created record; the cycle's current state.
    pub fn latest(&self) -> Option<&Invoice> {
        self.records.last()
    }

    pub fn contains(&self, invoice_id: Uuid) -> bool {
        self.records.iter().any(|r| r.invoice_id == invoice_id)
    }
}

/// Sort records by `created_at` (stable, so equal timestamps keep input order).
pub fn sort_by_creation(invoices: &[Invoice]) -> Vec<Invoice> {
    let mut sorted = invoices.to_vec();
    sorted.sort_by_key(|invoice| invoice.created_at);
    sorted
}

/// Partition history into cycles. A new cycle starts whenever a record's
/// `pricing_plan_id` differs from the record before it, regardless of time gaps.
pub fn group_cycles(invoices: &[Invoice]) -> Vec<BillingCycle> {
    let mut cycles: Vec<BillingCycle> = Vec::new();

    for invoice in sort_by_creation(invoices) {
        match cycles.last_mut() {
            Some(open) if open.pricing_plan_id == invoice.pricing_plan_id => {
                open.records.push(invoice);
            }
            _ => cycles.push(BillingCycle {
                pricing_plan_id: invoice.pricing_plan_id,
                records: vec![invoice],
            }),
        }
    }

    cycles
}

/// The cycle holding `invoice_id`, if any.
pub fn find_cycle(cycles: &[BillingCycle], invoice_id: Uuid) -> Option<&BillingCycle> {
    cycles.iter().find(|cycle| cycle.contains(invoice_id))
}
