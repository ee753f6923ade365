//! Invoice ledger record model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "partially paid")]
    PartiallyPaid,
    #[serde(rename = "paid")]
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::PartiallyPaid => "partially paid",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Derive the status from a cycle total and the amount paid so far.
    pub fn derive(total: Decimal, paid: Decimal) -> Self {
        if paid >= total {
            InvoiceStatus::Paid
        } else if paid > Decimal::ZERO {
            InvoiceStatus::PartiallyPaid
        } else {
            InvoiceStatus::Pending
        }
    }
}

/// One ledger record: either the opening bill of a cycle or a payment entry.
/// Records are appended, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub restaurant_id: Uuid,
    /// Plan assignment this record bills; the cycle boundary key.
    pub pricing_plan_id: Uuid,
    pub proforma_number: String,
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub sub_total_amount: Decimal,
    #[serde(default)]
    pub discount_amount: Option<Decimal>,
    pub total_amount: Decimal,
    /// Amount paid by this record alone.
    #[serde(default)]
    pub partial_amount: Decimal,
    /// Outstanding balance after this record; `None` when never computed.
    #[serde(default)]
    pub remaining_amount: Option<Decimal>,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn is_payment(&self) -> bool {
        self.partial_amount > Decimal::ZERO
    }
}

/// Input for recording a payment against a cycle.
#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}
