//! Services module for billing-engine.

pub mod calculator;
pub mod cycles;
pub mod dashboard;
pub mod document;
pub mod ledger;
pub mod metrics;
pub mod numbering;
pub mod period;
pub mod pricing;
pub mod words;

pub use calculator::{calculate, calculate_with_rates, TaxBreakdown, TaxRates};
pub use cycles::{group_cycles, BillingCycle};
pub use dashboard::{CycleRow, DashboardSummary};
pub use document::{BillingDocument, DocumentKind};
pub use ledger::{CycleLedger, LedgerEntry, PaymentEntry};
pub use metrics::{get_metrics, init_metrics};
pub use numbering::DocumentNumbering;
pub use period::{resolve_period, SubscriptionPeriod};
pub use words::{amount_in_words, number_to_words, AMOUNT_TOO_LARGE};
