//! Domain models for billing-engine.

mod assignment;
mod business;
mod invoice;
mod plan;

pub use assignment::{Discount, DiscountType, PlanAssignment, PlanMode, TaxFlags};
pub use business::{Business, DashboardFilter, Outlet};
pub use invoice::{Invoice, InvoiceStatus, RecordPayment};
pub use plan::{PlanKind, PricingPlan, ProductCredit};
