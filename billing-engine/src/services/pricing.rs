//! Plan pricing: what an assignment bills before discount and tax.

use rust_decimal::Decimal;

use crate::models::{Discount, PlanAssignment, PlanKind, PricingPlan};
use crate::services::calculator::{calculate_with_rates, TaxBreakdown, TaxRates};

/// List price of a plan: fixed price for fixed plans, base price for metered
/// plans, base price plus the fixed top-up for hybrid plans.
pub fn plan_subtotal(plan: &PricingPlan) -> Decimal {
    match &plan.kind {
        PlanKind::Fixed { fixed_price } => *fixed_price,
        PlanKind::Metered { .. } => plan.base_price,
        PlanKind::Hybrid { fixed_price, .. } => plan.base_price + *fixed_price,
    }
}

/// Totals for a new cycle of `assignment`. Trial assignments bill nothing, and
/// their discount is ignored so the total stays at zero.
pub fn quote(plan: &PricingPlan, assignment: &PlanAssignment, rates: &TaxRates) -> TaxBreakdown {
    if assignment.is_trial() {
        return calculate_with_rates(Decimal::ZERO, Discount::none(), assignment.tax, rates);
    }
    calculate_with_rates(plan_subtotal(plan), assignment.discount(), assignment.tax, rates)
}
