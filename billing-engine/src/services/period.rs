//! Subscription period resolution.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;
use crate::models::{PlanAssignment, PricingPlan};

const MONTH_LABEL: &str = "%B %Y";
const DAY_LABEL: &str = "%-d %B %Y";

/// Inclusive subscription period with display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_label: String,
    pub end_label: String,
}

impl SubscriptionPeriod {
    pub fn label(&self) -> String {
        format!("{} - {}", self.start_label, self.end_label)
    }
}

/// Months billed: the custom duration when positive, else the plan validity.
pub fn effective_duration(validity: i32, custom_duration: Option<i32>) -> Result<u32, BillingError> {
    if validity <= 0 {
        return Err(BillingError::InvalidDuration(format!(
            "plan validity must be at least one month (got {})",
            validity
        )));
    }
    match custom_duration {
        Some(months) if months < 0 => Err(BillingError::InvalidDuration(format!(
            "custom duration cannot be negative (got {})",
            months
        ))),
        Some(months) if months > 0 => Ok(months as u32),
        _ => Ok(validity as u32),
    }
}

/// Month-granular period anchored at `created_at`. The end month is
/// `created_at + (duration - 1)` months, so a one-month duration starts and
/// ends in the same month.
pub fn resolve_period(
    created_at: NaiveDate,
    validity: i32,
    custom_duration: Option<i32>,
) -> Result<SubscriptionPeriod, BillingError> {
    let duration = effective_duration(validity, custom_duration)?;

    let start = created_at.with_day(1).unwrap_or(created_at);
    let end = start
        .checked_add_months(Months::new(duration - 1))
        .ok_or_else(|| {
            BillingError::InvalidDuration(format!("{} months from {} is out of range", duration, start))
        })?;

    Ok(SubscriptionPeriod {
        start,
        end,
        start_label: start.format(MONTH_LABEL).to_string(),
        end_label: end.format(MONTH_LABEL).to_string(),
    })
}

/// Day-granular trial window `[start_date, start_date + trial_days - 1]`.
pub fn resolve_trial_period(
    start_date: NaiveDate,
    trial_days: i32,
) -> Result<SubscriptionPeriod, BillingError> {
    if trial_days <= 0 {
        return Err(BillingError::InvalidDuration(format!(
            "trial days must be positive (got {})",
            trial_days
        )));
    }

    let end = start_date
        .checked_add_days(Days::new(trial_days as u64 - 1))
        .ok_or_else(|| {
            BillingError::InvalidDuration(format!("{} trial days from {} is out of range", trial_days, start_date))
        })?;

    Ok(SubscriptionPeriod {
        start: start_date,
        end,
        start_label: start_date.format(DAY_LABEL).to_string(),
        end_label: end.format(DAY_LABEL).to_string(),
    })
}

/// Period covered by an assignment: the trial window for trial assignments,
/// otherwise the month range anchored at the assignment's creation date.
pub fn period_for_assignment(
    plan: &PricingPlan,
    assignment: &PlanAssignment,
) -> Result<SubscriptionPeriod, BillingError> {
    match (assignment.is_trial(), assignment.trial_days) {
        (true, Some(days)) => resolve_trial_period(assignment.start_date, days),
        (true, None) => Err(BillingError::InvalidDuration(
            "trial assignment has no trial days".to_string(),
        )),
        (false, _) => resolve_period(
            assignment.created_at.date_naive(),
            plan.validity,
            assignment.custom_duration,
        ),
    }
}
