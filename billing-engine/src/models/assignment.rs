//! Plan assignment model (restaurant to pricing plan link).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::BillingError;

/// GST and LUT declarations for an assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct TaxFlags {
    pub cgst: bool,
    pub sgst: bool,
    pub igst: bool,
    /// Issued under a Letter of Undertaking; no GST component should be set.
    pub lut: bool,
}

impl TaxFlags {
    /// Names of the GST components that are switched on.
    pub fn gst_components(&self) -> Vec<&'static str> {
        let mut components = Vec::new();
        if self.cgst {
            components.push("CGST");
        }
        if self.sgst {
            components.push("SGST");
        }
        if self.igst {
            components.push("IGST");
        }
        components
    }

    pub fn is_consistent(&self) -> bool {
        !self.lut || self.gst_components().is_empty()
    }
}

/// Whether the assignment is a paid subscription or a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    Live,
    Trial,
}

impl PlanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::Live => "live",
            PlanMode::Trial => "trial",
        }
    }
}

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percent,
    Fixed,
}

/// Discount applied before tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub discount_type: DiscountType,
    pub value: Decimal,
}

impl Discount {
    pub fn none() -> Self {
        Self::fixed(Decimal::ZERO)
    }

    pub fn percent(value: Decimal) -> Self {
        Self {
            discount_type: DiscountType::Percent,
            value,
        }
    }

    pub fn fixed(value: Decimal) -> Self {
        Self {
            discount_type: DiscountType::Fixed,
            value,
        }
    }
}

/// Link between a restaurant and a pricing plan. Invoices reference
/// `assignment_id` as their cycle key.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_plan_mode"))]
pub struct PlanAssignment {
    pub assignment_id: Uuid,
    pub restaurant_id: Uuid,
    pub pricing_plan_id: Uuid,
    #[serde(default)]
    pub tax: TaxFlags,
    pub plan_mode: PlanMode,
    #[validate(range(min = 1, message = "Trial days must be positive"))]
    pub trial_days: Option<i32>,
    pub start_date: NaiveDate,
    #[validate(range(min = 0, message = "Custom duration cannot be negative"))]
    pub custom_duration: Option<i32>,
    #[serde(default)]
    pub discount: Option<Discount>,
    pub created_at: DateTime<Utc>,
}

fn validate_plan_mode(assignment: &PlanAssignment) -> Result<(), ValidationError> {
    match (assignment.plan_mode, assignment.trial_days) {
        (PlanMode::Trial, None) => {
            let mut err = ValidationError::new("trial_days_required");
            err.message = Some("Trial assignments require trial days".into());
            Err(err)
        }
        (PlanMode::Live, Some(_)) => {
            let mut err = ValidationError::new("trial_days_unexpected");
            err.message = Some("Trial days are only valid for trial assignments".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

impl PlanAssignment {
    /// Checks performed when an assignment is created, before any totals are computed.
    pub fn check(&self) -> Result<(), BillingError> {
        if !self.tax.is_consistent() {
            return Err(BillingError::InconsistentTaxConfiguration {
                components: self.tax.gst_components().join(", "),
            });
        }
        self.validate()?;
        Ok(())
    }

    pub fn discount(&self) -> Discount {
        self.discount.unwrap_or_else(Discount::none)
    }

    pub fn is_trial(&self) -> bool {
        self.plan_mode == PlanMode::Trial
    }
}
