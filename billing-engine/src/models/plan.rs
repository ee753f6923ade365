//! Pricing plan model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credits granted for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCredit {
    pub product_id: Uuid,
    pub credits: i32,
}

/// Plan variant, carrying only the fields meaningful to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "planType", rename_all = "snake_case")]
pub enum PlanKind {
    #[serde(rename_all = "camelCase")]
    Fixed { fixed_price: Decimal },
    #[serde(rename_all = "camelCase")]
    Metered {
        metered_products: Vec<ProductCredit>,
    },
    #[serde(rename_all = "camelCase")]
    Hybrid {
        fixed_price: Decimal,
        metered_products: Vec<ProductCredit>,
    },
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Fixed { .. } => "fixed",
            PlanKind::Metered { .. } => "metered",
            PlanKind::Hybrid { .. } => "hybrid",
        }
    }

    /// Fixed price (or hybrid top-up), absent for metered plans.
    pub fn fixed_price(&self) -> Option<Decimal> {
        match self {
            PlanKind::Fixed { fixed_price } | PlanKind::Hybrid { fixed_price, .. } => {
                Some(*fixed_price)
            }
            PlanKind::Metered { .. } => None,
        }
    }

    pub fn metered_products(&self) -> &[ProductCredit] {
        match self {
            PlanKind::Metered { metered_products } | PlanKind::Hybrid { metered_products, .. } => {
                metered_products
            }
            PlanKind::Fixed { .. } => &[],
        }
    }
}

/// Pricing plan. Never edited once an assignment references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub plan_id: Uuid,
    pub plan_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: PlanKind,
    pub base_price: Decimal,
    #[serde(default)]
    pub credits_included: i32,
    /// Default subscription length in months.
    pub validity: i32,
    #[serde(default)]
    pub included_products: Vec<ProductCredit>,
    pub created_at: DateTime<Utc>,
}

impl PricingPlan {
    /// Total credits across metered and included products, plus the plan allowance.
    pub fn total_credits(&self) -> i64 {
        let product_credits: i64 = self
            .kind
            .metered_products()
            .iter()
            .chain(self.included_products.iter())
            .map(|p| i64::from(p.credits))
            .sum();
        i64::from(self.credits_included) + product_credits
    }
}
