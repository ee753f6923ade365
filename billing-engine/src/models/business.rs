//! Business hierarchy records consumed for dashboard counts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub business_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Outlet (restaurant) under a brand of a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlet {
    pub restaurant_id: Uuid,
    pub business_id: Uuid,
    #[serde(default)]
    pub brand_id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Inclusive date bounds for dashboard queries. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
