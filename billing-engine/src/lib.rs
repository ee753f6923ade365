//! Billing engine - plan pricing, GST totals, payment ledgers and reporting
//! for outlet point-of-sale licences.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

pub use engine::BillingEngine;
pub use error::BillingError;
