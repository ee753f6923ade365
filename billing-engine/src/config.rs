//! Configuration module for billing-engine.

use rust_decimal::Decimal;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::observability;
use std::env;
use std::str::FromStr;

use crate::services::{DocumentNumbering, TaxRates};

#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub tax_rates: TaxRates,
    pub numbering: DocumentNumbering,
    /// Days between a cycle's opening bill and its due date.
    pub payment_terms_days: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: "billing-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            tax_rates: TaxRates::default(),
            numbering: DocumentNumbering::default(),
            payment_terms_days: 7,
        }
    }
}

impl BillingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::with_common(common)
    }

    /// Build from already-loaded core settings plus the process environment.
    pub fn with_common(common: core_config::Config) -> Result<Self, AppError> {
        let defaults = TaxRates::default();
        let numbering = DocumentNumbering::default();

        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "billing-engine".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| common.log_level.clone()),
            tax_rates: TaxRates {
                cgst: rate_from_env("CGST_RATE", defaults.cgst)?,
                sgst: rate_from_env("SGST_RATE", defaults.sgst)?,
                igst: rate_from_env("IGST_RATE", defaults.igst)?,
            },
            numbering: DocumentNumbering {
                proforma_prefix: env::var("PROFORMA_PREFIX").unwrap_or(numbering.proforma_prefix),
                invoice_prefix: env::var("INVOICE_PREFIX").unwrap_or(numbering.invoice_prefix),
            },
            payment_terms_days: terms_from_env("PAYMENT_TERMS_DAYS", 7)?,
            common,
        })
    }

    /// Install the process-wide tracing subscriber for this service.
    pub fn init_tracing(&self) -> Result<(), AppError> {
        observability::init_tracing(&self.service_name, &self.log_level, self.common.log_json)
    }
}

fn rate_from_env(key: &str, default: Decimal) -> Result<Decimal, AppError> {
    match env::var(key) {
        Ok(value) => {
            let rate = Decimal::from_str(value.trim()).map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("{} is not a valid rate: {}", key, e))
            })?;
            if rate.is_sign_negative() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} cannot be negative",
                    key
                )));
            }
            Ok(rate)
        }
        Err(_) => Ok(default),
    }
}

fn terms_from_env(key: &str, default: u32) -> Result<u32, AppError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} is not a valid number of days: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}
