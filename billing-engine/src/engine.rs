//! Billing engine: the entry point collaborators call with plain records.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::models::{
    Business, DashboardFilter, Invoice, Outlet, PlanAssignment, PricingPlan, RecordPayment,
};
use crate::services::cycles::{group_cycles, BillingCycle};
use crate::services::dashboard::{self, CycleRow, DashboardSummary};
use crate::services::document::{self, BillingDocument, DocumentRequest};
use crate::services::ledger::{opening_record, CycleLedger};
use crate::services::metrics::{
    init_metrics, record_error, record_invoiced_amount, record_operation, record_payment_amount,
    OPERATION_DURATION,
};
use crate::services::period::{period_for_assignment, SubscriptionPeriod};
use crate::services::pricing;
use crate::services::TaxBreakdown;

/// Stateless billing engine. Every call receives the full input it needs.
#[derive(Debug, Clone)]
pub struct BillingEngine {
    config: BillingConfig,
}

impl Default for BillingEngine {
    fn default() -> Self {
        Self::new(BillingConfig::default())
    }
}

impl BillingEngine {
    pub fn new(config: BillingConfig) -> Self {
        init_metrics();
        Self { config }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    fn fail(&self, operation: &str, err: BillingError) -> BillingError {
        warn!(operation = %operation, error = %err, "Billing operation failed");
        record_operation(operation, "error");
        record_error(err.as_str(), operation);
        err
    }

    /// Totals an assignment would bill for a new cycle.
    #[instrument(skip_all, fields(plan_id = %plan.plan_id, assignment_id = %assignment.assignment_id))]
    pub fn quote(&self, plan: &PricingPlan, assignment: &PlanAssignment) -> TaxBreakdown {
        if !assignment.tax.is_consistent() {
            warn!(
                components = ?assignment.tax.gst_components(),
                "LUT assignment carries GST components; computing flagged components"
            );
        }
        pricing::quote(plan, assignment, &self.config.tax_rates)
    }

    /// Subscription period covered by an assignment.
    pub fn period(
        &self,
        plan: &PricingPlan,
        assignment: &PlanAssignment,
    ) -> Result<SubscriptionPeriod, BillingError> {
        period_for_assignment(plan, assignment).map_err(|e| self.fail("period", e))
    }

    /// Opening record for a new cycle.
    ///
    /// `all_invoices` is every invoice issued so far, across all restaurants.
    /// The proforma number is allocated against that set, so passing a single
    /// restaurant's records would reissue numbers already in use elsewhere.
    #[instrument(
        skip_all,
        fields(restaurant_id = %assignment.restaurant_id, assignment_id = %assignment.assignment_id)
    )]
    pub fn open_cycle(
        &self,
        plan: &PricingPlan,
        assignment: &PlanAssignment,
        all_invoices: &[Invoice],
        created_at: DateTime<Utc>,
    ) -> Result<Invoice, BillingError> {
        let timer = OPERATION_DURATION
            .with_label_values(&["open_cycle"])
            .start_timer();

        if assignment.pricing_plan_id != plan.plan_id {
            warn!(
                plan_id = %plan.plan_id,
                assigned_plan_id = %assignment.pricing_plan_id,
                "Assignment references a different plan"
            );
        }

        let period = self.period(plan, assignment)?;
        let breakdown = self.quote(plan, assignment);
        let proforma_number = self
            .config
            .numbering
            .next_proforma_number(all_invoices, created_at.date_naive());

        let invoice = opening_record(
            assignment,
            &breakdown,
            proforma_number,
            created_at,
            self.config.payment_terms_days,
        );

        record_operation("open_cycle", "ok");
        record_invoiced_amount(
            assignment.plan_mode.as_str(),
            invoice.total_amount.to_f64().unwrap_or_default(),
        );
        timer.observe_duration();

        info!(
            invoice_id = %invoice.invoice_id,
            proforma_number = %invoice.proforma_number,
            plan_type = %plan.kind.as_str(),
            plan_mode = %assignment.plan_mode.as_str(),
            period = %period.label(),
            total = %invoice.total_amount,
            "Billing cycle opened"
        );

        Ok(invoice)
    }

    /// Cycles of one restaurant, oldest first.
    pub fn cycles(&self, history: &[Invoice], restaurant_id: Uuid) -> Vec<BillingCycle> {
        let own: Vec<Invoice> = history
            .iter()
            .filter(|i| i.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        group_cycles(&own)
    }

    /// Ledger of the restaurant's current (most recent) cycle.
    pub fn current_ledger(
        &self,
        history: &[Invoice],
        restaurant_id: Uuid,
    ) -> Result<CycleLedger, BillingError> {
        self.cycles(history, restaurant_id)
            .last()
            .and_then(CycleLedger::from_cycle)
            .ok_or(BillingError::NotFound { restaurant_id })
    }

    /// Record to append for a payment against the restaurant's current cycle.
    ///
    /// `all_invoices` is every invoice issued so far, across all restaurants.
    /// The restaurant's cycle is selected from it and a first payment draws
    /// its tax-invoice number from the whole set.
    #[instrument(skip_all, fields(restaurant_id = %restaurant_id, amount = %payment.amount))]
    pub fn record_payment(
        &self,
        all_invoices: &[Invoice],
        restaurant_id: Uuid,
        payment: &RecordPayment,
    ) -> Result<Invoice, BillingError> {
        let timer = OPERATION_DURATION
            .with_label_values(&["record_payment"])
            .start_timer();

        let ledger = self
            .current_ledger(all_invoices, restaurant_id)
            .map_err(|e| self.fail("record_payment", e))?;

        if let Some(discrepancy) = ledger.discrepancies().first() {
            warn!(
                invoice_id = %discrepancy.invoice_id,
                stored_remaining = ?discrepancy.stored_remaining,
                derived_remaining = %discrepancy.derived_remaining,
                stored_status = %discrepancy.stored_status.as_str(),
                derived_status = %discrepancy.derived_status.as_str(),
                "Stored ledger state differs from derived state"
            );
        }

        let invoice_number = match ledger.invoice_number() {
            Some(number) => number.to_string(),
            None => self
                .config
                .numbering
                .next_invoice_number(all_invoices, payment.payment_date),
        };

        let record = ledger
            .record_payment(payment, invoice_number)
            .map_err(|e| self.fail("record_payment", e))?;

        record_operation("record_payment", "ok");
        record_payment_amount(
            record.status.as_str(),
            record.partial_amount.to_f64().unwrap_or_default(),
        );
        timer.observe_duration();

        info!(
            invoice_id = %record.invoice_id,
            invoice_number = ?record.invoice_number,
            proforma_number = %record.proforma_number,
            remaining = ?record.remaining_amount,
            status = %record.status.as_str(),
            "Payment recorded"
        );

        Ok(record)
    }

    /// Document payload for `invoice_id`, or for the latest record when absent.
    #[instrument(skip_all, fields(restaurant_id = %restaurant_id, invoice_id = ?invoice_id))]
    pub fn document(
        &self,
        history: &[Invoice],
        restaurant_id: Uuid,
        invoice_id: Option<Uuid>,
        plan: &PricingPlan,
        assignment: &PlanAssignment,
    ) -> Result<BillingDocument, BillingError> {
        let timer = OPERATION_DURATION
            .with_label_values(&["document"])
            .start_timer();

        let document = document::assemble(DocumentRequest {
            history,
            restaurant_id,
            invoice_id,
            plan,
            assignment,
            rates: &self.config.tax_rates,
        })
        .map_err(|e| self.fail("document", e))?;

        record_operation("document", "ok");
        timer.observe_duration();

        info!(
            kind = %document.kind.as_str(),
            document_number = %document.document_number,
            payments = document.payment_history.len(),
            remaining_due = %document.remaining_due,
            "Billing document assembled"
        );

        Ok(document)
    }

    /// Dashboard counts for the optional date range.
    #[instrument(skip_all, fields(start_date = ?filter.start_date, end_date = ?filter.end_date))]
    pub fn dashboard(
        &self,
        invoices: &[Invoice],
        businesses: &[Business],
        outlets: &[Outlet],
        filter: &DashboardFilter,
    ) -> DashboardSummary {
        let summary = dashboard::summarize(invoices, businesses, outlets, filter);
        record_operation("dashboard", "ok");
        info!(
            paid_count = summary.paid_count,
            pending_count = summary.pending_count,
            business_count = summary.business_count,
            outlet_count = summary.outlet_count,
            "Dashboard summary computed"
        );
        summary
    }

    /// Billing table rows for one restaurant.
    pub fn restaurant_rows(&self, invoices: &[Invoice], restaurant_id: Uuid) -> Vec<CycleRow> {
        dashboard::restaurant_cycle_rows(invoices, restaurant_id)
    }
}
