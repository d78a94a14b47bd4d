//! Dashboard aggregate snapshot.
//!
//! Derived on request from the owner's properties, tenancies and
//! completed payments. Never persisted.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::PaymentRecord;
use super::property::{Property, PropertyStatus};
use super::tenancy::Tenancy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub total_properties: usize,
    /// Properties currently let.
    pub active_rentals: usize,
    /// Properties listed and vacant.
    pub vacant_properties: usize,
    /// Completed payments dated in the calendar month of `computed_at`.
    pub monthly_revenue: Decimal,
    /// Percentage with two decimals; 0 when there are no properties.
    pub occupancy_rate: f64,
    pub total_tenants: usize,
    pub recent_payments: Vec<PaymentRecord>,
    pub computed_at: DateTime<Utc>,
}

impl AggregateSnapshot {
    /// Fold already-scoped collections into a snapshot at `now`.
    ///
    /// `payments` must already be restricted to completed payments.
    pub fn compute(
        properties: &[Property],
        tenancies: &[Tenancy],
        payments: &[PaymentRecord],
        now: DateTime<Utc>,
        recent_limit: usize,
    ) -> Self {
        let total = properties.len();
        let active = count_with_status(properties, PropertyStatus::Occupied);
        let vacant = count_with_status(properties, PropertyStatus::Available);

        let mut recent = payments.to_vec();
        recent.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        recent.truncate(recent_limit);

        Self {
            total_properties: total,
            active_rentals: active,
            vacant_properties: vacant,
            monthly_revenue: monthly_revenue(payments, now),
            occupancy_rate: occupancy_rate(active, total),
            total_tenants: tenancies.len(),
            recent_payments: recent,
            computed_at: now,
        }
    }
}

fn count_with_status(properties: &[Property], status: PropertyStatus) -> usize {
    properties.iter().filter(|p| p.status == status).count()
}

/// `active / total * 100`, rounded to two decimals.
pub fn occupancy_rate(active: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = active as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Sum of payments whose date falls in the same UTC year and month as `now`.
pub fn monthly_revenue(payments: &[PaymentRecord], now: DateTime<Utc>) -> Decimal {
    payments
        .iter()
        .filter(|p| p.payment_date.year() == now.year() && p.payment_date.month() == now.month())
        .map(|p| p.amount)
        .sum()
}
