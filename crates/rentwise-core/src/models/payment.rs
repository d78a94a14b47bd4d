//! Payment record domain model.
//!
//! Payments are read-only here; they feed the revenue figures.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::owner::OwnerId;
use super::status::{StatusLabel, unknown_status};
use crate::error::RentalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl StatusLabel for PaymentStatus {
    const ENTITY: &'static str = "payment";

    fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(unknown_status(Self::ENTITY, other)),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: PaymentStatus,
}
