//! SurrealDB repository implementations.
//!
//! Every query here carries an `owner_id = $owner_id` predicate, including
//! lookups and updates by record id.

mod application;
mod maintenance;
mod payment;
mod profile;
mod property;
mod scoped;
mod store;
mod tenancy;

pub use application::SurrealApplicationRepository;
pub use maintenance::SurrealMaintenanceRepository;
pub use payment::SurrealPaymentRepository;
pub use profile::SurrealProfileRepository;
pub use property::SurrealPropertyRepository;
pub use store::SurrealRentalStore;
pub use tenancy::SurrealTenancyRepository;

use rentwise_core::models::owner::OwnerId;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::error::DbError;

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::decode(field, e))
}

fn parse_optional_uuid(field: &str, raw: Option<&str>) -> Result<Option<Uuid>, DbError> {
    raw.map(|r| parse_uuid(field, r)).transpose()
}

fn parse_owner(raw: &str) -> Result<OwnerId, DbError> {
    OwnerId::parse(raw).ok_or_else(|| DbError::decode("owner_id", "blank owner id"))
}

fn parse_status<S>(raw: &str) -> Result<S, DbError>
where
    S: std::str::FromStr,
    S::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| DbError::decode("status", e))
}

/// Money is stored as a float; reads are rounded back to cents.
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .unwrap_or_default()
}

fn to_float(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// First row of a result, or `NotFound` for the given entity and id.
fn single<T>(rows: Vec<T>, entity: &str, id: impl ToString) -> Result<T, DbError> {
    rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: entity.into(),
        id: id.to_string(),
    })
}
