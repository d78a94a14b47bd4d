//! Property domain model.
//!
//! A property is the rentable unit a landlord lists. Its availability
//! drives the occupancy figures in the dashboard snapshot.

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
pub enum PropertyStatus {
    /// Listed and vacant.
    Available,
    /// Let to a tenant; counts as an active rental.
    Occupied,
    Maintenance,
    Unlisted,
}

impl PropertyStatus {
    pub fn can_transition_to(self, next: PropertyStatus) -> bool {
        use PropertyStatus::*;
        matches!(
            (self, next),
            (Available, Occupied)
                | (Available, Maintenance)
                | (Available, Unlisted)
                | (Occupied, Available)
                | (Occupied, Maintenance)
                | (Maintenance, Available)
                | (Maintenance, Unlisted)
                | (Unlisted, Available)
        )
    }
}

impl StatusLabel for PropertyStatus {
    const ENTITY: &'static str = "property";

    fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Occupied => "occupied",
            PropertyStatus::Maintenance => "maintenance",
            PropertyStatus::Unlisted => "unlisted",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(PropertyStatus::Available),
            "occupied" => Ok(PropertyStatus::Occupied),
            "maintenance" => Ok(PropertyStatus::Maintenance),
            "unlisted" => Ok(PropertyStatus::Unlisted),
            other => Err(unknown_status(Self::ENTITY, other)),
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Monthly rent.
    pub price: Decimal,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub square_feet: Option<u32>,
    pub property_type: String,
    pub status: PropertyStatus,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProperty {
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub price: Decimal,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub square_feet: Option<u32>,
    pub property_type: String,
    pub status: PropertyStatus,
    pub images: Vec<String>,
}
