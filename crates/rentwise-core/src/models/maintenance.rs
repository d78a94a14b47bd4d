//! Maintenance request domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::owner::OwnerId;
use super::status::{StatusLabel, unknown_status};
use crate::error::RentalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Submitted,
    Acknowledged,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    /// Requests the landlord still has to act on.
    pub const OPEN: [MaintenanceStatus; 3] = [
        MaintenanceStatus::Submitted,
        MaintenanceStatus::Acknowledged,
        MaintenanceStatus::InProgress,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, MaintenanceStatus::Completed | MaintenanceStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: MaintenanceStatus) -> bool {
        use MaintenanceStatus::*;
        match (self, next) {
            (Submitted, Acknowledged) | (Acknowledged, InProgress) | (InProgress, Completed) => {
                true
            }
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl StatusLabel for MaintenanceStatus {
    const ENTITY: &'static str = "maintenance_request";

    fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Submitted => "submitted",
            MaintenanceStatus::Acknowledged => "acknowledged",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(MaintenanceStatus::Submitted),
            "acknowledged" => Ok(MaintenanceStatus::Acknowledged),
            "in_progress" => Ok(MaintenanceStatus::InProgress),
            "completed" => Ok(MaintenanceStatus::Completed),
            "cancelled" => Ok(MaintenanceStatus::Cancelled),
            other => Err(unknown_status(Self::ENTITY, other)),
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    /// Open set (`plumbing`, `electrical`, ...).
    pub category: String,
    /// Open set (`low`, `medium`, `high`, `emergency`, ...).
    pub priority: String,
    pub status: MaintenanceStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMaintenanceRequest {
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
}

/// A status move recorded by the landlord.
#[derive(Debug, Clone)]
pub struct MaintenanceStatusChange {
    pub status: MaintenanceStatus,
    /// Visit date, only meaningful when acknowledging.
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_is_linear() {
        use MaintenanceStatus::*;
        assert!(Submitted.can_transition_to(Acknowledged));
        assert!(Acknowledged.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!Submitted.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Acknowledged));
    }

    #[test]
    fn cancellation_only_from_open_states() {
        use MaintenanceStatus::*;
        for open in MaintenanceStatus::OPEN {
            assert!(open.can_transition_to(Cancelled));
        }
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }
}
