//! Rental application domain model.

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
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Statuses still waiting for a landlord decision.
    pub const PENDING: [ApplicationStatus; 2] =
        [ApplicationStatus::Submitted, ApplicationStatus::UnderReview];

    pub fn is_decided(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    /// Transition table for the review flow.
    ///
    /// `allow_reversal` lets a decided application flip to the opposite
    /// decision; it never re-opens review.
    pub fn can_transition_to(self, next: ApplicationStatus, allow_reversal: bool) -> bool {
        use ApplicationStatus::*;
        match (self, next) {
            (Submitted, UnderReview | Approved | Rejected) => true,
            (UnderReview, Approved | Rejected) => true,
            (Approved, Rejected) | (Rejected, Approved) => allow_reversal,
            _ => false,
        }
    }
}

impl StatusLabel for ApplicationStatus {
    const ENTITY: &'static str = "application";

    fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "under_review" => Ok(ApplicationStatus::UnderReview),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(unknown_status(Self::ENTITY, other)),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two outcomes a landlord can record on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationDecision {
    Approved,
    Rejected,
}

impl From<ApplicationDecision> for ApplicationStatus {
    fn from(decision: ApplicationDecision) -> Self {
        match decision {
            ApplicationDecision::Approved => ApplicationStatus::Approved,
            ApplicationDecision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub applicant_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    /// Set when the application is approved or rejected.
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplication {
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub applicant_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    /// Defaults to now when absent.
    pub submitted_at: Option<DateTime<Utc>>,
}
