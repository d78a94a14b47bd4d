//! SurrealDB implementation of [`ApplicationRepository`].

use chrono::{DateTime, Utc};
use rentwise_core::error::RentalResult;
use rentwise_core::models::application::{Application, CreateApplication};
use rentwise_core::models::kind::EntityKind;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::status::StatusLabel;
use rentwise_core::patch::ApplicationPatch;
use rentwise_core::repository::{ApplicationRepository, ListFilter};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::scoped::{ScopedSelect, fetch_scoped};
use super::{parse_owner, parse_status, parse_uuid, single};
use crate::error::DbError;

const TABLE: &str = "rental_application";

const SELECT_ONE: &str = "SELECT record::id(id) AS record_id, * \
     FROM type::record('rental_application', $id) WHERE owner_id = $owner_id";

#[derive(Debug, SurrealValue)]
struct ApplicationRow {
    record_id: String,
    owner_id: String,
    property_id: String,
    applicant_id: String,
    applicant_name: String,
    applicant_email: String,
    status: String,
    submitted_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    review_notes: Option<String>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn try_into_application(self) -> Result<Application, DbError> {
        Ok(Application {
            id: parse_uuid("application id", &self.record_id)?,
            owner_id: parse_owner(&self.owner_id)?,
            property_id: parse_uuid("property_id", &self.property_id)?,
            applicant_id: self.applicant_id,
            applicant_name: self.applicant_name,
            applicant_email: self.applicant_email,
            status: parse_status(&self.status)?,
            submitted_at: self.submitted_at,
            reviewed_at: self.reviewed_at,
            review_notes: self.review_notes,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealApplicationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealApplicationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ApplicationRepository for SurrealApplicationRepository<C> {
    async fn create(&self, input: CreateApplication) -> RentalResult<Application> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let submitted_at = input.submitted_at.unwrap_or_else(Utc::now);

        let query = format!(
            "CREATE type::record('rental_application', $id) SET \
             owner_id = $owner_id, property_id = $property_id, \
             applicant_id = $applicant_id, applicant_name = $applicant_name, \
             applicant_email = $applicant_email, status = 'submitted', \
             submitted_at = $submitted_at, updated_at = time::now() \
             RETURN NONE; {SELECT_ONE};"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.as_str().to_string()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("applicant_id", input.applicant_id))
            .bind(("applicant_name", input.applicant_name))
            .bind(("applicant_email", input.applicant_email))
            .bind(("submitted_at", submitted_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id_str)?.try_into_application()?)
    }

    async fn get_by_id(&self, owner_id: &OwnerId, id: Uuid) -> RentalResult<Application> {
        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id.to_string()))
            .bind(("owner_id", owner_id.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id)?.try_into_application()?)
    }

    async fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> RentalResult<Vec<Application>> {
        let select = ScopedSelect {
            table: TABLE,
            kind: EntityKind::Applications,
            has_status: true,
            filter,
        };
        let rows = fetch_scoped::<C, ApplicationRow>(&self.db, select, owner_id).await?;
        Ok(rows.finish(filter.limit, ApplicationRow::try_into_application)?)
    }

    async fn update(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> RentalResult<Application> {
        let mut sets = Vec::new();
        if let Some(status) = patch.status {
            sets.push("status = $status");
            if status.is_decided() {
                sets.push("reviewed_at = time::now()");
            }
        }
        if patch.review_notes.is_some() {
            sets.push("review_notes = $review_notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('rental_application', $id) SET {} \
             WHERE owner_id = $owner_id RETURN NONE; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("owner_id", owner_id.as_str().to_string()));
        if let Some(status) = patch.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(notes) = patch.review_notes {
            builder = builder.bind(("review_notes", notes));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id)?.try_into_application()?)
    }
}
