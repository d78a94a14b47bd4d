//! SurrealDB implementation of [`MaintenanceRepository`].

use chrono::{DateTime, Utc};
use rentwise_core::error::RentalResult;
use rentwise_core::models::kind::EntityKind;
use rentwise_core::models::maintenance::{
    CreateMaintenanceRequest, MaintenanceRequest, MaintenanceStatus, MaintenanceStatusChange,
};
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::status::StatusLabel;
use rentwise_core::repository::{ListFilter, MaintenanceRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::scoped::{ScopedSelect, fetch_scoped};
use super::{parse_optional_uuid, parse_owner, parse_status, parse_uuid, single};
use crate::error::DbError;

const TABLE: &str = "maintenance_request";

const SELECT_ONE: &str = "SELECT record::id(id) AS record_id, * \
     FROM type::record('maintenance_request', $id) WHERE owner_id = $owner_id";

#[derive(Debug, SurrealValue)]
struct MaintenanceRow {
    record_id: String,
    owner_id: String,
    property_id: String,
    tenant_id: Option<String>,
    title: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    scheduled_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MaintenanceRow {
    fn try_into_request(self) -> Result<MaintenanceRequest, DbError> {
        Ok(MaintenanceRequest {
            id: parse_uuid("maintenance request id", &self.record_id)?,
            owner_id: parse_owner(&self.owner_id)?,
            property_id: parse_uuid("property_id", &self.property_id)?,
            tenant_id: parse_optional_uuid("tenant_id", self.tenant_id.as_deref())?,
            title: self.title,
            description: self.description,
            category: self.category,
            priority: self.priority,
            status: parse_status(&self.status)?,
            scheduled_at: self.scheduled_at,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealMaintenanceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMaintenanceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MaintenanceRepository for SurrealMaintenanceRepository<C> {
    async fn create(&self, input: CreateMaintenanceRequest) -> RentalResult<MaintenanceRequest> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let query = format!(
            "CREATE type::record('maintenance_request', $id) SET \
             owner_id = $owner_id, property_id = $property_id, \
             tenant_id = $tenant_id, title = $title, \
             description = $description, category = $category, \
             priority = $priority, status = 'submitted', \
             created_at = time::now(), updated_at = time::now() RETURN NONE; \
             {SELECT_ONE};"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.as_str().to_string()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("category", input.category))
            .bind(("priority", input.priority))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<MaintenanceRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id_str)?.try_into_request()?)
    }

    async fn get_by_id(&self, owner_id: &OwnerId, id: Uuid) -> RentalResult<MaintenanceRequest> {
        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id.to_string()))
            .bind(("owner_id", owner_id.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<MaintenanceRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id)?.try_into_request()?)
    }

    async fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> RentalResult<Vec<MaintenanceRequest>> {
        let select = ScopedSelect {
            table: TABLE,
            kind: EntityKind::MaintenanceRequests,
            has_status: true,
            filter,
        };
        let rows = fetch_scoped::<C, MaintenanceRow>(&self.db, select, owner_id).await?;
        Ok(rows.finish(filter.limit, MaintenanceRow::try_into_request)?)
    }

    async fn update_status(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
        change: MaintenanceStatusChange,
    ) -> RentalResult<MaintenanceRequest> {
        let mut sets = vec!["status = $status", "updated_at = time::now()"];
        if change.scheduled_at.is_some() {
            sets.push("scheduled_at = $scheduled_at");
        }
        if change.status == MaintenanceStatus::Completed {
            sets.push("completed_at = time::now()");
        }

        let query = format!(
            "UPDATE type::record('maintenance_request', $id) SET {} \
             WHERE owner_id = $owner_id RETURN NONE; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("owner_id", owner_id.as_str().to_string()))
            .bind(("status", change.status.as_str().to_string()));
        if let Some(scheduled_at) = change.scheduled_at {
            builder = builder.bind(("scheduled_at", scheduled_at));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<MaintenanceRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id)?.try_into_request()?)
    }
}
