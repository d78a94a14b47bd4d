//! SurrealDB implementation of [`TenancyRepository`].
//!
//! The info blocks are flexible objects; they are read back through
//! [`normalize_block`] so partial or malformed blocks never fail a list.

use chrono::{DateTime, Utc};
use rentwise_core::error::RentalResult;
use rentwise_core::models::kind::EntityKind;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::tenancy::{CreateTenancy, Tenancy, normalize_block};
use rentwise_core::repository::{ListFilter, TenancyRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::scoped::{ScopedSelect, fetch_scoped};
use super::{parse_owner, parse_uuid, single};
use crate::error::DbError;

const TABLE: &str = "tenancy";

#[derive(Debug, SurrealValue)]
struct TenancyRow {
    record_id: String,
    owner_id: String,
    property_id: String,
    personal_info: Option<serde_json::Value>,
    lease_info: Option<serde_json::Value>,
    payment_info: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl TenancyRow {
    fn try_into_tenancy(self) -> Result<Tenancy, DbError> {
        Ok(Tenancy {
            id: parse_uuid("tenancy id", &self.record_id)?,
            owner_id: parse_owner(&self.owner_id)?,
            property_id: parse_uuid("property_id", &self.property_id)?,
            personal_info: normalize_block(self.personal_info),
            lease_info: normalize_block(self.lease_info),
            payment_info: normalize_block(self.payment_info),
            created_at: self.created_at,
        })
    }
}

fn block<T: serde::Serialize>(what: &str, value: &T) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(value).map_err(|e| DbError::decode(what, e))
}

#[derive(Clone)]
pub struct SurrealTenancyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenancyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenancyRepository for SurrealTenancyRepository<C> {
    async fn create(&self, input: CreateTenancy) -> RentalResult<Tenancy> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let personal_info = block("personal_info", &input.personal_info)?;
        let lease_info = block("lease_info", &input.lease_info)?;
        let payment_info = block("payment_info", &input.payment_info)?;

        let mut result = self
            .db
            .query(
                "CREATE type::record('tenancy', $id) SET \
                 owner_id = $owner_id, property_id = $property_id, \
                 personal_info = $personal_info, lease_info = $lease_info, \
                 payment_info = $payment_info, created_at = time::now() \
                 RETURN NONE; \
                 SELECT record::id(id) AS record_id, * \
                 FROM type::record('tenancy', $id) WHERE owner_id = $owner_id;",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.as_str().to_string()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("personal_info", personal_info))
            .bind(("lease_info", lease_info))
            .bind(("payment_info", payment_info))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<TenancyRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id_str)?.try_into_tenancy()?)
    }

    async fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> RentalResult<Vec<Tenancy>> {
        let select = ScopedSelect {
            table: TABLE,
            kind: EntityKind::Tenancies,
            has_status: false,
            filter,
        };
        let rows = fetch_scoped::<C, TenancyRow>(&self.db, select, owner_id).await?;
        Ok(rows.finish(filter.limit, TenancyRow::try_into_tenancy)?)
    }
}
