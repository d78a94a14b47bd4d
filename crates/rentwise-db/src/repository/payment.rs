//! SurrealDB implementation of [`PaymentRepository`].

use chrono::{DateTime, Utc};
use rentwise_core::error::RentalResult;
use rentwise_core::models::kind::EntityKind;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::payment::{CreatePayment, PaymentRecord};
use rentwise_core::models::status::StatusLabel;
use rentwise_core::repository::{ListFilter, PaymentRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::scoped::{ScopedSelect, fetch_scoped};
use super::{
    parse_optional_uuid, parse_owner, parse_status, parse_uuid, single, to_decimal, to_float,
};
use crate::error::DbError;

const TABLE: &str = "payment";

#[derive(Debug, SurrealValue)]
struct PaymentRow {
    record_id: String,
    owner_id: String,
    property_id: String,
    tenant_id: Option<String>,
    amount: f64,
    payment_date: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
}

impl PaymentRow {
    fn try_into_payment(self) -> Result<PaymentRecord, DbError> {
        Ok(PaymentRecord {
            id: parse_uuid("payment id", &self.record_id)?,
            owner_id: parse_owner(&self.owner_id)?,
            property_id: parse_uuid("property_id", &self.property_id)?,
            tenant_id: parse_optional_uuid("tenant_id", self.tenant_id.as_deref())?,
            amount: to_decimal(self.amount),
            payment_date: self.payment_date,
            due_date: self.due_date,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealPaymentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPaymentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PaymentRepository for SurrealPaymentRepository<C> {
    async fn create(&self, input: CreatePayment) -> RentalResult<PaymentRecord> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "CREATE type::record('payment', $id) SET \
                 owner_id = $owner_id, property_id = $property_id, \
                 tenant_id = $tenant_id, amount = $amount, \
                 payment_date = $payment_date, due_date = $due_date, \
                 status = $status, created_at = time::now() RETURN NONE; \
                 SELECT record::id(id) AS record_id, * \
                 FROM type::record('payment', $id) WHERE owner_id = $owner_id;",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.as_str().to_string()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("amount", to_float(input.amount)))
            .bind(("payment_date", input.payment_date))
            .bind(("due_date", input.due_date))
            .bind(("status", input.status.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<PaymentRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id_str)?.try_into_payment()?)
    }

    async fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> RentalResult<Vec<PaymentRecord>> {
        let select = ScopedSelect {
            table: TABLE,
            kind: EntityKind::Payments,
            has_status: true,
            filter,
        };
        let rows = fetch_scoped::<C, PaymentRow>(&self.db, select, owner_id).await?;
        Ok(rows.finish(filter.limit, PaymentRow::try_into_payment)?)
    }
}
