//! Owner-scoped list queries shared by every collection repository.

use rentwise_core::models::kind::{EntityKind, Timestamped};
use rentwise_core::models::owner::OwnerId;
use rentwise_core::repository::{ListFilter, sort_newest_first};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;

use crate::error::DbError;

/// Describes one owner-scoped `SELECT`.
pub(super) struct ScopedSelect<'a> {
    pub table: &'static str,
    pub kind: EntityKind,
    /// Whether the table carries a `status` column the filter may narrow.
    pub has_status: bool,
    pub filter: &'a ListFilter,
}

impl ScopedSelect<'_> {
    fn statement(&self, ordered: bool) -> String {
        let mut sql = format!(
            "SELECT record::id(id) AS record_id, * FROM {} WHERE owner_id = $owner_id",
            self.table
        );
        if self.has_status && !self.filter.statuses.is_empty() {
            sql.push_str(" AND status IN $statuses");
        }
        if ordered {
            sql.push_str(&format!(" ORDER BY {} DESC", self.kind.order_field()));
            if let Some(limit) = self.filter.limit {
                sql.push_str(&format!(" LIMIT {limit}"));
            }
        }
        sql
    }
}

/// Rows of one scoped fetch and whether the store applied the ordering.
pub(super) struct ScopedRows<R> {
    pub rows: Vec<R>,
    pub ordered: bool,
}

impl<R> ScopedRows<R> {
    /// Convert rows and, when the store could not order them, sort and
    /// truncate in memory.
    pub fn finish<T, F>(self, limit: Option<u32>, convert: F) -> Result<Vec<T>, DbError>
    where
        T: Timestamped,
        F: FnMut(R) -> Result<T, DbError>,
    {
        let mut items = self.rows.into_iter().map(convert).collect::<Result<Vec<_>, _>>()?;
        if !self.ordered {
            sort_newest_first(&mut items);
            if let Some(limit) = limit {
                items.truncate(limit as usize);
            }
        }
        Ok(items)
    }
}

/// Run a scoped select, retrying without `ORDER BY`/`LIMIT` if the store
/// rejects the ordered form.
pub(super) async fn fetch_scoped<C, R>(
    db: &Surreal<C>,
    select: ScopedSelect<'_>,
    owner_id: &OwnerId,
) -> Result<ScopedRows<R>, DbError>
where
    C: Connection,
    R: SurrealValue,
{
    match run(db, &select.statement(true), &select, owner_id).await {
        Ok(rows) => Ok(ScopedRows {
            rows,
            ordered: true,
        }),
        Err(DbError::OrderingUnsupported(reason)) => {
            debug!(
                table = select.table,
                %reason,
                "Ordered query rejected, sorting in memory"
            );
            let rows = run(db, &select.statement(false), &select, owner_id).await?;
            Ok(ScopedRows {
                rows,
                ordered: false,
            })
        }
        Err(e) => Err(e),
    }
}

async fn run<C, R>(
    db: &Surreal<C>,
    sql: &str,
    select: &ScopedSelect<'_>,
    owner_id: &OwnerId,
) -> Result<Vec<R>, DbError>
where
    C: Connection,
    R: SurrealValue,
{
    let mut builder = db
        .query(sql)
        .bind(("owner_id", owner_id.as_str().to_string()));
    if select.has_status && !select.filter.statuses.is_empty() {
        builder = builder.bind(("statuses", select.filter.statuses.clone()));
    }

    let mut result = builder.await?.check()?;
    let rows: Vec<R> = result.take(0)?;
    Ok(rows)
}
