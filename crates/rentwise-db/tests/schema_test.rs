//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    rentwise_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    for table in [
        "landlord_profile",
        "property",
        "tenancy",
        "rental_application",
        "maintenance_request",
        "payment",
        "_migration",
    ] {
        assert!(info_str.contains(table), "missing {table} table");
    }
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    rentwise_db::run_migrations(&db).await.unwrap();
    rentwise_db::run_migrations(&db).await.unwrap();

    #[derive(Debug, SurrealValue)]
    struct Applied {
        version: u32,
    }

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version ASC")
        .await
        .unwrap();
    let applied: Vec<Applied> = result.take(0).unwrap();
    let versions: Vec<u32> = applied.iter().map(|a| a.version).collect();
    let expected: Vec<u32> = (1..=rentwise_db::latest_version()).collect();
    assert_eq!(versions, expected);
}

#[tokio::test]
async fn status_values_are_constrained() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentwise_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE payment SET owner_id = 'o', property_id = 'p', \
             amount = 10.0, payment_date = time::now(), status = 'lost'",
        )
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "unknown payment status must be rejected");
}
