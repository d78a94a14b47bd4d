//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables are SCHEMAFULL. UUIDs and owner ids are stored as strings;
//! status enums are stored as their snake_case labels with ASSERT
//! constraints. The landlord profile's record id is the owner id.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "owner_scoped_collections",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "owner_ordering_indexes",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1 — collections
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- OVERWRITE replaces tables created implicitly by writes made before
-- provisioning.
-- =======================================================================
-- Landlord profiles (record id = owner id)
-- =======================================================================
DEFINE TABLE OVERWRITE landlord_profile SCHEMAFULL;
DEFINE FIELD OVERWRITE owner_id ON TABLE landlord_profile TYPE string;
DEFINE FIELD OVERWRITE display_name ON TABLE landlord_profile TYPE option<string>;
DEFINE FIELD OVERWRITE business_name ON TABLE landlord_profile TYPE option<string>;
DEFINE FIELD OVERWRITE phone ON TABLE landlord_profile TYPE option<string>;
DEFINE FIELD OVERWRITE email ON TABLE landlord_profile TYPE option<string>;
DEFINE FIELD OVERWRITE address ON TABLE landlord_profile TYPE option<string>;
DEFINE FIELD OVERWRITE bank ON TABLE landlord_profile TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD OVERWRITE settings ON TABLE landlord_profile TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD OVERWRITE profile_image ON TABLE landlord_profile \
    TYPE option<string>;
DEFINE FIELD OVERWRITE verified ON TABLE landlord_profile TYPE bool DEFAULT false;
DEFINE FIELD OVERWRITE total_properties ON TABLE landlord_profile TYPE int \
    DEFAULT 0;
DEFINE FIELD OVERWRITE active_tenants ON TABLE landlord_profile TYPE int \
    DEFAULT 0;
DEFINE FIELD OVERWRITE monthly_revenue ON TABLE landlord_profile TYPE float \
    DEFAULT 0.0;
DEFINE FIELD OVERWRITE created_at ON TABLE landlord_profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD OVERWRITE updated_at ON TABLE landlord_profile TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Properties (owner scope)
-- =======================================================================
DEFINE TABLE OVERWRITE property SCHEMAFULL;
DEFINE FIELD OVERWRITE owner_id ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE title ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE description ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE address ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE city ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE state ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE postal_code ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE price ON TABLE property TYPE float;
DEFINE FIELD OVERWRITE bedrooms ON TABLE property TYPE int;
DEFINE FIELD OVERWRITE bathrooms ON TABLE property TYPE float;
DEFINE FIELD OVERWRITE square_feet ON TABLE property TYPE option<int>;
DEFINE FIELD OVERWRITE property_type ON TABLE property TYPE string;
DEFINE FIELD OVERWRITE status ON TABLE property TYPE string \
    ASSERT $value IN ['available', 'occupied', 'maintenance', \
    'unlisted'];
DEFINE FIELD OVERWRITE images ON TABLE property TYPE array<string> DEFAULT [];
DEFINE FIELD OVERWRITE created_at ON TABLE property TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD OVERWRITE updated_at ON TABLE property TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Tenancies (owner scope, nested info blocks)
-- =======================================================================
DEFINE TABLE OVERWRITE tenancy SCHEMAFULL;
DEFINE FIELD OVERWRITE owner_id ON TABLE tenancy TYPE string;
DEFINE FIELD OVERWRITE property_id ON TABLE tenancy TYPE string;
DEFINE FIELD OVERWRITE personal_info ON TABLE tenancy TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD OVERWRITE lease_info ON TABLE tenancy TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD OVERWRITE payment_info ON TABLE tenancy TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD OVERWRITE created_at ON TABLE tenancy TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Rental applications (owner scope)
-- =======================================================================
DEFINE TABLE OVERWRITE rental_application SCHEMAFULL;
DEFINE FIELD OVERWRITE owner_id ON TABLE rental_application TYPE string;
DEFINE FIELD OVERWRITE property_id ON TABLE rental_application TYPE string;
DEFINE FIELD OVERWRITE applicant_id ON TABLE rental_application TYPE string;
DEFINE FIELD OVERWRITE applicant_name ON TABLE rental_application TYPE string;
DEFINE FIELD OVERWRITE applicant_email ON TABLE rental_application TYPE string;
DEFINE FIELD OVERWRITE status ON TABLE rental_application TYPE string \
    ASSERT $value IN ['submitted', 'under_review', 'approved', \
    'rejected'];
DEFINE FIELD OVERWRITE submitted_at ON TABLE rental_application TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD OVERWRITE reviewed_at ON TABLE rental_application \
    TYPE option<datetime>;
DEFINE FIELD OVERWRITE review_notes ON TABLE rental_application \
    TYPE option<string>;
DEFINE FIELD OVERWRITE updated_at ON TABLE rental_application TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Maintenance requests (owner scope)
-- =======================================================================
DEFINE TABLE OVERWRITE maintenance_request SCHEMAFULL;
DEFINE FIELD OVERWRITE owner_id ON TABLE maintenance_request TYPE string;
DEFINE FIELD OVERWRITE property_id ON TABLE maintenance_request TYPE string;
DEFINE FIELD OVERWRITE tenant_id ON TABLE maintenance_request TYPE option<string>;
DEFINE FIELD OVERWRITE title ON TABLE maintenance_request TYPE string;
DEFINE FIELD OVERWRITE description ON TABLE maintenance_request TYPE string;
DEFINE FIELD OVERWRITE category ON TABLE maintenance_request TYPE string;
DEFINE FIELD OVERWRITE priority ON TABLE maintenance_request TYPE string;
DEFINE FIELD OVERWRITE status ON TABLE maintenance_request TYPE string \
    ASSERT $value IN ['submitted', 'acknowledged', 'in_progress', \
    'completed', 'cancelled'];
DEFINE FIELD OVERWRITE scheduled_at ON TABLE maintenance_request \
    TYPE option<datetime>;
DEFINE FIELD OVERWRITE completed_at ON TABLE maintenance_request \
    TYPE option<datetime>;
DEFINE FIELD OVERWRITE created_at ON TABLE maintenance_request TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD OVERWRITE updated_at ON TABLE maintenance_request TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Payments (owner scope, read-only here)
-- =======================================================================
DEFINE TABLE OVERWRITE payment SCHEMAFULL;
DEFINE FIELD OVERWRITE owner_id ON TABLE payment TYPE string;
DEFINE FIELD OVERWRITE property_id ON TABLE payment TYPE string;
DEFINE FIELD OVERWRITE tenant_id ON TABLE payment TYPE option<string>;
DEFINE FIELD OVERWRITE amount ON TABLE payment TYPE float;
DEFINE FIELD OVERWRITE payment_date ON TABLE payment TYPE datetime;
DEFINE FIELD OVERWRITE due_date ON TABLE payment TYPE option<datetime>;
DEFINE FIELD OVERWRITE status ON TABLE payment TYPE string \
    ASSERT $value IN ['pending', 'completed', 'failed', 'refunded'];
DEFINE FIELD OVERWRITE created_at ON TABLE payment TYPE datetime \
    DEFAULT time::now();
";

// -----------------------------------------------------------------------
// Schema v2 — owner + ordering indexes
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE INDEX idx_profile_owner ON TABLE landlord_profile \
    COLUMNS owner_id UNIQUE;
DEFINE INDEX idx_property_owner_created ON TABLE property \
    COLUMNS owner_id, created_at;
DEFINE INDEX idx_tenancy_owner_created ON TABLE tenancy \
    COLUMNS owner_id, created_at;
DEFINE INDEX idx_application_owner_status ON TABLE rental_application \
    COLUMNS owner_id, status;
DEFINE INDEX idx_application_owner_submitted ON TABLE \
    rental_application COLUMNS owner_id, submitted_at;
DEFINE INDEX idx_maintenance_owner_created ON TABLE maintenance_request \
    COLUMNS owner_id, created_at;
DEFINE INDEX idx_payment_owner_date ON TABLE payment \
    COLUMNS owner_id, payment_date;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the highest recorded one.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
    {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "could not record v{}: {}",
                    migration.version, e,
                ))
            })?;
    }

    info!(
        version = MIGRATIONS.last().map(|m| m.version).unwrap_or(0),
        "Schema up to date"
    );
    Ok(())
}

/// Highest schema version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn every_owner_scoped_table_has_an_owner_field() {
        for table in [
            "landlord_profile",
            "property",
            "tenancy",
            "rental_application",
            "maintenance_request",
            "payment",
        ] {
            let field = format!("DEFINE FIELD OVERWRITE owner_id ON TABLE {table} TYPE string;");
            assert!(SCHEMA_V1.contains(&field), "{table} lacks owner_id");
        }
    }

    #[test]
    fn collection_definitions_replace_implicit_tables() {
        let defines = SCHEMA_V1
            .lines()
            .filter(|l| l.starts_with("DEFINE TABLE") || l.starts_with("DEFINE FIELD"));
        for line in defines {
            assert!(line.contains(" OVERWRITE "), "{line}");
        }
    }

    #[test]
    fn latest_version_matches_table() {
        assert_eq!(latest_version(), 2);
    }
}
