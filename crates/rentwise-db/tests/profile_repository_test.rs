//! Integration tests for the landlord profile repository using in-memory
//! SurrealDB.

use rentwise_core::error::RentalError;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::profile::{
    BankDetails, CreateProfile, ProfileCounters, ProfileSeed, ProfileSettings,
};
use rentwise_core::patch::ProfilePatch;
use rentwise_core::repository::ProfileRepository;
use rentwise_db::repository::SurrealProfileRepository;
use rust_decimal_macros::dec;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentwise_db::run_migrations(&db).await.unwrap();
    db
}

fn owner(raw: &str) -> OwnerId {
    OwnerId::parse(raw).unwrap()
}

#[tokio::test]
async fn created_profile_starts_unverified_with_zero_counters() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);

    let profile = repo
        .create(CreateProfile::with_defaults(
            owner("owner-new"),
            ProfileSeed {
                email: Some("new@example.com".into()),
                display_name: Some("New Landlord".into()),
            },
        ))
        .await
        .unwrap();

    assert_eq!(profile.owner_id.as_str(), "owner-new");
    assert!(!profile.verified);
    assert_eq!(profile.total_properties, 0);
    assert_eq!(profile.active_tenants, 0);
    assert_eq!(profile.monthly_revenue, dec!(0));
    assert_eq!(profile.email.as_deref(), Some("new@example.com"));
    assert_eq!(profile.settings, ProfileSettings::default());
    assert_eq!(profile.bank, BankDetails::default());
}

#[tokio::test]
async fn second_create_for_same_owner_is_already_exists() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);

    repo.create(CreateProfile::with_defaults(owner("dup"), ProfileSeed::default()))
        .await
        .unwrap();
    let err = repo
        .create(CreateProfile::with_defaults(owner("dup"), ProfileSeed::default()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, RentalError::AlreadyExists { ref entity, ref id } if entity == "landlord_profile" && id == "dup"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);

    let err = repo.get(&owner("nobody")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn patch_updates_only_named_fields() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);
    let id = owner("patchy");

    repo.create(CreateProfile::with_defaults(
        id.clone(),
        ProfileSeed {
            email: Some("keep@example.com".into()),
            display_name: None,
        },
    ))
    .await
    .unwrap();

    let updated = repo
        .update(
            &id,
            ProfilePatch {
                business_name: Some("Patchy Lets".into()),
                bank: Some(BankDetails {
                    bank_name: Some("First Bank".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.business_name.as_deref(), Some("Patchy Lets"));
    assert_eq!(updated.bank.bank_name.as_deref(), Some("First Bank"));
    assert_eq!(updated.email.as_deref(), Some("keep@example.com"));
    assert!(!updated.verified);
}

#[tokio::test]
async fn counters_are_written_back() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);
    let id = owner("counted");

    repo.create(CreateProfile::with_defaults(id.clone(), ProfileSeed::default()))
        .await
        .unwrap();

    let updated = repo
        .update_counters(
            &id,
            ProfileCounters {
                total_properties: 3,
                active_tenants: 2,
                monthly_revenue: dec!(2450.50),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.total_properties, 3);
    assert_eq!(updated.active_tenants, 2);
    assert_eq!(updated.monthly_revenue, dec!(2450.50));
}

#[tokio::test]
async fn updating_a_missing_profile_is_not_found() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);

    let err = repo
        .update(
            &owner("ghost"),
            ProfilePatch {
                phone: Some("1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn profile_written_before_provisioning_survives_migration() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    let repo = SurrealProfileRepository::new(db.clone());

    let early = repo
        .create(CreateProfile::with_defaults(owner("early"), ProfileSeed::default()))
        .await
        .unwrap();
    assert!(!early.verified);

    rentwise_db::run_migrations(&db).await.unwrap();

    let stored = repo.get(&owner("early")).await.unwrap();
    assert_eq!(stored.created_at, early.created_at);
    assert_eq!(stored.settings, ProfileSettings::default());

    let updated = repo
        .update(
            &owner("early"),
            ProfilePatch {
                phone: Some("+44 1632 960000".into()),
                ..ProfilePatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("+44 1632 960000"));
}
