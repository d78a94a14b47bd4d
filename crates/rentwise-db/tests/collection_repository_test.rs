//! Integration tests for the owner-scoped collection repositories using
//! in-memory SurrealDB.

use chrono::{Duration, TimeZone, Utc};
use rentwise_core::error::RentalError;
use rentwise_core::models::application::{ApplicationStatus, CreateApplication};
use rentwise_core::models::maintenance::{
    CreateMaintenanceRequest, MaintenanceStatus, MaintenanceStatusChange,
};
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::payment::{CreatePayment, PaymentStatus};
use rentwise_core::models::property::{CreateProperty, PropertyStatus};
use rentwise_core::models::tenancy::{CreateTenancy, LeaseInfo, PaymentInfo, PersonalInfo};
use rentwise_core::patch::{ApplicationPatch, PropertyPatch};
use rentwise_core::repository::{
    ApplicationRepository, ListFilter, MaintenanceRepository, PaymentRepository,
    PropertyRepository, RentalStore, TenancyRepository,
};
use rentwise_db::SurrealRentalStore;
use rust_decimal_macros::dec;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> SurrealRentalStore<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentwise_db::run_migrations(&db).await.unwrap();
    SurrealRentalStore::new(db)
}

fn owner(raw: &str) -> OwnerId {
    OwnerId::parse(raw).unwrap()
}

fn property_input(owner_id: &OwnerId, title: &str, status: PropertyStatus) -> CreateProperty {
    CreateProperty {
        owner_id: owner_id.clone(),
        title: title.into(),
        description: "Two-bed flat".into(),
        address: "1 High Street".into(),
        city: "Leeds".into(),
        state: "West Yorkshire".into(),
        postal_code: "LS1 1AA".into(),
        price: dec!(1200.00),
        bedrooms: 2,
        bathrooms: 1.5,
        square_feet: Some(750),
        property_type: "apartment".into(),
        status,
        images: vec!["https://cdn.example.com/p.jpg".into()],
    }
}

// -----------------------------------------------------------------------
// Properties
// -----------------------------------------------------------------------

#[tokio::test]
async fn property_round_trips_through_store() {
    let store = setup().await;
    let me = owner("owner-a");

    let created = store
        .properties()
        .create(property_input(&me, "Flat 1", PropertyStatus::Available))
        .await
        .unwrap();

    let fetched = store.properties().get_by_id(&me, created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, "Flat 1");
    assert_eq!(fetched.price, dec!(1200.00));
    assert_eq!(fetched.square_feet, Some(750));
    assert_eq!(fetched.status, PropertyStatus::Available);
}

#[tokio::test]
async fn lists_only_contain_the_callers_records() {
    let store = setup().await;
    let a = owner("owner-a");
    let b = owner("owner-b");

    for title in ["A1", "A2"] {
        store
            .properties()
            .create(property_input(&a, title, PropertyStatus::Available))
            .await
            .unwrap();
    }
    store
        .properties()
        .create(property_input(&b, "B1", PropertyStatus::Occupied))
        .await
        .unwrap();

    let listed = store
        .properties()
        .list_by_owner(&a, &ListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|p| p.owner_id == a));
}

#[tokio::test]
async fn another_owners_record_is_not_found() {
    let store = setup().await;
    let a = owner("owner-a");
    let b = owner("owner-b");

    let theirs = store
        .properties()
        .create(property_input(&b, "B1", PropertyStatus::Available))
        .await
        .unwrap();

    let err = store.properties().get_by_id(&a, theirs.id).await.unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .properties()
        .update(
            &a,
            theirs.id,
            PropertyPatch {
                title: Some("hijacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let untouched = store.properties().get_by_id(&b, theirs.id).await.unwrap();
    assert_eq!(untouched.title, "B1");
}

#[tokio::test]
async fn property_status_filter_and_update() {
    let store = setup().await;
    let me = owner("owner-a");

    let flat = store
        .properties()
        .create(property_input(&me, "Flat", PropertyStatus::Available))
        .await
        .unwrap();
    store
        .properties()
        .create(property_input(&me, "House", PropertyStatus::Unlisted))
        .await
        .unwrap();

    let updated = store
        .properties()
        .update(
            &me,
            flat.id,
            PropertyPatch {
                status: Some(PropertyStatus::Occupied),
                price: Some(dec!(1350.00)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, PropertyStatus::Occupied);
    assert_eq!(updated.price, dec!(1350.00));
    assert_eq!(updated.title, "Flat");

    let occupied = store
        .properties()
        .list_by_owner(&me, &ListFilter::with_statuses([PropertyStatus::Occupied]))
        .await
        .unwrap();
    assert_eq!(occupied.len(), 1);
    assert_eq!(occupied[0].id, flat.id);
}

#[tokio::test]
async fn property_square_footage_can_be_cleared() {
    let store = setup().await;
    let me = owner("owner-a");

    let flat = store
        .properties()
        .create(property_input(&me, "Flat", PropertyStatus::Available))
        .await
        .unwrap();
    assert_eq!(flat.square_feet, Some(750));

    let resized = store
        .properties()
        .update(
            &me,
            flat.id,
            PropertyPatch {
                square_feet: Some(Some(810)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(resized.square_feet, Some(810));

    let cleared = store
        .properties()
        .update(
            &me,
            flat.id,
            PropertyPatch {
                square_feet: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.square_feet, None);
    assert_eq!(cleared.title, "Flat");
}

// -----------------------------------------------------------------------
// Applications
// -----------------------------------------------------------------------

fn application_input(
    owner_id: &OwnerId,
    name: &str,
    submitted_at: chrono::DateTime<Utc>,
) -> CreateApplication {
    CreateApplication {
        owner_id: owner_id.clone(),
        property_id: Uuid::new_v4(),
        applicant_id: format!("applicant-{name}"),
        applicant_name: name.into(),
        applicant_email: format!("{name}@example.com"),
        submitted_at: Some(submitted_at),
    }
}

#[tokio::test]
async fn applications_list_newest_first_with_limit() {
    let store = setup().await;
    let me = owner("owner-a");
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    for (i, name) in ["ann", "bob", "cat"].iter().enumerate() {
        store
            .applications()
            .create(application_input(&me, name, base + Duration::days(i as i64)))
            .await
            .unwrap();
    }

    let latest_two = store
        .applications()
        .list_by_owner(&me, &ListFilter::default().limit(2))
        .await
        .unwrap();
    let names: Vec<_> = latest_two.iter().map(|a| a.applicant_name.as_str()).collect();
    assert_eq!(names, vec!["cat", "bob"]);
}

#[tokio::test]
async fn deciding_an_application_stamps_review_time() {
    let store = setup().await;
    let me = owner("owner-a");

    let app = store
        .applications()
        .create(application_input(&me, "dee", Utc::now()))
        .await
        .unwrap();
    assert_eq!(app.status, ApplicationStatus::Submitted);
    assert!(app.reviewed_at.is_none());

    let decided = store
        .applications()
        .update(
            &me,
            app.id,
            ApplicationPatch {
                status: Some(ApplicationStatus::Approved),
                review_notes: Some("Good references".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(decided.status, ApplicationStatus::Approved);
    assert!(decided.reviewed_at.is_some());
    assert_eq!(decided.review_notes.as_deref(), Some("Good references"));

    let pending = store
        .applications()
        .list_by_owner(&me, &ListFilter::with_statuses(ApplicationStatus::PENDING))
        .await
        .unwrap();
    assert!(pending.is_empty());
}

// -----------------------------------------------------------------------
// Maintenance, tenancies, payments
// -----------------------------------------------------------------------

#[tokio::test]
async fn maintenance_completion_records_completion_time() {
    let store = setup().await;
    let me = owner("owner-a");

    let request = store
        .maintenance()
        .create(CreateMaintenanceRequest {
            owner_id: me.clone(),
            property_id: Uuid::new_v4(),
            tenant_id: None,
            title: "Leaking tap".into(),
            description: "Kitchen tap drips".into(),
            category: "plumbing".into(),
            priority: "low".into(),
        })
        .await
        .unwrap();
    assert_eq!(request.status, MaintenanceStatus::Submitted);

    let visit = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
    let acknowledged = store
        .maintenance()
        .update_status(
            &me,
            request.id,
            MaintenanceStatusChange {
                status: MaintenanceStatus::Acknowledged,
                scheduled_at: Some(visit),
            },
        )
        .await
        .unwrap();
    assert_eq!(acknowledged.scheduled_at, Some(visit));
    assert!(acknowledged.completed_at.is_none());

    let done = store
        .maintenance()
        .update_status(
            &me,
            request.id,
            MaintenanceStatusChange {
                status: MaintenanceStatus::Completed,
                scheduled_at: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(done.status, MaintenanceStatus::Completed);
    assert!(done.completed_at.is_some());
    assert_eq!(done.scheduled_at, Some(visit));
}

#[tokio::test]
async fn tenancy_blocks_survive_storage() {
    let store = setup().await;
    let me = owner("owner-a");
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    store
        .tenancies()
        .create(CreateTenancy {
            owner_id: me.clone(),
            property_id: Uuid::new_v4(),
            personal_info: PersonalInfo {
                full_name: "Tia Tenant".into(),
                ..Default::default()
            },
            lease_info: LeaseInfo {
                start_date: Some(start),
                end_date: None,
                monthly_rent: dec!(950.00),
            },
            payment_info: PaymentInfo::default(),
        })
        .await
        .unwrap();

    let tenancies = store
        .tenancies()
        .list_by_owner(&me, &ListFilter::default())
        .await
        .unwrap();
    assert_eq!(tenancies.len(), 1);
    assert_eq!(tenancies[0].personal_info.full_name, "Tia Tenant");
    assert_eq!(tenancies[0].lease_info.start_date, Some(start));
    assert_eq!(tenancies[0].lease_info.monthly_rent, dec!(950.00));
}

#[tokio::test]
async fn hand_written_partial_tenancy_normalizes() {
    let store = setup().await;
    let me = owner("owner-a");
    // Simulate a record written by another client with a sparse block.
    let raw = Surreal::new::<Mem>(()).await.unwrap();
    raw.use_ns("test").use_db("test").await.unwrap();
    rentwise_db::run_migrations(&raw).await.unwrap();
    raw.query(
        "CREATE type::record('tenancy', $id) SET owner_id = $owner_id, \
         property_id = $property_id, lease_info = { monthly_rent: 700 }",
    )
    .bind(("id", Uuid::new_v4().to_string()))
    .bind(("owner_id", me.as_str().to_string()))
    .bind(("property_id", Uuid::new_v4().to_string()))
    .await
    .unwrap()
    .check()
    .unwrap();
    let raw_store = SurrealRentalStore::new(raw);

    let tenancies = raw_store
        .tenancies()
        .list_by_owner(&me, &ListFilter::default())
        .await
        .unwrap();
    assert_eq!(tenancies.len(), 1);
    assert_eq!(tenancies[0].lease_info.monthly_rent, dec!(700));
    assert!(tenancies[0].lease_info.start_date.is_none());
    assert_eq!(tenancies[0].personal_info, PersonalInfo::default());

    // The fixture store is untouched.
    assert!(
        store
            .tenancies()
            .list_by_owner(&me, &ListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn payments_are_newest_first_by_payment_date() {
    let store = setup().await;
    let me = owner("owner-a");
    let property = Uuid::new_v4();

    for (day, amount) in [(3, dec!(100)), (20, dec!(300)), (10, dec!(200))] {
        store
            .payments()
            .create(CreatePayment {
                owner_id: me.clone(),
                property_id: property,
                tenant_id: None,
                amount,
                payment_date: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
                due_date: None,
                status: PaymentStatus::Completed,
            })
            .await
            .unwrap();
    }

    let payments = store
        .payments()
        .list_by_owner(&me, &ListFilter::default())
        .await
        .unwrap();
    let amounts: Vec<_> = payments.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![dec!(300), dec!(200), dec!(100)]);
}

#[tokio::test]
async fn unmigrated_database_lists_empty_or_reports_schema() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("fresh").await.unwrap();
    let store = SurrealRentalStore::new(db);

    match store
        .payments()
        .list_by_owner(&owner("owner-a"), &ListFilter::default())
        .await
    {
        Ok(items) => assert!(items.is_empty()),
        Err(RentalError::SchemaNotReady { .. }) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}
