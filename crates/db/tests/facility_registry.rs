//! Integration tests for the facility registry and occupancy accounting.
//!
//! Exercises the repository layer against a real database:
//! - Code normalization and uniqueness
//! - Capacity validation on updates
//! - Delete protection while vehicles are parked
//! - Guarded occupancy increments/decrements

use assert_matches::assert_matches;
use parkfleet_core::error::CoreError;
use parkfleet_db::models::facility::{CreateFacility, UpdateFacility};
use parkfleet_db::models::vehicle_entry::RecordEntry;
use parkfleet_db::repositories::{FacilityRepo, UserRepo, VehicleEntryRepo};
use parkfleet_db::RepoError;
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_facility(code: &str, total_spaces: i32) -> CreateFacility {
    CreateFacility {
        code: code.to_string(),
        name: format!("Facility {code}"),
        total_spaces,
        hourly_rate: Decimal::new(1000, 2), // 10.00
        location: None,
    }
}

fn patch() -> UpdateFacility {
    UpdateFacility {
        name: None,
        total_spaces: None,
        occupied_spaces: None,
        hourly_rate: None,
        location: None,
    }
}

async fn seed_attendant(pool: &PgPool) -> i64 {
    let user = UserRepo::create(
        pool,
        &parkfleet_db::models::user::CreateUser {
            full_name: "Gate Attendant".to_string(),
            email: "attendant@example.com".to_string(),
            role: "attendant".to_string(),
            balance: None,
        },
    )
    .await
    .unwrap();
    user.id
}

// ---------------------------------------------------------------------------
// Registry CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_normalizes_code_and_starts_empty(pool: PgPool) {
    let facility = FacilityRepo::create(&pool, &new_facility("lot-a", 50))
        .await
        .unwrap();

    assert_eq!(facility.code, "LOT-A");
    assert_eq!(facility.total_spaces, 50);
    assert_eq!(facility.occupied_spaces, 0);
    assert!(!facility.is_full());

    let found = FacilityRepo::find_by_id(&pool, facility.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.code, "LOT-A");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    FacilityRepo::create(&pool, &new_facility("LOT-A", 10))
        .await
        .unwrap();

    // Case-insensitive: lot-a normalizes to the same code.
    let err = FacilityRepo::create(&pool, &new_facility("lot-a", 20))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_code_rejected(pool: PgPool) {
    let err = FacilityRepo::create(&pool, &new_facility("bad code!", 10))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::InvalidArgument(_)));

    let err = FacilityRepo::create(&pool, &new_facility("WAY-TOO-LONG-CODE", 10))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::InvalidArgument(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_is_ordered_by_code(pool: PgPool) {
    FacilityRepo::create(&pool, &new_facility("LOT-B", 10))
        .await
        .unwrap();
    FacilityRepo::create(&pool, &new_facility("LOT-A", 10))
        .await
        .unwrap();

    let facilities = FacilityRepo::list(&pool, None, None).await.unwrap();
    let codes: Vec<_> = facilities.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["LOT-A", "LOT-B"]);
}

// ---------------------------------------------------------------------------
// Capacity validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_shrink_below_occupancy(pool: PgPool) {
    let facility = FacilityRepo::create(&pool, &new_facility("LOT-A", 3))
        .await
        .unwrap();
    FacilityRepo::increment_occupancy(&pool, facility.id)
        .await
        .unwrap();
    FacilityRepo::increment_occupancy(&pool, facility.id)
        .await
        .unwrap();

    let err = FacilityRepo::update(
        &pool,
        facility.id,
        &UpdateFacility {
            total_spaces: Some(1),
            ..patch()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::CapacityExceeded(_)));

    // Shrinking to exactly the current occupancy is allowed.
    let updated = FacilityRepo::update(
        &pool,
        facility.id,
        &UpdateFacility {
            total_spaces: Some(2),
            ..patch()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.total_spaces, 2);
    assert!(updated.is_full());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_increment_fails_when_full(pool: PgPool) {
    let facility = FacilityRepo::create(&pool, &new_facility("LOT-A", 1))
        .await
        .unwrap();

    let updated = FacilityRepo::increment_occupancy(&pool, facility.id)
        .await
        .unwrap();
    assert_eq!(updated.occupied_spaces, 1);

    let err = FacilityRepo::increment_occupancy(&pool, facility.id)
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::CapacityExceeded(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_decrement_clamps_at_zero(pool: PgPool) {
    let facility = FacilityRepo::create(&pool, &new_facility("LOT-A", 5))
        .await
        .unwrap();

    // Decrementing an empty facility is clamped, not an error.
    let clamped = FacilityRepo::decrement_occupancy(&pool, facility.id)
        .await
        .unwrap();
    assert_eq!(clamped.occupied_spaces, 0);
}

// ---------------------------------------------------------------------------
// Delete protection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_blocked_while_vehicles_parked(pool: PgPool) {
    let attendant = seed_attendant(&pool).await;
    let facility = FacilityRepo::create(&pool, &new_facility("LOT-A", 5))
        .await
        .unwrap();

    let entry = VehicleEntryRepo::record_entry(
        &pool,
        &RecordEntry {
            plate_number: "ABC-123".to_string(),
            facility_id: facility.id,
        },
        attendant,
    )
    .await
    .unwrap();

    let err = FacilityRepo::delete(&pool, facility.id).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Conflict(_)));

    // After the vehicle exits, the delete goes through and takes the
    // closed session history with it.
    VehicleEntryRepo::record_exit(&pool, entry.id, attendant)
        .await
        .unwrap();
    FacilityRepo::delete(&pool, facility.id).await.unwrap();

    assert!(FacilityRepo::find_by_id(&pool, facility.id)
        .await
        .unwrap()
        .is_none());
    assert!(VehicleEntryRepo::find_by_id(&pool, entry.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_missing_facility_is_not_found(pool: PgPool) {
    let err = FacilityRepo::delete(&pool, 424242).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::NotFound { .. }));
}
