use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::models::{BatchCreate, BatchUpdate};
use super::services::{create_batch, get_batch, list_batches, update_batch};
use crate::common::errors::CoreError;
use crate::common::pagination::Page;
use crate::config::test_helpers::setup_test_db;

#[tokio::test]
async fn test_batch_optional_fields_stay_unset() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();

    let batch = create_batch(
        &db,
        user_id,
        BatchCreate {
            name: "West Coast IPA".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Unset means NULL, not zero: a batch with no gravity reading yet is
    // distinguishable from one that measured exactly 0.
    assert_eq!(batch.brewed_at, None);
    assert_eq!(batch.volume_litres, None);
    assert_eq!(batch.original_gravity, None);
    assert_eq!(batch.final_gravity, None);

    let fetched = get_batch(&db, user_id, batch.id).await.unwrap();
    assert_eq!(fetched, batch);
}

#[tokio::test]
async fn test_batch_create_with_measured_values() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();
    let brewed_at = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();

    let batch = create_batch(
        &db,
        user_id,
        BatchCreate {
            name: "Oatmeal Stout".to_string(),
            brewed_at: Some(brewed_at),
            volume_litres: Some(Decimal::new(21_500_000, 6)), // 21.5
            original_gravity: Some(Decimal::new(1_0520, 4)),  // 1.0520
            notes: Some("double mash".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(batch.brewed_at, Some(brewed_at));
    assert_eq!(batch.volume_litres, Some(Decimal::new(21_500_000, 6)));
    assert_eq!(batch.original_gravity, Some(Decimal::new(1_0520, 4)));
    assert_eq!(batch.bottled_at, None);
}

#[tokio::test]
async fn test_batch_update_is_full_replace() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();

    let batch = create_batch(
        &db,
        user_id,
        BatchCreate {
            name: "Oatmeal Stout".to_string(),
            notes: Some("double mash".to_string()),
            original_gravity: Some(Decimal::new(1_0520, 4)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let updated = update_batch(
        &db,
        user_id,
        batch.id,
        BatchUpdate {
            name: "Oatmeal Stout (keg 2)".to_string(),
            final_gravity: Some(Decimal::new(1_0110, 4)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Oatmeal Stout (keg 2)");
    assert_eq!(updated.final_gravity, Some(Decimal::new(1_0110, 4)));
    // Omitted optionals are cleared, not preserved.
    assert_eq!(updated.notes, None);
    assert_eq!(updated.original_gravity, None);
}

#[tokio::test]
async fn test_batch_blank_name_is_rejected() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();

    let result = create_batch(
        &db,
        user_id,
        BatchCreate {
            name: String::new(),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[tokio::test]
async fn test_batch_visibility_is_scoped_to_owner() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();
    let other_user_id = Uuid::new_v4();

    let batch = create_batch(
        &db,
        user_id,
        BatchCreate {
            name: "West Coast IPA".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let foreign = get_batch(&db, other_user_id, batch.id).await;
    assert!(matches!(foreign, Err(CoreError::NotFound { .. })));

    let listed = list_batches(&db, other_user_id, &Page::default())
        .await
        .unwrap();
    assert!(listed.items.is_empty());
}
