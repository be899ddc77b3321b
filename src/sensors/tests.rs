use uuid::Uuid;

use super::models::SensorUpdate;
use super::services::{create_sensor, get_sensor, list_sensors, update_sensor};
use crate::common::errors::CoreError;
use crate::common::pagination::Page;
use crate::config::test_helpers::setup_test_db;

#[tokio::test]
async fn test_sensor_create_and_get() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();

    let sensor = create_sensor(&db, user_id, "Tilt red".to_string())
        .await
        .unwrap();
    assert_eq!(sensor.name, "Tilt red");
    assert_eq!(sensor.user_id, user_id);

    let fetched = get_sensor(&db, user_id, sensor.id).await.unwrap();
    assert_eq!(fetched, sensor);
}

#[tokio::test]
async fn test_sensor_blank_name_is_rejected() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();

    let result = create_sensor(&db, user_id, "   ".to_string()).await;
    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[tokio::test]
async fn test_sensor_rename_and_owner_reassignment() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();
    let new_owner_id = Uuid::new_v4();

    let sensor = create_sensor(&db, user_id, "Tilt red".to_string())
        .await
        .unwrap();
    let updated = update_sensor(
        &db,
        user_id,
        sensor.id,
        SensorUpdate {
            name: "Tilt red (garage)".to_string(),
            user_id: new_owner_id,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Tilt red (garage)");
    assert_eq!(updated.user_id, new_owner_id);

    // The previous owner no longer sees the sensor.
    let old_owner_view = get_sensor(&db, user_id, sensor.id).await;
    assert!(matches!(old_owner_view, Err(CoreError::NotFound { .. })));
    assert!(get_sensor(&db, new_owner_id, sensor.id).await.is_ok());
}

#[tokio::test]
async fn test_get_sensor_hides_foreign_rows() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();
    let other_user_id = Uuid::new_v4();

    let sensor = create_sensor(&db, user_id, "Tilt red".to_string())
        .await
        .unwrap();
    let result = get_sensor(&db, other_user_id, sensor.id).await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_list_sensors_is_scoped_and_ordered() {
    let db = setup_test_db().await;
    let user_id = Uuid::new_v4();
    let other_user_id = Uuid::new_v4();

    let first = create_sensor(&db, user_id, "Tilt red".to_string())
        .await
        .unwrap();
    let second = create_sensor(&db, user_id, "Tilt black".to_string())
        .await
        .unwrap();
    create_sensor(&db, other_user_id, "iSpindel".to_string())
        .await
        .unwrap();

    let listed = list_sensors(&db, user_id, &Page::default()).await.unwrap();
    let ids: Vec<Uuid> = listed.items.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(!listed.has_next_page);
    assert!(!listed.has_previous_page);
}
