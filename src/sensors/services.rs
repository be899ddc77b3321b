use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::models::{ActiveModel, Column, Entity, Model as Sensor, SensorUpdate};
use crate::common::errors::{CoreError, CoreResult};
use crate::common::pagination::{Connection, Page};

pub async fn create_sensor(
    db: &DatabaseConnection,
    user_id: Uuid,
    name: String,
) -> CoreResult<Sensor> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name", "must not be blank"));
    }
    let now = Utc::now();
    let sensor = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        user_id: Set(user_id),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await?;
    Ok(sensor)
}

pub async fn get_sensor(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> CoreResult<Sensor> {
    find_owned(db, user_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("sensor", id))
}

pub async fn update_sensor(
    db: &DatabaseConnection,
    user_id: Uuid,
    id: Uuid,
    update: SensorUpdate,
) -> CoreResult<Sensor> {
    if update.name.trim().is_empty() {
        return Err(CoreError::validation("name", "must not be blank"));
    }
    let sensor = get_sensor(db, user_id, id).await?;
    let mut active: ActiveModel = sensor.into();
    active.name = Set(update.name);
    active.user_id = Set(update.user_id);
    active.last_updated = Set(Utc::now());
    let updated = active.update(db).await?;
    Ok(updated)
}

pub async fn list_sensors(
    db: &DatabaseConnection,
    user_id: Uuid,
    page: &Page,
) -> CoreResult<Connection<Sensor>> {
    let offset = page.offset()?;
    let limit = page.limit();

    let window = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit + 1)
        .all(db)
        .await?;
    Ok(Connection::from_window(window, offset, limit))
}

/// Sensor lookup scoped to its owner; `None` covers both "does not exist"
/// and "belongs to someone else".
pub(crate) async fn find_owned(
    db: &impl ConnectionTrait,
    user_id: Uuid,
    id: Uuid,
) -> CoreResult<Option<Sensor>> {
    Entity::find_by_id(id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}
