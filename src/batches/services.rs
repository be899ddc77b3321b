use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::models::{ActiveModel, BatchCreate, BatchUpdate, Column, Entity, Model as Batch};
use crate::common::errors::{CoreError, CoreResult};
use crate::common::pagination::{Connection, Page};

pub async fn create_batch(
    db: &DatabaseConnection,
    user_id: Uuid,
    create: BatchCreate,
) -> CoreResult<Batch> {
    if create.name.trim().is_empty() {
        return Err(CoreError::validation("name", "must not be blank"));
    }
    let now = Utc::now();
    let batch = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(create.name),
        brewed_at: Set(create.brewed_at),
        bottled_at: Set(create.bottled_at),
        volume_litres: Set(create.volume_litres),
        original_gravity: Set(create.original_gravity),
        final_gravity: Set(create.final_gravity),
        notes: Set(create.notes),
        recipe_id: Set(create.recipe_id),
        user_id: Set(user_id),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await?;
    Ok(batch)
}

pub async fn get_batch(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> CoreResult<Batch> {
    find_owned(db, user_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("batch", id))
}

pub async fn update_batch(
    db: &DatabaseConnection,
    user_id: Uuid,
    id: Uuid,
    update: BatchUpdate,
) -> CoreResult<Batch> {
    if update.name.trim().is_empty() {
        return Err(CoreError::validation("name", "must not be blank"));
    }
    let batch = get_batch(db, user_id, id).await?;
    let mut active: ActiveModel = batch.into();
    active.name = Set(update.name);
    active.brewed_at = Set(update.brewed_at);
    active.bottled_at = Set(update.bottled_at);
    active.volume_litres = Set(update.volume_litres);
    active.original_gravity = Set(update.original_gravity);
    active.final_gravity = Set(update.final_gravity);
    active.notes = Set(update.notes);
    active.recipe_id = Set(update.recipe_id);
    active.last_updated = Set(Utc::now());
    let updated = active.update(db).await?;
    Ok(updated)
}

pub async fn list_batches(
    db: &DatabaseConnection,
    user_id: Uuid,
    page: &Page,
) -> CoreResult<Connection<Batch>> {
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

/// Batch lookup scoped to its owner; `None` covers both "does not exist"
/// and "belongs to someone else".
pub(crate) async fn find_owned(
    db: &impl ConnectionTrait,
    user_id: Uuid,
    id: Uuid,
) -> CoreResult<Option<Batch>> {
    Entity::find_by_id(id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}
