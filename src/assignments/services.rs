use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use super::models::{ActiveModel, AssignmentFilter, Column, Entity, Model as Assignment};
use crate::common::errors::{CoreError, CoreResult};
use crate::common::pagination::{Connection, Page};

/// Interval containment predicate: an assignment covers instant `at` when
/// `attached_at <= at` and it is either still open or detached at or after
/// `at`. The attribution resolver and the batch-filtered measurement listing
/// both build on this one definition, so "which batch does this reading
/// resolve to" and "which readings list under this batch" cannot drift
/// apart. `at` may be a bound value or a column expression.
pub fn interval_contains(at: impl Into<SimpleExpr>) -> SimpleExpr {
    let at: SimpleExpr = at.into();
    Expr::col((Entity, Column::AttachedAt)).lte(at.clone()).and(
        Expr::col((Entity, Column::DetachedAt))
            .is_null()
            .or(Expr::col((Entity, Column::DetachedAt)).gte(at)),
    )
}

/// Attach a sensor to a batch from `attached_at` (default now) onwards.
///
/// A sensor can be attached to at most one batch at a time, whichever batch
/// that is; the open assignment must be detached explicitly before the next
/// one is created. The check-then-insert sequence runs in a transaction, and
/// the partial unique index on `(sensor_id) WHERE detached_at IS NULL` backs
/// it when two requests race past the check (the resulting unique violation
/// surfaces as the same `Conflict`).
pub async fn assign(
    db: &DatabaseConnection,
    user_id: Uuid,
    batch_id: Uuid,
    sensor_id: Uuid,
    description: Option<String>,
    attached_at: Option<DateTime<Utc>>,
) -> CoreResult<Assignment> {
    let sensor = crate::sensors::services::find_owned(db, user_id, sensor_id)
        .await?
        .ok_or_else(|| CoreError::not_found("sensor", sensor_id))?;
    let batch = crate::batches::services::find_owned(db, user_id, batch_id)
        .await?
        .ok_or_else(|| CoreError::not_found("batch", batch_id))?;

    let attached_at = attached_at.unwrap_or_else(Utc::now);

    let txn = db.begin().await?;
    if let Some(open) = find_open_assignment(&txn, sensor.id).await? {
        return Err(CoreError::conflict(
            "sensor assignment",
            format!(
                "sensor '{}' already has an open assignment to batch {}; detach it first",
                sensor.name, open.batch_id
            ),
        ));
    }
    let now = Utc::now();
    let assignment = ActiveModel {
        id: Set(Uuid::new_v4()),
        sensor_id: Set(sensor.id),
        batch_id: Set(batch.id),
        description: Set(description.unwrap_or_default()),
        attached_at: Set(attached_at),
        detached_at: Set(None),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::debug!(
        "attached sensor {} to batch {} from {attached_at}",
        sensor.id,
        batch.id
    );
    Ok(assignment)
}

/// Overwrite an assignment's description and interval bounds.
///
/// This is a full replace, not a merge: an absent `description` clears the
/// stored text, and an absent `detached_at` re-opens the assignment. A
/// re-open is refused while the sensor has another open assignment, since
/// two simultaneously open attachments would make attribution ambiguous.
pub async fn update_assignment(
    db: &DatabaseConnection,
    user_id: Uuid,
    id: Uuid,
    description: Option<String>,
    attached_at: DateTime<Utc>,
    detached_at: Option<DateTime<Utc>>,
) -> CoreResult<Assignment> {
    let assignment = find_owned(db, user_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("sensor assignment", id))?;

    if let Some(detached) = detached_at {
        if detached < attached_at {
            return Err(CoreError::validation(
                "detached_at",
                "must not precede attached_at",
            ));
        }
    }

    let txn = db.begin().await?;
    if detached_at.is_none() {
        if let Some(open) = find_open_assignment(&txn, assignment.sensor_id).await? {
            if open.id != assignment.id {
                return Err(CoreError::conflict(
                    "sensor assignment",
                    format!(
                        "sensor already has an open assignment to batch {}",
                        open.batch_id
                    ),
                ));
            }
        }
    }

    let mut active: ActiveModel = assignment.into();
    active.description = Set(description.unwrap_or_default());
    active.attached_at = Set(attached_at);
    active.detached_at = Set(detached_at);
    active.last_updated = Set(Utc::now());
    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// The assignment currently keeping the sensor attached, if any.
pub async fn find_open_assignment(
    db: &impl ConnectionTrait,
    sensor_id: Uuid,
) -> CoreResult<Option<Assignment>> {
    Entity::find()
        .filter(Column::SensorId.eq(sensor_id))
        .filter(Column::DetachedAt.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn list_assignments(
    db: &DatabaseConnection,
    user_id: Uuid,
    filter: AssignmentFilter,
    page: &Page,
) -> CoreResult<Connection<Assignment>> {
    let offset = page.offset()?;
    let limit = page.limit();

    let mut query = Entity::find()
        .join(JoinType::InnerJoin, super::models::Relation::Sensors.def())
        .filter(crate::sensors::models::Column::UserId.eq(user_id));
    if let Some(sensor_id) = filter.sensor_id {
        query = query.filter(Column::SensorId.eq(sensor_id));
    }
    if let Some(batch_id) = filter.batch_id {
        query = query.filter(Column::BatchId.eq(batch_id));
    }

    let window = query
        .order_by_asc(Column::AttachedAt)
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit + 1)
        .all(db)
        .await?;
    Ok(Connection::from_window(window, offset, limit))
}

/// Assignment lookup scoped through its sensor's owner; `None` covers both
/// "does not exist" and "belongs to someone else".
pub(crate) async fn find_owned(
    db: &impl ConnectionTrait,
    user_id: Uuid,
    id: Uuid,
) -> CoreResult<Option<Assignment>> {
    Entity::find_by_id(id)
        .join(JoinType::InnerJoin, super::models::Relation::Sensors.def())
        .filter(crate::sensors::models::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}
