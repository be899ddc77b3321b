use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::models::{
    ActiveModel, Column, Entity, MeasurementFilter, Model as Measurement, TemperatureUnit,
};
use crate::assignments::services::interval_contains;
use crate::batches::models::Model as Batch;
use crate::common::errors::{CoreError, CoreResult};
use crate::common::pagination::{Connection, Page};

pub async fn record_measurement(
    db: &DatabaseConnection,
    user_id: Uuid,
    sensor_id: Uuid,
    value: Decimal,
    unit: TemperatureUnit,
    recorded_at: Option<DateTime<Utc>>,
) -> CoreResult<Measurement> {
    let sensor = crate::sensors::services::find_owned(db, user_id, sensor_id)
        .await?
        .ok_or_else(|| CoreError::not_found("sensor", sensor_id))?;

    let now = Utc::now();
    let measurement = ActiveModel {
        id: Set(Uuid::new_v4()),
        value: Set(value),
        unit: Set(unit),
        recorded_at: Set(recorded_at.unwrap_or(now)),
        sensor_id: Set(sensor.id),
        user_id: Set(user_id),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await?;
    Ok(measurement)
}

/// Which batch was the sensor attached to at `recorded_at`?
///
/// Returns `None` both when no assignment interval contains the instant and
/// when the sensor is not visible to the caller, so a caller probing foreign
/// sensor ids learns nothing. Read-only: same inputs give the same answer
/// for as long as the assignment history is unchanged.
pub async fn resolve_batch_for_measurement(
    db: &DatabaseConnection,
    user_id: Uuid,
    sensor_id: Uuid,
    recorded_at: DateTime<Utc>,
) -> CoreResult<Option<Batch>> {
    if crate::sensors::services::find_owned(db, user_id, sensor_id)
        .await?
        .is_none()
    {
        return Ok(None);
    }
    resolve_batch_at(db, sensor_id, recorded_at).await
}

/// Attribution core, unscoped: callers must already have checked that the
/// sensor is visible to them.
///
/// Intervals for one sensor should never overlap; when they do anyway the
/// latest `attached_at` wins (ties broken by lowest id) and the anomaly is
/// logged rather than escalated, since readings must stay attributable even
/// from damaged history.
pub(crate) async fn resolve_batch_at(
    db: &impl ConnectionTrait,
    sensor_id: Uuid,
    recorded_at: DateTime<Utc>,
) -> CoreResult<Option<Batch>> {
    let candidates = crate::assignments::models::Entity::find()
        .filter(crate::assignments::models::Column::SensorId.eq(sensor_id))
        .filter(interval_contains(Expr::val(recorded_at)))
        .order_by_desc(crate::assignments::models::Column::AttachedAt)
        .order_by_asc(crate::assignments::models::Column::Id)
        .all(db)
        .await?;

    if candidates.len() > 1 {
        tracing::warn!(
            "sensor {sensor_id} has {} overlapping assignment intervals at {recorded_at}",
            candidates.len()
        );
    }

    let Some(winner) = candidates.first() else {
        return Ok(None);
    };
    crate::batches::models::Entity::find_by_id(winner.batch_id)
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn list_measurements(
    db: &DatabaseConnection,
    user_id: Uuid,
    filter: MeasurementFilter,
    page: &Page,
) -> CoreResult<Connection<Measurement>> {
    let offset = page.offset()?;
    let limit = page.limit();

    let mut query = Entity::find().filter(Column::UserId.eq(user_id));
    if let Some(sensor_id) = filter.sensor_id {
        query = query.filter(Column::SensorId.eq(sensor_id));
    }
    if let Some(batch_id) = filter.batch_id {
        // A filter naming a batch the caller does not own yields an empty
        // page, indistinguishable from a batch with no readings.
        if crate::batches::services::find_owned(db, user_id, batch_id)
            .await?
            .is_none()
        {
            return Ok(Connection::from_window(Vec::new(), offset, limit));
        }
        // Batch membership is derived: join the assignment history on sensor
        // and keep the readings whose recorded_at falls inside an interval of
        // this batch, using the same predicate the resolver applies.
        query = query
            .join(
                JoinType::InnerJoin,
                Entity::belongs_to(crate::assignments::models::Entity)
                    .from(Column::SensorId)
                    .to(crate::assignments::models::Column::SensorId)
                    .into(),
            )
            .filter(crate::assignments::models::Column::BatchId.eq(batch_id))
            .filter(interval_contains(Expr::col((Entity, Column::RecordedAt))));
    }

    let window = query
        .order_by_asc(Column::RecordedAt)
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit + 1)
        .all(db)
        .await?;
    Ok(Connection::from_window(window, offset, limit))
}
