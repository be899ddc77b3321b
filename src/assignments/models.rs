use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A time-bounded link between one sensor and one batch: the sensor was
/// clipped onto the batch at `attached_at` and taken off at `detached_at`.
/// An absent `detached_at` means the sensor is still attached ("open").
///
/// Assignments are never rewritten to move a sensor: re-assigning closes the
/// open row and inserts a new one, so the full attachment history stays
/// queryable for attribution.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sensor_id: Uuid,
    pub batch_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub attached_at: DateTime<Utc>,
    pub detached_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::sensors::models::Entity",
        from = "Column::SensorId",
        to = "crate::sensors::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Sensors,
    #[sea_orm(
        belongs_to = "crate::batches::models::Entity",
        from = "Column::BatchId",
        to = "crate::batches::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Batches,
}

impl Related<crate::sensors::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensors.def()
    }
}

impl Related<crate::batches::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Typed listing filter; every field carries its own presence flag, so an
/// unset field means "no constraint" rather than "match the zero value".
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentFilter {
    pub sensor_id: Option<Uuid>,
    pub batch_id: Option<Uuid>,
}
