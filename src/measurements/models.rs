use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::errors::{CoreError, CoreResult};

/// One temperature reading from a sensor. `recorded_at` is the instant the
/// physical reading happened, which is what attribution keys on; `created_at`
/// is merely when the row was persisted.
///
/// There is deliberately no batch column: the sensor may be re-assigned after
/// the fact, and the correct batch is whichever assignment interval contained
/// `recorded_at` (see `services::resolve_batch_for_measurement`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "measurements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))")]
    pub value: Decimal,
    pub unit: TemperatureUnit,
    pub recorded_at: DateTime<Utc>,
    pub sensor_id: Uuid,
    pub user_id: Uuid,
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
}

impl Related<crate::sensors::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "temperature_unit")]
pub enum TemperatureUnit {
    #[sea_orm(string_value = "celsius")]
    #[serde(rename = "celsius")]
    Celsius,
    #[sea_orm(string_value = "fahrenheit")]
    #[serde(rename = "fahrenheit")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Map an external unit token onto the enum. Anything outside the fixed
    /// set is invalid input, not a storage concern.
    pub fn parse_token(token: &str) -> CoreResult<Self> {
        match token.to_ascii_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(CoreError::validation(
                "unit",
                format!("unknown temperature unit '{token}'"),
            )),
        }
    }
}

/// Typed listing filter; every field carries its own presence flag. The
/// `batch_id` constraint is resolved through assignment intervals, not a
/// stored column.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementFilter {
    pub sensor_id: Option<Uuid>,
    pub batch_id: Option<Uuid>,
}
