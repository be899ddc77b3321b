use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A physical temperature sensor owned by one user. The UUID doubles as the
/// externally exposed identifier; everything else can change over the
/// sensor's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::assignments::models::Entity")]
    SensorAssignments,
    #[sea_orm(has_many = "crate::measurements::models::Entity")]
    Measurements,
}

impl Related<crate::assignments::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorAssignments.def()
    }
}

impl Related<crate::measurements::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Measurements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Mutable sensor fields: display name and owner reassignment. Applied with
/// full-replace semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorUpdate {
    pub name: String,
    pub user_id: Uuid,
}
