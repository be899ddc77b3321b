use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A brew batch. Brew/bottle dates and the volume/gravity readings are
/// genuinely optional ("not yet measured"), so they are nullable columns
/// rather than zero-valued sentinels. `recipe_id` points at a recipe managed
/// by the surrounding application; no foreign key is enforced here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub brewed_at: Option<DateTime<Utc>>,
    pub bottled_at: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))", nullable)]
    pub volume_litres: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))", nullable)]
    pub original_gravity: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))", nullable)]
    pub final_gravity: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub recipe_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::assignments::models::Entity")]
    SensorAssignments,
}

impl Related<crate::assignments::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchCreate {
    pub name: String,
    pub brewed_at: Option<DateTime<Utc>>,
    pub bottled_at: Option<DateTime<Utc>>,
    pub volume_litres: Option<Decimal>,
    pub original_gravity: Option<Decimal>,
    pub final_gravity: Option<Decimal>,
    pub notes: Option<String>,
    pub recipe_id: Option<Uuid>,
}

/// Mutable batch fields, applied with full-replace semantics: an unset
/// optional clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub name: String,
    pub brewed_at: Option<DateTime<Utc>>,
    pub bottled_at: Option<DateTime<Utc>>,
    pub volume_litres: Option<Decimal>,
    pub original_gravity: Option<Decimal>,
    pub final_gravity: Option<Decimal>,
    pub notes: Option<String>,
    pub recipe_id: Option<Uuid>,
}
