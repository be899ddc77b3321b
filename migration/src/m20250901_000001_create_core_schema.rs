use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create custom types for PostgreSQL (will be ignored by SQLite)
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .create_type(
                    Type::create()
                        .as_enum(TemperatureUnit::Table)
                        .values([TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit])
                        .to_owned(),
                )
                .await?;
        }

        // Create sensors table
        let mut sensors_table = Table::create()
            .table(Sensors::Table)
            .if_not_exists()
            .col(ColumnDef::new(Sensors::Name).string().not_null())
            .col(ColumnDef::new(Sensors::UserId).uuid().not_null())
            .col(
                ColumnDef::new(Sensors::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Sensors::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .to_owned();
        add_uuid_primary_key(manager, &mut sensors_table, Sensors::Id)?;
        manager.create_table(sensors_table).await?;

        // Create batches table
        let mut batches_table = Table::create()
            .table(Batches::Table)
            .if_not_exists()
            .col(ColumnDef::new(Batches::Name).string().not_null())
            .col(ColumnDef::new(Batches::BrewedAt).timestamp_with_time_zone())
            .col(ColumnDef::new(Batches::BottledAt).timestamp_with_time_zone())
            .col(
                ColumnDef::new(Batches::VolumeLitres)
                    .decimal_len(16, 6)
                    .null(),
            )
            .col(
                ColumnDef::new(Batches::OriginalGravity)
                    .decimal_len(8, 4)
                    .null(),
            )
            .col(
                ColumnDef::new(Batches::FinalGravity)
                    .decimal_len(8, 4)
                    .null(),
            )
            .col(ColumnDef::new(Batches::Notes).text())
            .col(ColumnDef::new(Batches::RecipeId).uuid())
            .col(ColumnDef::new(Batches::UserId).uuid().not_null())
            .col(
                ColumnDef::new(Batches::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Batches::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .to_owned();
        add_uuid_primary_key(manager, &mut batches_table, Batches::Id)?;
        manager.create_table(batches_table).await?;

        // Create sensor_assignments table
        let mut assignments_table = Table::create()
            .table(SensorAssignments::Table)
            .if_not_exists()
            .col(ColumnDef::new(SensorAssignments::SensorId).uuid().not_null())
            .col(ColumnDef::new(SensorAssignments::BatchId).uuid().not_null())
            .col(
                ColumnDef::new(SensorAssignments::Description)
                    .text()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(SensorAssignments::AttachedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(SensorAssignments::DetachedAt).timestamp_with_time_zone())
            .col(
                ColumnDef::new(SensorAssignments::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(SensorAssignments::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_sensor_assignments_sensor_id")
                    .from(SensorAssignments::Table, SensorAssignments::SensorId)
                    .to(Sensors::Table, Sensors::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_sensor_assignments_batch_id")
                    .from(SensorAssignments::Table, SensorAssignments::BatchId)
                    .to(Batches::Table, Batches::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .to_owned();
        add_uuid_primary_key(manager, &mut assignments_table, SensorAssignments::Id)?;
        manager.create_table(assignments_table).await?;

        // Create measurements table
        let mut measurements_table = Table::create()
            .table(Measurements::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Measurements::Value)
                    .decimal_len(16, 6)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Measurements::RecordedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(Measurements::SensorId).uuid().not_null())
            .col(ColumnDef::new(Measurements::UserId).uuid().not_null())
            .col(
                ColumnDef::new(Measurements::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Measurements::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_measurements_sensor_id")
                    .from(Measurements::Table, Measurements::SensorId)
                    .to(Sensors::Table, Sensors::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .to_owned();
        add_uuid_primary_key(manager, &mut measurements_table, Measurements::Id)?;

        // Add unit column with appropriate type based on database backend
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                measurements_table.col(
                    ColumnDef::new(Measurements::Unit)
                        .custom(TemperatureUnit::Table)
                        .not_null(),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                measurements_table.col(ColumnDef::new(Measurements::Unit).text().not_null());
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(measurements_table).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Measurements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SensorAssignments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Batches::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sensors::Table).if_exists().to_owned())
            .await?;

        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .drop_type(
                    Type::drop()
                        .name(TemperatureUnit::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

/// Add an ID column with appropriate type and default based on database backend
fn add_uuid_primary_key<T>(
    manager: &SchemaManager<'_>,
    table: &mut TableCreateStatement,
    id_column: T,
) -> Result<(), DbErr>
where
    T: IntoIden + 'static,
{
    match manager.get_database_backend() {
        sea_orm::DatabaseBackend::Postgres => {
            table.col(
                ColumnDef::new(id_column)
                    .uuid()
                    .not_null()
                    .primary_key()
                    .default(Expr::cust("uuid_generate_v4()")),
            );
        }
        sea_orm::DatabaseBackend::Sqlite => {
            table.col(ColumnDef::new(id_column).uuid().not_null().primary_key());
        }
        _ => {
            return Err(DbErr::Custom("Unsupported database backend".to_string()));
        }
    }
    Ok(())
}

// All table and enum identifiers
#[derive(DeriveIden)]
enum Sensors {
    Table,
    Id,
    Name,
    UserId,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
    Name,
    BrewedAt,
    BottledAt,
    VolumeLitres,
    OriginalGravity,
    FinalGravity,
    Notes,
    RecipeId,
    UserId,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum SensorAssignments {
    Table,
    Id,
    SensorId,
    BatchId,
    Description,
    AttachedAt,
    DetachedAt,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Measurements {
    Table,
    Id,
    Value,
    Unit,
    RecordedAt,
    SensorId,
    UserId,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum TemperatureUnit {
    Table,
    Celsius,
    Fahrenheit,
}
