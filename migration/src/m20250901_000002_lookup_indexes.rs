use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Partial unique index backing the one-open-assignment-per-sensor rule
        // under concurrent writers. Partial indexes are supported by both
        // PostgreSQL and SQLite, so this runs unconditionally.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_sensor_assignments_open \
                 ON sensor_assignments (sensor_id) WHERE detached_at IS NULL",
            )
            .await?;

        // ============ SENSOR_ASSIGNMENTS TABLE INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_sensor_assignments_sensor_id_detached_at")
                    .table(SensorAssignments::Table)
                    .col(SensorAssignments::SensorId)
                    .col(SensorAssignments::DetachedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sensor_assignments_batch_id")
                    .table(SensorAssignments::Table)
                    .col(SensorAssignments::BatchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sensor_assignments_attached_at")
                    .table(SensorAssignments::Table)
                    .col(SensorAssignments::AttachedAt)
                    .to_owned(),
            )
            .await?;

        // ============ MEASUREMENTS TABLE INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_measurements_sensor_id_recorded_at")
                    .table(Measurements::Table)
                    .col(Measurements::SensorId)
                    .col(Measurements::RecordedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_measurements_user_id")
                    .table(Measurements::Table)
                    .col(Measurements::UserId)
                    .to_owned(),
            )
            .await?;

        // ============ OWNER LOOKUP INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_sensors_user_id")
                    .table(Sensors::Table)
                    .col(Sensors::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_batches_user_id")
                    .table(Batches::Table)
                    .col(Batches::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_batches_user_id",
            "idx_sensors_user_id",
            "idx_measurements_user_id",
            "idx_measurements_sensor_id_recorded_at",
            "idx_sensor_assignments_attached_at",
            "idx_sensor_assignments_batch_id",
            "idx_sensor_assignments_sensor_id_detached_at",
            "uq_sensor_assignments_open",
        ] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sensors {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum SensorAssignments {
    Table,
    SensorId,
    BatchId,
    AttachedAt,
    DetachedAt,
}

#[derive(DeriveIden)]
enum Measurements {
    Table,
    SensorId,
    RecordedAt,
    UserId,
}
