use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub deployment: String,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        dotenv().ok(); // Load from .env file if available
        let db_url = env::var("DB_URL").ok().or_else(|| {
            Some(format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                env::var("DB_USER").expect("DB_USER must be set"),
                env::var("DB_PASSWORD").expect("DB_PASSWORD must be set"),
                env::var("DB_HOST").expect("DB_HOST must be set"),
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                env::var("DB_NAME").expect("DB_NAME must be set"),
            ))
        });

        Config {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "brewtrace".to_string()),
            deployment: env::var("DEPLOYMENT")
                .expect("DEPLOYMENT must be set, this can be local, dev, stage, or prod"),
            db_url,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            app_name: "brewtrace-test".to_string(),
            deployment: "test".to_string(),
            db_url: None,
        }
    }
}


#[cfg(test)]
pub mod test_helpers {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    /// Fresh in-memory SQLite database with the full schema applied. Every
    /// test gets its own connection, so no cross-test cleanup is needed.
    pub async fn setup_test_db() -> DatabaseConnection {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run database migrations");

        db
    }
}
