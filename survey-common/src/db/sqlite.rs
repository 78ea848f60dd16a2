//! SQLite datastore for local runs and tests

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::{bind_survey_record, Datastore, INSERT_SURVEY_SQL};
use crate::models::SurveyRecord;
use crate::Result;

/// Datastore backed by a SQLite `survey_results` table
#[derive(Clone)]
pub struct SqliteDatastore {
    pool: SqlitePool,
}

impl SqliteDatastore {
    pub async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Private in-memory database with the survey table already created
    ///
    /// Pinned to a single connection that never expires, so the data lives
    /// as long as the datastore.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with("sqlite::memory:".parse::<SqliteConnectOptions>()?)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create `survey_results` if it does not exist (idempotent)
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS survey_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                Organization TEXT NOT NULL,
                Contact_Person TEXT NOT NULL,
                Contact_Person_role TEXT NOT NULL,
                Email TEXT NOT NULL,
                Industry TEXT NOT NULL,
                Date DATE NOT NULL,
                Overall_Score REAL NOT NULL DEFAULT 0,
                Maturity_Stage TEXT NOT NULL,
                Strategy REAL NOT NULL DEFAULT 0,
                Data REAL NOT NULL DEFAULT 0,
                Technology REAL NOT NULL DEFAULT 0,
                People REAL NOT NULL DEFAULT 0,
                Governance REAL NOT NULL DEFAULT 0,
                Recommendations TEXT NOT NULL DEFAULT ''
                    CHECK (length(Recommendations) <= 2500)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Datastore for SqliteDatastore {
    async fn insert_survey_record(&self, record: &SurveyRecord) -> Result<i64> {
        let result = bind_survey_record!(sqlx::query(INSERT_SURVEY_SQL), record)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        debug!(survey_id = id, "Inserted survey row");
        Ok(id)
    }
}
