//! MySQL datastore

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::debug;

use super::{bind_survey_record, Datastore, INSERT_SURVEY_SQL};
use crate::models::SurveyRecord;
use crate::{Error, Result};

/// Datastore backed by a MySQL/MariaDB `survey_results` table
#[derive(Clone)]
pub struct MySqlDatastore {
    pool: MySqlPool,
}

impl MySqlDatastore {
    pub async fn connect(options: MySqlConnectOptions) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Datastore for MySqlDatastore {
    async fn insert_survey_record(&self, record: &SurveyRecord) -> Result<i64> {
        let result = bind_survey_record!(sqlx::query(INSERT_SURVEY_SQL), record)
            .execute(&self.pool)
            .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| Error::Internal(format!("Row id out of range: {}", result.last_insert_id())))?;
        debug!(survey_id = id, "Inserted survey row");
        Ok(id)
    }
}
