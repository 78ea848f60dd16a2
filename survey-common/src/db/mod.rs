//! Survey persistence
//!
//! The request pipeline only sees the `Datastore` trait. Concrete stores:
//! - `MySqlDatastore`: production target, schema managed outside this service
//! - `SqliteDatastore`: local runs and tests, creates its own table

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::{DatabaseConfig, DatabaseTarget};
use crate::models::SurveyRecord;
use crate::Result;

/// Parameterized insert shared by both backends (MySQL and SQLite both accept
/// backtick-quoted identifiers and `?` placeholders).
pub(crate) const INSERT_SURVEY_SQL: &str = r#"
    INSERT INTO `survey_results`
    (`Organization`, `Contact_Person`, `Contact_Person_role`, `Email`, `Industry`, `Date`,
     `Overall_Score`, `Maturity_Stage`, `Strategy`, `Data`, `Technology`, `People`, `Governance`, `Recommendations`)
    VALUES
    (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Bind every `SurveyRecord` field in `INSERT_SURVEY_SQL` column order
macro_rules! bind_survey_record {
    ($query:expr, $record:expr) => {
        $query
            .bind(&$record.organization)
            .bind(&$record.contact_person)
            .bind(&$record.contact_person_role)
            .bind(&$record.email)
            .bind(&$record.industry)
            .bind($record.date)
            .bind($record.overall_score)
            .bind(&$record.maturity_stage)
            .bind($record.strategy)
            .bind($record.data)
            .bind($record.technology)
            .bind($record.people)
            .bind($record.governance)
            .bind(&$record.recommendations)
    };
}
pub(crate) use bind_survey_record;

mod mysql;
mod sqlite;

pub use mysql::MySqlDatastore;
pub use sqlite::SqliteDatastore;

/// Narrow persistence seam consumed by the request pipeline
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Insert one survey row as a single statement, returning the new row id
    async fn insert_survey_record(&self, record: &SurveyRecord) -> Result<i64>;
}

/// Open the configured datastore
///
/// Called once per process start. The pool closes when the last handle drops.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Datastore>> {
    match config.target()? {
        DatabaseTarget::MySql(options) => {
            let store = MySqlDatastore::connect(options).await?;
            info!("Connected to MySQL datastore");
            Ok(Arc::new(store))
        }
        DatabaseTarget::Sqlite(options) => {
            let store = SqliteDatastore::connect(options).await?;
            store.ensure_schema().await?;
            info!("Connected to SQLite datastore");
            Ok(Arc::new(store))
        }
    }
}
