pub mod account;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::app_error::AppError;

pub struct PostgresPersistence {
    pub pool: PgPool,
}

pub async fn postgres_persistence(database_url: &str) -> anyhow::Result<PostgresPersistence> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(PostgresPersistence { pool })
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
