use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

/// Error surfaced by the store traits.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate key")]
    Duplicate,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if is_unique_violation(db.as_ref()) => StoreError::Duplicate,
            _ => StoreError::Backend(e.into()),
        }
    }
}

/// Postgres reports unique index violations as SQLSTATE 23505.
pub fn is_unique_violation(db: &dyn sqlx::error::DatabaseError) -> bool {
    db.code().map(|c| c == "23505").unwrap_or(false)
}

/// Postgres-backed implementation of the store traits.
#[derive(Clone)]
pub struct PgStore {
    pub db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}
