use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use youtube::Credentials;

use crate::kernel::BaseCredentialStore;

/// The persisted YouTube OAuth credential set.
///
/// The table holds at most one row; every write replaces it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct YoutubeToken {
    pub id: i32,
    /// Credentials in Google's "authorized user" JSON layout
    pub credentials_json: String,
}

impl YoutubeToken {
    /// The stored row, if any
    pub async fn find_current(pool: &PgPool) -> Result<Option<Self>> {
        let token = sqlx::query_as::<_, Self>(
            "SELECT id, credentials_json FROM youtube_tokens ORDER BY id LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;
        Ok(token)
    }

    pub async fn read_credentials(scopes: &[String], pool: &PgPool) -> Result<Option<Credentials>> {
        let Some(row) = Self::find_current(pool).await? else {
            return Ok(None);
        };
        let credentials = Credentials::from_authorized_user_info(&row.credentials_json, scopes)?;
        Ok(Some(credentials))
    }

    /// Replace the stored credential set in one transaction
    pub async fn write_credentials(credentials: &Credentials, pool: &PgPool) -> Result<Self> {
        let json = credentials.to_json()?;

        let mut tx = pool.begin().await?;
        // Concurrent writers would otherwise each delete nothing and insert a row
        sqlx::query("LOCK TABLE youtube_tokens IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM youtube_tokens")
            .execute(&mut *tx)
            .await?;
        let token = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO youtube_tokens (credentials_json)
            VALUES ($1)
            RETURNING id, credentials_json
            "#,
        )
        .bind(json)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(token)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM youtube_tokens")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

/// Postgres-backed credential store
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCredentialStore for PostgresCredentialStore {
    async fn read_credentials(&self, scopes: &[String]) -> Result<Option<Credentials>> {
        YoutubeToken::read_credentials(scopes, &self.pool).await
    }

    async fn write_credentials(&self, credentials: &Credentials) -> Result<()> {
        YoutubeToken::write_credentials(credentials, &self.pool).await?;
        Ok(())
    }
}
