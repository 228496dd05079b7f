use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::PreferenceRepository;
use crate::models::{MosaicStyle, UserPreference};

/// Preference store backed by a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    /// Open the database at `path`, creating file and schema if
    /// missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::init(pool).await
    }

    /// In-memory database for ephemeral runs and tests.
    pub async fn open_in_memory() -> Result<Self> {
        // A pooled :memory: database vanishes with its connection, so
        // pin a single long-lived one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS user_preference (
                user_id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                picture_url TEXT,
                selected_style TEXT
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Close the pool explicitly. Required when dropping in an async
    /// context (e.g. tests with #[tokio::test]).
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl PreferenceRepository for SqlitePreferenceStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserPreference>> {
        let row = sqlx::query(
            "SELECT user_id, display_name, picture_url, selected_style
             FROM user_preference WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let selected_style = row
                .get::<Option<String>, _>("selected_style")
                .map(|raw| MosaicStyle::from_str(&raw))
                .transpose()?;
            Ok(UserPreference {
                user_id: row.get("user_id"),
                display_name: row.get("display_name"),
                picture_url: row.get("picture_url"),
                selected_style,
            })
        })
        .transpose()
    }

    async fn put_user(
        &self,
        user_id: &str,
        display_name: &str,
        picture_url: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_preference (user_id, display_name, picture_url)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id) DO UPDATE SET
                display_name = excluded.display_name,
                picture_url = excluded.picture_url",
        )
        .bind(user_id)
        .bind(display_name)
        .bind(picture_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_style(&self, user_id: &str, style: MosaicStyle) -> Result<()> {
        sqlx::query("UPDATE user_preference SET selected_style = ?2 WHERE user_id = ?1")
            .bind(user_id)
            .bind(style.wire_name())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
