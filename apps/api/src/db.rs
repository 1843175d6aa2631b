use std::str::FromStr;

use anyhow::Result;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the SQLite database, applies pending migrations and returns the pool.
///
/// File databases run in WAL mode so readers never block on the single writer.
/// `sqlite::memory:` databases live only as long as their connection, so the
/// pool is pinned to one connection that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    info!("Opening SQLite database...");

    let in_memory = is_in_memory(database_url);
    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;

    info!("SQLite pool established (in_memory: {in_memory})");
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    create_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory database should open")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file.db?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://resumes.db"));
    }

    #[tokio::test]
    async fn test_migrations_create_all_tables() {
        let pool = test_pool().await;
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec![
                "certifications",
                "custom_sections",
                "education",
                "languages",
                "projects",
                "references",
                "resumes",
                "skills",
                "work_experiences",
            ]
        );
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("resumes.db").display());

        {
            let pool = create_pool(&url, 2).await.unwrap();
            sqlx::query(
                "INSERT INTO resumes (title, created_at, updated_at) VALUES ('kept', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')",
            )
            .execute(&pool)
            .await
            .unwrap();
            pool.close().await;
        }

        let pool = create_pool(&url, 2).await.unwrap();
        let title: String = sqlx::query_scalar("SELECT title FROM resumes")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(title, "kept");
    }
}
