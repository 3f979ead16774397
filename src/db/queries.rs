//! Query functions over the jobs and subscribers tables.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::models::{Job, NewJob, Subscriber};
use crate::db::DbError;

fn job_from_row(row: &SqliteRow) -> Result<Job, sqlx::Error> {
    Ok(Job {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        company: row.try_get("company")?,
        url: row.try_get("url")?,
        source: row.try_get("source")?,
        posted_at: row.try_get("posted_at")?,
    })
}

fn subscriber_from_row(row: &SqliteRow) -> Result<Subscriber, sqlx::Error> {
    Ok(Subscriber {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        keywords: row.try_get("keywords")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a scraped job. Returns false when the URL was already known.
pub async fn insert_job(pool: &SqlitePool, job: &NewJob) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO jobs (title, company, url, source, posted_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.url)
    .bind(&job.source)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Most recent jobs, optionally filtered by a keyword against title/company.
pub async fn recent_jobs(
    pool: &SqlitePool,
    keyword: Option<&str>,
    limit: i64,
) -> Result<Vec<Job>, DbError> {
    let rows = match keyword {
        Some(kw) => {
            let pattern = format!("%{kw}%");
            sqlx::query(
                "SELECT id, title, company, url, source, posted_at FROM jobs
                 WHERE title LIKE ? OR company LIKE ?
                 ORDER BY posted_at DESC LIMIT ?",
            )
            .bind(&pattern)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                "SELECT id, title, company, url, source, posted_at FROM jobs
                 ORDER BY posted_at DESC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter()
        .map(|row| job_from_row(row).map_err(DbError::from))
        .collect()
}

pub async fn job_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Job>, DbError> {
    let row = sqlx::query(
        "SELECT id, title, company, url, source, posted_at FROM jobs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(job_from_row).transpose().map_err(DbError::from)
}

pub async fn job_count(pool: &SqlitePool) -> Result<i64, DbError> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM jobs")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("n")?)
}

/// Register a subscriber. Duplicate emails map to `DbError::DuplicateEmail`.
pub async fn insert_subscriber(
    pool: &SqlitePool,
    email: &str,
    keywords: &str,
) -> Result<i64, DbError> {
    let result = sqlx::query(
        "INSERT INTO subscribers (email, keywords, active, created_at)
         VALUES (?, ?, 1, ?)",
    )
    .bind(email)
    .bind(keywords)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DbError::DuplicateEmail),
        Err(e) => Err(e.into()),
    }
}

/// Deactivate a subscriber. Returns false when the email was not active.
pub async fn deactivate_subscriber(pool: &SqlitePool, email: &str) -> Result<bool, DbError> {
    let result = sqlx::query("UPDATE subscribers SET active = 0 WHERE email = ? AND active = 1")
        .bind(email)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn active_subscribers(pool: &SqlitePool) -> Result<Vec<Subscriber>, DbError> {
    let rows = sqlx::query(
        "SELECT id, email, keywords, active, created_at FROM subscribers WHERE active = 1",
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| subscriber_from_row(row).map_err(DbError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::Database;

    async fn test_pool(dir: &tempfile::TempDir) -> Database {
        let db = Database::new();
        let config = DatabaseConfig {
            url: format!("sqlite:{}/test.db", dir.path().display()),
            max_connections: 2,
        };
        db.connect(&config).await.unwrap();
        db
    }

    fn sample_job(url: &str) -> NewJob {
        NewJob {
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            url: url.to_string(),
            source: "acme".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_job_ignores_duplicate_urls() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_pool(&dir).await;
        let pool = db.pool().unwrap();

        assert!(insert_job(pool, &sample_job("https://a.test/1")).await.unwrap());
        assert!(!insert_job(pool, &sample_job("https://a.test/1")).await.unwrap());
        assert_eq!(job_count(pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn recent_jobs_filters_by_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_pool(&dir).await;
        let pool = db.pool().unwrap();

        insert_job(pool, &sample_job("https://a.test/1")).await.unwrap();
        let mut other = sample_job("https://a.test/2");
        other.title = "Data Scientist".to_string();
        insert_job(pool, &other).await.unwrap();

        let hits = recent_jobs(pool, Some("Backend"), 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Backend Engineer");

        let all = recent_jobs(pool, None, 10).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_subscriber_email_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_pool(&dir).await;
        let pool = db.pool().unwrap();

        insert_subscriber(pool, "a@b.test", "rust").await.unwrap();
        let err = insert_subscriber(pool, "a@b.test", "go").await.unwrap_err();
        assert!(matches!(err, DbError::DuplicateEmail));
    }

    #[tokio::test]
    async fn deactivation_removes_from_active_set() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_pool(&dir).await;
        let pool = db.pool().unwrap();

        insert_subscriber(pool, "a@b.test", "rust").await.unwrap();
        assert_eq!(active_subscribers(pool).await.unwrap().len(), 1);

        assert!(deactivate_subscriber(pool, "a@b.test").await.unwrap());
        assert!(active_subscribers(pool).await.unwrap().is_empty());

        // Already inactive
        assert!(!deactivate_subscriber(pool, "a@b.test").await.unwrap());
        // Unknown email
        assert!(!deactivate_subscriber(pool, "x@y.test").await.unwrap());
    }
}
