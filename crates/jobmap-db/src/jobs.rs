//! Database operations for the `job_records` table.

use std::future::Future;

use jobmap_core::{JobRecord, SalaryType};
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `job_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRow {
    pub seq: i64,
    pub job_id: String,
    pub company_name: String,
    pub posting_date: String,
    pub country: String,
    pub location: String,
    pub publication_date: String,
    pub salary_max: String,
    pub salary_min: String,
    pub salary_type: String,
    pub job_title: String,
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        Self {
            company_name: row.company_name,
            posting_date: row.posting_date,
            job_id: row.job_id,
            country: row.country,
            location: row.location,
            publication_date: row.publication_date,
            salary_max: row.salary_max,
            salary_min: row.salary_min,
            salary_type: SalaryType::parse(&row.salary_type),
            job_title: row.job_title,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a job. Fails on a duplicate `job_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including unique
/// constraint violations.
pub async fn insert_job(pool: &SqlitePool, job: &JobRecord) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO job_records \
             (job_id, company_name, posting_date, country, location, publication_date, \
              salary_max, salary_min, salary_type, job_title) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&job.job_id)
    .bind(&job.company_name)
    .bind(&job.posting_date)
    .bind(&job.country)
    .bind(&job.location)
    .bind(&job.publication_date)
    .bind(&job.salary_max)
    .bind(&job.salary_min)
    .bind(job.salary_type.as_str())
    .bind(&job.job_title)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrites every non-key column of the job with the same `job_id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that `job_id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn update_job(pool: &SqlitePool, job: &JobRecord) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE job_records SET \
             company_name = ?1, \
             posting_date = ?2, \
             country = ?3, \
             location = ?4, \
             publication_date = ?5, \
             salary_max = ?6, \
             salary_min = ?7, \
             salary_type = ?8, \
             job_title = ?9 \
         WHERE job_id = ?10",
    )
    .bind(&job.company_name)
    .bind(&job.posting_date)
    .bind(&job.country)
    .bind(&job.location)
    .bind(&job.publication_date)
    .bind(&job.salary_max)
    .bind(&job.salary_min)
    .bind(job.salary_type.as_str())
    .bind(&job.job_title)
    .bind(&job.job_id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound {
            job_id: job.job_id.clone(),
        });
    }
    Ok(())
}

/// Deletes the job with the given `job_id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that `job_id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn delete_job(pool: &SqlitePool, job_id: &str) -> Result<(), DbError> {
    let rows_affected = sqlx::query("DELETE FROM job_records WHERE job_id = ?1")
        .bind(job_id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound {
            job_id: job_id.to_string(),
        });
    }
    Ok(())
}

/// Returns every job in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_jobs(pool: &SqlitePool) -> Result<Vec<JobRow>, DbError> {
    let rows = sqlx::query_as::<_, JobRow>(
        "SELECT seq, job_id, company_name, posting_date, country, location, \
                publication_date, salary_max, salary_min, salary_type, job_title \
         FROM job_records \
         ORDER BY seq",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the number of stored jobs.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_jobs(pool: &SqlitePool) -> Result<u64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_records")
        .fetch_one(pool)
        .await?;
    Ok(u64::try_from(count).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Backend boundary
// ---------------------------------------------------------------------------

/// Durable storage for job records, keyed by `job_id`.
///
/// `scan` must return records in a stable order in which newly inserted
/// records come last; the record store mirrors that order.
pub trait JobBackend {
    fn insert(&self, job: &JobRecord) -> impl Future<Output = Result<(), DbError>> + Send;

    fn update(&self, job: &JobRecord) -> impl Future<Output = Result<(), DbError>> + Send;

    fn delete(&self, job_id: &str) -> impl Future<Output = Result<(), DbError>> + Send;

    fn scan(&self) -> impl Future<Output = Result<Vec<JobRecord>, DbError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, DbError>> + Send;
}

/// [`JobBackend`] over the SQLite `job_records` table.
#[derive(Debug, Clone)]
pub struct SqliteJobs {
    pool: SqlitePool,
}

impl SqliteJobs {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl JobBackend for SqliteJobs {
    async fn insert(&self, job: &JobRecord) -> Result<(), DbError> {
        insert_job(&self.pool, job).await
    }

    async fn update(&self, job: &JobRecord) -> Result<(), DbError> {
        update_job(&self.pool, job).await
    }

    async fn delete(&self, job_id: &str) -> Result<(), DbError> {
        delete_job(&self.pool, job_id).await
    }

    async fn scan(&self) -> Result<Vec<JobRecord>, DbError> {
        let rows = list_jobs(&self.pool).await?;
        Ok(rows.into_iter().map(JobRecord::from).collect())
    }

    async fn count(&self) -> Result<u64, DbError> {
        count_jobs(&self.pool).await
    }
}
