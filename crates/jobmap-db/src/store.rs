//! In-memory mirror of the backing job table.
//!
//! [`RecordStore`] holds every record in backing scan order and keeps that
//! mirror in step with the [`JobBackend`]: each mutation is persisted first
//! and applied to the mirror only once the backend has accepted it.

use std::collections::HashSet;

use chrono::Utc;
use jobmap_core::{CoreError, ImportTable, JobFields, JobRecord};
use thiserror::Error;

use crate::ids::fresh_job_id;
use crate::jobs::JobBackend;
use crate::DbError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("index {index} is out of range for {len} records")]
    OutOfRange { index: usize, len: usize },
    #[error("job id {0} already exists")]
    DuplicateId(String),
    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),
    #[error(
        "in-memory records diverged from the backing store \
         ({mirror} in memory, {backing} stored, first mismatch at {first_mismatch:?})"
    )]
    Diverged {
        mirror: usize,
        backing: usize,
        first_mismatch: Option<usize>,
    },
}

/// Why a single import row was not loaded.
#[derive(Debug, Error)]
pub enum ImportRowCause {
    #[error("malformed row: {0}")]
    Malformed(#[from] CoreError),
    #[error("job id {0} already exists")]
    DuplicateId(String),
    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),
}

/// A row-level import failure. `row` is the 1-based position among data rows.
#[derive(Debug, Error)]
#[error("row {row}: {cause}")]
pub struct ImportRowError {
    pub row: usize,
    #[source]
    pub cause: ImportRowCause,
}

#[derive(Debug, Default)]
pub struct BulkLoadReport {
    /// Records that were persisted, in input order.
    pub loaded: Vec<JobRecord>,
    pub errors: Vec<ImportRowError>,
}

impl BulkLoadReport {
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.errors.len()
    }
}

/// Where a caller's selection should land after a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionHint {
    Index(usize),
    Empty,
}

/// Mirror of a [`JobBackend`] in backing scan order.
///
/// Mutations are not cancel-safe: dropping one of their futures after the
/// backend write but before it completes leaves the backend ahead of the
/// mirror. [`RecordStore::verify`] detects that state.
pub struct RecordStore<B> {
    backend: B,
    records: Vec<JobRecord>,
    ids: HashSet<String>,
}

impl<B: JobBackend> RecordStore<B> {
    /// Build the mirror from a full scan of `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the scan fails.
    pub async fn open(backend: B) -> Result<Self, StoreError> {
        let records = backend.scan().await?;
        let ids = records.iter().map(|r| r.job_id.clone()).collect();
        tracing::debug!(count = records.len(), "record store opened");
        Ok(Self {
            backend,
            records,
            ids,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&JobRecord> {
        self.records.get(index)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&JobRecord, StoreError> {
        self.records.get(index).ok_or(StoreError::OutOfRange {
            index,
            len: self.records.len(),
        })
    }

    #[must_use]
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persist every data row of `table` and append the accepted ones in
    /// input order. Row failures are collected; loading never stops early.
    pub async fn bulk_load(&mut self, table: &ImportTable) -> BulkLoadReport {
        let mut report = BulkLoadReport::default();

        for (row, values) in table.data_rows() {
            match self.load_row(values).await {
                Ok(record) => report.loaded.push(record),
                Err(cause) => {
                    tracing::warn!(row, error = %cause, "import row rejected");
                    report.errors.push(ImportRowError { row, cause });
                }
            }
        }

        tracing::info!(
            loaded = report.loaded_count(),
            failed = report.failed(),
            "bulk load finished"
        );
        report
    }

    async fn load_row(&mut self, values: &[String]) -> Result<JobRecord, ImportRowCause> {
        let mut record = JobRecord::from_import_row(values)?;
        if record.job_id.trim().is_empty() {
            record.job_id = fresh_job_id(&self.ids);
        } else if self.ids.contains(&record.job_id) {
            return Err(ImportRowCause::DuplicateId(record.job_id));
        }

        self.backend.insert(&record).await?;
        self.push(record.clone());
        Ok(record)
    }

    /// Create a record from user-entered fields.
    ///
    /// A fresh identifier is generated when `job_id` is `None` or blank.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if `job_id` is already present, or
    /// [`StoreError::Persistence`] if the insert fails.
    pub async fn create(
        &mut self,
        fields: JobFields,
        job_id: Option<String>,
    ) -> Result<&JobRecord, StoreError> {
        let job_id = match job_id.filter(|id| !id.trim().is_empty()) {
            Some(id) if self.ids.contains(&id) => return Err(StoreError::DuplicateId(id)),
            Some(id) => id,
            None => fresh_job_id(&self.ids),
        };

        let record = JobRecord::stamped(job_id, fields, Utc::now());
        self.backend.insert(&record).await?;
        tracing::info!(job_id = %record.job_id, "job created");

        self.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Replace the record at `index` with `fields`, keeping its identifier
    /// and restamping both dates. A `salary_type` of `None` keeps the
    /// current salary type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] for an invalid index, or
    /// [`StoreError::Persistence`] if the backend rejects the update.
    pub async fn update(
        &mut self,
        index: usize,
        mut fields: JobFields,
    ) -> Result<&JobRecord, StoreError> {
        let current = self.at(index)?;
        let job_id = current.job_id.clone();
        if fields.salary_type.is_none() {
            fields.salary_type = Some(current.salary_type.clone());
        }
        let record = JobRecord::stamped(job_id, fields, Utc::now());
        self.backend.update(&record).await?;
        tracing::info!(job_id = %record.job_id, index, "job updated");

        self.records[index] = record;
        Ok(&self.records[index])
    }

    /// Delete the record at `index` and report where the selection belongs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] for an invalid index, or
    /// [`StoreError::Persistence`] if the backend rejects the delete.
    pub async fn delete(&mut self, index: usize) -> Result<SelectionHint, StoreError> {
        let job_id = self.at(index)?.job_id.clone();
        self.backend.delete(&job_id).await?;
        tracing::info!(job_id = %job_id, index, "job deleted");

        self.records.remove(index);
        self.ids.remove(&job_id);

        Ok(match self.records.len() {
            0 => SelectionHint::Empty,
            len => SelectionHint::Index(index.min(len - 1)),
        })
    }

    /// Compare the mirror against a fresh scan of the backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Diverged`] on any difference in length or
    /// content, or [`StoreError::Persistence`] if the scan fails.
    pub async fn verify(&self) -> Result<(), StoreError> {
        let backing = self.backend.scan().await?;
        let first_mismatch = self
            .records
            .iter()
            .zip(&backing)
            .position(|(mirror, stored)| mirror != stored);

        if first_mismatch.is_some() || backing.len() != self.records.len() {
            return Err(StoreError::Diverged {
                mirror: self.records.len(),
                backing: backing.len(),
                first_mismatch,
            });
        }
        Ok(())
    }

    fn push(&mut self, record: JobRecord) {
        self.ids.insert(record.job_id.clone());
        self.records.push(record);
    }
}

impl<B> std::fmt::Debug for RecordStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("len", &self.records.len())
            .finish_non_exhaustive()
    }
}
