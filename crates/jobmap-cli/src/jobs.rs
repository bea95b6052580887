//! Job record command handlers for the CLI.
//!
//! Each handler takes the opened [`RecordStore`] and prints its result; the
//! store is the only path to the database for these commands.

use std::path::Path;

use clap::Args;
use jobmap_core::{JobFields, JobRecord, SalaryType};
use jobmap_db::{JobBackend, RecordStore, SelectionHint};

use crate::table::read_import_table;

/// Fields for `add`.
#[derive(Debug, Args)]
pub(crate) struct NewJobArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub country: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub salary_max: String,
    #[arg(long, default_value = "")]
    pub salary_min: String,
    /// `hourly`, `salary`, or free text
    #[arg(long)]
    pub salary_type: Option<String>,
    /// Use this identifier instead of generating one
    #[arg(long)]
    pub job_id: Option<String>,
}

impl NewJobArgs {
    fn into_parts(self) -> (JobFields, Option<String>) {
        let fields = JobFields {
            company_name: self.company,
            country: self.country,
            location: self.location,
            salary_max: self.salary_max,
            salary_min: self.salary_min,
            salary_type: self.salary_type.as_deref().map(SalaryType::parse),
            job_title: self.title,
        };
        (fields, self.job_id)
    }
}

/// Fields for `update`. Anything left out keeps its current value.
#[derive(Debug, Default, Args)]
pub(crate) struct UpdateJobArgs {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub salary_max: Option<String>,
    #[arg(long)]
    pub salary_min: Option<String>,
    #[arg(long)]
    pub salary_type: Option<String>,
}

impl UpdateJobArgs {
    pub(crate) fn merge_into(self, current: JobFields) -> JobFields {
        JobFields {
            company_name: self.company.unwrap_or(current.company_name),
            country: self.country.unwrap_or(current.country),
            location: self.location.unwrap_or(current.location),
            salary_max: self.salary_max.unwrap_or(current.salary_max),
            salary_min: self.salary_min.unwrap_or(current.salary_min),
            salary_type: self
                .salary_type
                .as_deref()
                .map(SalaryType::parse)
                .or(current.salary_type),
            job_title: self.title.unwrap_or(current.job_title),
        }
    }
}

pub(crate) fn format_list_line(index: usize, job: &JobRecord) -> String {
    format!(
        "{index:>4}  {}  {}  ({})",
        job.job_id, job.job_title, job.location
    )
}

fn print_record(job: &JobRecord) {
    println!("job id:       {}", job.job_id);
    println!("title:        {}", job.job_title);
    println!("company:      {}", job.company_name);
    println!("country:      {}", job.country);
    println!("location:     {}", job.location);
    println!("posted:       {}", job.posting_date);
    println!("published:    {}", job.publication_date);
    println!(
        "salary:       {} - {} ({})",
        job.salary_min, job.salary_max, job.salary_type
    );
}

/// Bulk-load a table file and report per-row failures.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed. Row-level
/// failures are printed, not propagated.
pub(crate) async fn run_import<B: JobBackend>(
    store: &mut RecordStore<B>,
    file: &Path,
) -> anyhow::Result<()> {
    let table = read_import_table(file)?;
    let report = store.bulk_load(&table).await;

    println!(
        "imported {} of {} row(s) from {}",
        report.loaded_count(),
        table.data_len(),
        file.display()
    );
    for error in &report.errors {
        println!("  {error}");
    }
    Ok(())
}

pub(crate) fn run_list<B: JobBackend>(store: &RecordStore<B>) {
    if store.is_empty() {
        println!("no jobs stored");
        return;
    }
    for (index, job) in store.records().iter().enumerate() {
        println!("{}", format_list_line(index, job));
    }
}

/// # Errors
///
/// Returns an error if `index` is out of range.
pub(crate) fn run_show<B: JobBackend>(
    store: &RecordStore<B>,
    index: usize,
) -> anyhow::Result<()> {
    print_record(store.at(index)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if the identifier is taken or the insert fails.
pub(crate) async fn run_add<B: JobBackend>(
    store: &mut RecordStore<B>,
    args: NewJobArgs,
) -> anyhow::Result<()> {
    let (fields, job_id) = args.into_parts();
    let job = store.create(fields, job_id).await?;
    println!("created {}", job.job_id);
    Ok(())
}

/// # Errors
///
/// Returns an error if `index` is out of range or the update fails.
pub(crate) async fn run_update<B: JobBackend>(
    store: &mut RecordStore<B>,
    index: usize,
    args: UpdateJobArgs,
) -> anyhow::Result<()> {
    let fields = args.merge_into(store.at(index)?.fields());
    let job = store.update(index, fields).await?;
    println!("updated {}", job.job_id);
    Ok(())
}

/// # Errors
///
/// Returns an error if `index` is out of range or the delete fails.
pub(crate) async fn run_delete<B: JobBackend>(
    store: &mut RecordStore<B>,
    index: usize,
) -> anyhow::Result<()> {
    let job_id = store.at(index)?.job_id.clone();
    match store.delete(index).await? {
        SelectionHint::Index(next) => println!("deleted {job_id}; selection moves to {next}"),
        SelectionHint::Empty => println!("deleted {job_id}; no jobs remain"),
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the loaded records differ from the database.
pub(crate) async fn run_check<B: JobBackend>(store: &RecordStore<B>) -> anyhow::Result<()> {
    store.verify().await?;
    println!("{} job(s) in sync with the database", store.len());
    Ok(())
}
