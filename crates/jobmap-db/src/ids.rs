//! Identifiers for user-created job records.

use std::collections::HashSet;

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of generated job identifiers.
pub const JOB_ID_LEN: usize = 24;

/// A random alphanumeric identifier drawn from the thread-local CSPRNG,
/// which the OS seeds once per thread.
#[must_use]
pub fn generate_job_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(JOB_ID_LEN)
        .map(char::from)
        .collect()
}

/// Generate an identifier that is not in `existing`, regenerating on collision.
#[must_use]
pub fn fresh_job_id(existing: &HashSet<String>) -> String {
    loop {
        let candidate = generate_job_id();
        if !existing.contains(&candidate) {
            return candidate;
        }
        tracing::warn!(job_id = %candidate, "generated job id collided; regenerating");
    }
}
