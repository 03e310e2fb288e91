//! Shared persistence plumbing for the in-process repositories.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Lock a repository table, surfacing poisoning as an unavailable store.
pub(crate) fn lock<'a, T>(
    table: &'a Mutex<T>,
    name: &'static str,
) -> Result<MutexGuard<'a, T>, RepositoryError> {
    table
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} table poisoned")))
}

/// Monotonic identifier source, one per table.
#[derive(Debug)]
pub(crate) struct Sequence(AtomicU64);

impl Sequence {
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self(AtomicU64::new(1))
    }
}
