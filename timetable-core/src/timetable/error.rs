//! Timetable write errors.

use crate::domain::DomainError;
use crate::store::StoreError;

/// Errors writing departures.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// An entry that cannot be stored as given
    #[error("invalid entry: {0}")]
    Entry(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
