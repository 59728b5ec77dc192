//! Domain error types.
//!
//! These errors represent invalid identifiers handed to the core by a
//! caller. Problems with stored data are never errors; they are repaired
//! with defaults on read.

/// Domain-level errors for identifier validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Not one of the four route directions
    #[error("unknown route direction: {0}")]
    UnknownRoute(String),

    /// Line slot outside 0..=2
    #[error("line slot {0} out of range (0-2)")]
    LineSlot(u8),

    /// Transfer slot outside 0..=3
    #[error("transfer slot {0} out of range (0-3)")]
    TransferSlot(u8),

    /// Hour outside the timetable day 4..=25
    #[error("hour {0} out of range (4-25)")]
    Hour(u32),

    /// Departure minute outside 0..=59
    #[error("minute {0} out of range (0-59)")]
    Minute(u32),

    /// Copy source index outside 0..=5
    #[error("copy source {0} out of range (0-5)")]
    CopySource(usize),

    /// Train type that would not survive the space-separated blob
    #[error("train type {0:?} contains whitespace")]
    TrainType(String),

    /// Line kind that is neither rail nor bus
    #[error("unknown line kind: {0}")]
    UnknownLineKind(String),
}
