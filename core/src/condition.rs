//! Conditions and notices surfaced by `RecordManager` to its presentation
//! layer.
//!
//! # Design
//! Every condition renders to a user-displayable message through `Display`.
//! Server-side failures carry the optional message the server sent; when it
//! is absent the per-operation default is shown instead.

use thiserror::Error;

use crate::types::{Field, Record, RecordId};

pub const FETCH_FAILED_DEFAULT: &str = "Failed to fetch records.";
pub const SAVE_FAILED_DEFAULT: &str = "Failed to save record.";
pub const DELETE_FAILED_DEFAULT: &str = "Failed to delete record.";

/// Why a manager operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Condition {
    /// One or more fields were empty after trimming. Never reaches the server.
    #[error("All fields are required.")]
    ValidationFailed { missing: Vec<Field> },

    #[error("{}", .message.as_deref().unwrap_or(FETCH_FAILED_DEFAULT))]
    FetchFailed { message: Option<String> },

    #[error("{}", .message.as_deref().unwrap_or(SAVE_FAILED_DEFAULT))]
    SaveFailed { message: Option<String> },

    #[error("{}", .message.as_deref().unwrap_or(DELETE_FAILED_DEFAULT))]
    DeleteFailed { message: Option<String> },

    /// The record handed to `begin_edit` is not in the collection.
    #[error("This record no longer exists.")]
    StaleRecord { id: RecordId },

    /// Another operation is still outstanding.
    #[error("Another operation is still in progress.")]
    OperationInProgress,

    /// The manager was unmounted before the result arrived; it was discarded.
    #[error("The view was closed before the request completed.")]
    Unmounted,
}

impl Condition {
    /// Alert title the UI shows next to the message.
    pub fn title(&self) -> &'static str {
        match self {
            Condition::ValidationFailed { .. } => "Validation",
            _ => "Error",
        }
    }
}

/// Confirmation of a mutation the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added(Record),
    Updated(Record),
    Deleted(RecordId),
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Added(_) => "Record added successfully!",
            Notice::Updated(_) => "Record updated successfully!",
            Notice::Deleted(_) => "Record deleted successfully!",
        }
    }
}

/// Outcome of a confirmed `submit` or `remove`.
///
/// The mutation itself succeeded; `refresh` reports the reconciling fetch
/// that followed it, which can fail independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub notice: Notice,
    pub refresh: Result<usize, Condition>,
}
