//! Work status shared by projects and tasks.

use serde::{Deserialize, Serialize};

/// Status of a project or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Not started yet.
    Pending,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Completed,
    /// Temporarily paused.
    OnHold,
    /// Abandoned.
    Cancelled,
}

impl Default for WorkStatus {
    fn default() -> Self {
        Self::Pending
    }
}
