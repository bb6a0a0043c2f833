//! Task entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::WorkStatus;

/// A unit of assignment belonging to exactly one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning project ID.
    pub project_id: Uuid,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// ID of the assigned student. Must reference a user with the student role.
    pub assigned_student_id: Uuid,
    /// Current status.
    pub status: WorkStatus,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task.
    pub fn new(
        project_id: Uuid,
        name: impl Into<String>,
        description: impl Into<String>,
        assigned_student_id: Uuid,
        due_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: name.into(),
            description: description.into(),
            assigned_student_id,
            status: WorkStatus::default(),
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }
}
