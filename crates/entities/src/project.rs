//! Project entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::WorkStatus;

/// Category of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    WebDevelopment,
    MobileDevelopment,
    DataScience,
    MachineLearning,
    DevOps,
    UxUiDesign,
    Other,
}

/// A unit of work assigned to one or more students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: Uuid,
    /// Project title.
    pub title: String,
    /// Project description.
    pub description: String,
    /// IDs of assigned students. Order is irrelevant.
    pub student_ids: Vec<Uuid>,
    /// Project category.
    pub category: ProjectCategory,
    /// Current status.
    pub status: WorkStatus,
    /// Start date. Must not be after `end_date`.
    pub start_date: DateTime<Utc>,
    /// End date.
    pub end_date: DateTime<Utc>,
    /// Completion percentage 0-100, derived from task statuses.
    pub progress: u8,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project with progress 0.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: ProjectCategory,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            student_ids: Vec::new(),
            category,
            status: WorkStatus::default(),
            start_date,
            end_date,
            progress: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the assigned students.
    pub fn with_students(mut self, student_ids: Vec<Uuid>) -> Self {
        self.student_ids = student_ids;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if the given user is assigned to this project.
    pub fn has_student(&self, user_id: Uuid) -> bool {
        self.student_ids.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let start = Utc::now();
        let end = start + chrono::Duration::days(30);
        let project = Project::new("P1", "desc", ProjectCategory::WebDevelopment, start, end);

        assert_eq!(project.progress, 0);
        assert_eq!(project.status, WorkStatus::Pending);
        assert!(project.student_ids.is_empty());
    }

    #[test]
    fn test_has_student() {
        let start = Utc::now();
        let student = Uuid::new_v4();
        let project = Project::new("P1", "desc", ProjectCategory::Other, start, start)
            .with_students(vec![student]);

        assert!(project.has_student(student));
        assert!(!project.has_student(Uuid::new_v4()));
    }
}
