//! GraphQL object types over the persisted entities.
//!
//! Each wrapper exposes the entity's scalar fields and resolves reference
//! fields (assigned students, owning project, message peers) against the
//! document store.

use async_graphql::{Context, Enum, Object, SimpleObject, ID};
use chrono::{DateTime, Utc};

use crate::error::{not_found, storage};
use crate::graphql::state;

/// Role of a user.
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "entities::Role")]
pub enum Role {
    Admin,
    Student,
}

/// Status of a project or task.
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "entities::WorkStatus")]
pub enum WorkStatus {
    Pending,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

/// Category of a project.
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "entities::ProjectCategory")]
pub enum ProjectCategory {
    WebDevelopment,
    MobileDevelopment,
    DataScience,
    MachineLearning,
    DevOps,
    UxUiDesign,
    Other,
}

/// A user. The credential hash is never exposed.
pub struct UserObject(pub entities::User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        self.0.id.to_string().into()
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    async fn role(&self) -> Role {
        self.0.role.into()
    }

    async fn university_id(&self) -> Option<&str> {
        self.0.university_id.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// A project with its assigned students and tasks.
pub struct ProjectObject(pub entities::Project);

#[Object(name = "Project")]
impl ProjectObject {
    async fn id(&self) -> ID {
        self.0.id.to_string().into()
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    /// Assigned students. References to deleted users are skipped.
    async fn students(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserObject>> {
        let state = state(ctx)?;
        let mut students = Vec::with_capacity(self.0.student_ids.len());
        for id in &self.0.student_ids {
            if let Some(user) = state.store.get_user(*id).await.map_err(storage)? {
                students.push(UserObject(user));
            }
        }
        Ok(students)
    }

    async fn category(&self) -> ProjectCategory {
        self.0.category.into()
    }

    async fn status(&self) -> WorkStatus {
        self.0.status.into()
    }

    async fn start_date(&self) -> DateTime<Utc> {
        self.0.start_date
    }

    async fn end_date(&self) -> DateTime<Utc> {
        self.0.end_date
    }

    /// Completion percentage 0-100, derived from task statuses.
    async fn progress(&self) -> i32 {
        i32::from(self.0.progress)
    }

    async fn tasks(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TaskObject>> {
        let state = state(ctx)?;
        let tasks = state
            .store
            .list_tasks_by_project(self.0.id)
            .await
            .map_err(storage)?;
        Ok(tasks.into_iter().map(TaskObject).collect())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// A task with its assigned student and owning project.
pub struct TaskObject(pub entities::Task);

#[Object(name = "Task")]
impl TaskObject {
    async fn id(&self) -> ID {
        self.0.id.to_string().into()
    }

    async fn project_id(&self) -> ID {
        self.0.project_id.to_string().into()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn assigned_student(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let state = state(ctx)?;
        let user = state
            .store
            .get_user(self.0.assigned_student_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Student"))?;
        Ok(UserObject(user))
    }

    async fn status(&self) -> WorkStatus {
        self.0.status.into()
    }

    async fn due_date(&self) -> DateTime<Utc> {
        self.0.due_date
    }

    async fn project(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<ProjectObject>> {
        let state = state(ctx)?;
        let project = state
            .store
            .get_project(self.0.project_id)
            .await
            .map_err(storage)?;
        Ok(project.map(ProjectObject))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// A directed chat message.
pub struct ChatMessageObject(pub entities::ChatMessage);

#[Object(name = "ChatMessage")]
impl ChatMessageObject {
    async fn id(&self) -> ID {
        self.0.id.to_string().into()
    }

    async fn sender(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let state = state(ctx)?;
        let user = state
            .store
            .get_user(self.0.sender_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("User"))?;
        Ok(UserObject(user))
    }

    async fn receiver(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let state = state(ctx)?;
        let user = state
            .store
            .get_user(self.0.receiver_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("User"))?;
        Ok(UserObject(user))
    }

    async fn message(&self) -> &str {
        &self.0.message
    }

    async fn read(&self) -> bool {
        self.0.read
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }
}

/// Result of a successful login or signup.
#[derive(SimpleObject)]
pub struct AuthPayload {
    /// Signed, time-limited bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: UserObject,
}
