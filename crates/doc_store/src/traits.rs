//! Document store trait definitions.

use async_trait::async_trait;
use entities::{ChatMessage, Project, Task, User};
use uuid::Uuid;

use crate::StoreResult;

/// Trait for document storage operations.
///
/// List operations return documents ordered by creation time ascending.
/// The storage engine serializes at the document level; there is no
/// multi-document transaction.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by username.
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Lists all users.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Counts all users.
    async fn count_users(&self) -> StoreResult<u64>;

    // =========================================================================
    // Project operations
    // =========================================================================

    /// Creates a new project.
    async fn create_project(&self, project: Project) -> StoreResult<Project>;

    /// Gets a project by ID.
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Lists all projects.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Lists projects a student is assigned to.
    async fn list_projects_by_student(&self, student_id: Uuid) -> StoreResult<Vec<Project>>;

    /// Updates a project.
    async fn update_project(&self, project: Project) -> StoreResult<Project>;

    /// Deletes a project.
    async fn delete_project(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Creates a new task.
    async fn create_task(&self, task: Task) -> StoreResult<Task>;

    /// Gets a task by ID.
    async fn get_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Lists all tasks.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Lists tasks belonging to a project.
    async fn list_tasks_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Lists tasks assigned to a student.
    async fn list_tasks_by_student(&self, student_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Updates a task.
    async fn update_task(&self, task: Task) -> StoreResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: Uuid) -> StoreResult<()>;

    /// Deletes all tasks belonging to a project. Returns the number deleted.
    async fn delete_tasks_by_project(&self, project_id: Uuid) -> StoreResult<u64>;

    // =========================================================================
    // Chat message operations
    // =========================================================================

    /// Creates a new chat message.
    async fn create_message(&self, message: ChatMessage) -> StoreResult<ChatMessage>;

    /// Gets a chat message by ID.
    async fn get_message(&self, id: Uuid) -> StoreResult<Option<ChatMessage>>;

    /// Updates a chat message.
    async fn update_message(&self, message: ChatMessage) -> StoreResult<ChatMessage>;

    /// Lists the conversation between two users, oldest first.
    async fn list_messages_between(&self, a: Uuid, b: Uuid) -> StoreResult<Vec<ChatMessage>>;
}
