//! Mutation resolvers.

use async_graphql::{Context, ErrorExtensions, Object, ID};
use chrono::{DateTime, Utc};
use entities::{ChatMessage, Project, Role, Task, User};
use uuid::Uuid;

use crate::error::{auth_failure, forbidden, invalid_input, not_found, storage, ApiError};
use crate::graphql::guards::{current_user, require_admin};
use crate::graphql::types::{
    AuthPayload, ChatMessageObject, ProjectCategory, ProjectObject, TaskObject, UserObject,
    WorkStatus,
};
use crate::graphql::{parse_id, state};
use crate::progress;
use crate::state::AppState;

/// Fields a student may touch through `updateTask`.
const STUDENT_ALLOWED_TASK_FIELDS: &[&str] = &["status"];

/// Root mutation type.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    // =========================================================================
    // Auth
    // =========================================================================

    /// Authenticates a user and issues a bearer token.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> async_graphql::Result<AuthPayload> {
        if username.is_empty() || password.is_empty() {
            return Err(invalid_input("Username and password are required"));
        }

        let state = state(ctx)?;
        let user = state
            .store
            .get_user_by_username(&username)
            .await
            .map_err(storage)?
            .ok_or_else(|| ApiError::InvalidCredentials.extend())?;

        if !auth::verify_password(&password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials.extend());
        }

        let token = issue_token(state, &user)?;
        Ok(AuthPayload {
            token,
            user: UserObject(user),
        })
    }

    /// Creates an account and issues a bearer token.
    async fn signup(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
        is_student: bool,
        university_id: Option<String>,
    ) -> async_graphql::Result<AuthPayload> {
        if username.is_empty() || password.is_empty() {
            return Err(invalid_input("Username and password are required"));
        }
        let university_id = university_id.filter(|v| !v.is_empty());
        if is_student && university_id.is_none() {
            return Err(invalid_input("University ID is required for students"));
        }

        let state = state(ctx)?;
        if state
            .store
            .get_user_by_username(&username)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(ApiError::DuplicateUsername.extend());
        }

        let password_hash = auth::hash_password(&password).map_err(auth_failure)?;
        let role = if is_student { Role::Student } else { Role::Admin };
        let mut user = User::new(username, password_hash, role);
        if let Some(university_id) = university_id.filter(|_| is_student) {
            user = user.with_university_id(university_id);
        }

        let user = state.store.create_user(user).await.map_err(storage)?;
        tracing::info!(username = %user.username, role = ?user.role, "User signed up");

        let token = issue_token(state, &user)?;
        Ok(AuthPayload {
            token,
            user: UserObject(user),
        })
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Creates a project. Admin only. Progress always starts at 0.
    #[allow(clippy::too_many_arguments)]
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        students: Vec<ID>,
        category: ProjectCategory,
        status: WorkStatus,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> async_graphql::Result<ProjectObject> {
        let user = current_user(ctx)?;
        require_admin(user)?;

        if title.is_empty() || description.is_empty() {
            return Err(invalid_input("All fields are required"));
        }
        if end_date < start_date {
            return Err(invalid_input("End date must be after start date"));
        }

        let student_ids = students
            .iter()
            .map(|id| parse_id(id, "student"))
            .collect::<async_graphql::Result<Vec<Uuid>>>()?;

        let project = Project::new(title, description, category.into(), start_date, end_date)
            .with_students(student_ids)
            .with_status(status.into());

        let state = state(ctx)?;
        let project = state.store.create_project(project).await.map_err(storage)?;
        tracing::info!(project_id = %project.id, "Project created");

        state.events.publish_project_updated(project.clone());
        Ok(ProjectObject(project))
    }

    /// Applies a partial update to a project. Admin only. Progress is
    /// derived and cannot be set here.
    #[allow(clippy::too_many_arguments)]
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        description: Option<String>,
        students: Option<Vec<ID>>,
        category: Option<ProjectCategory>,
        status: Option<WorkStatus>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> async_graphql::Result<ProjectObject> {
        let user = current_user(ctx)?;
        require_admin(user)?;

        let project_id = parse_id(&id, "project")?;
        let state = state(ctx)?;
        let mut project = state
            .store
            .get_project(project_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Project"))?;

        // Validate date ordering against the effective pair
        let effective_start = start_date.unwrap_or(project.start_date);
        let effective_end = end_date.unwrap_or(project.end_date);
        if effective_end < effective_start {
            return Err(invalid_input("End date must be after start date"));
        }

        if let Some(title) = title {
            project.title = title;
        }
        if let Some(description) = description {
            project.description = description;
        }
        if let Some(students) = students {
            project.student_ids = students
                .iter()
                .map(|id| parse_id(id, "student"))
                .collect::<async_graphql::Result<Vec<Uuid>>>()?;
        }
        if let Some(category) = category {
            project.category = category.into();
        }
        if let Some(status) = status {
            project.status = status.into();
        }
        project.start_date = effective_start;
        project.end_date = effective_end;
        project.updated_at = Utc::now();

        let project = state.store.update_project(project).await.map_err(storage)?;
        state.events.publish_project_updated(project.clone());
        Ok(ProjectObject(project))
    }

    /// Deletes a project and all of its tasks. Admin only. Returns the
    /// pre-deletion snapshot.
    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<ProjectObject> {
        let user = current_user(ctx)?;
        require_admin(user)?;

        let project_id = parse_id(&id, "project")?;
        let state = state(ctx)?;
        let project = state
            .store
            .get_project(project_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Project"))?;

        // Cascade: tasks first, then the project. Not transactional.
        let deleted_tasks = state
            .store
            .delete_tasks_by_project(project_id)
            .await
            .map_err(storage)?;
        state.store.delete_project(project_id).await.map_err(storage)?;

        tracing::info!(%project_id, deleted_tasks, "Project deleted");
        Ok(ProjectObject(project))
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Creates a task under a project. Admin only. The assignee must be a
    /// student.
    #[allow(clippy::too_many_arguments)]
    async fn create_task(
        &self,
        ctx: &Context<'_>,
        project_id: ID,
        name: String,
        description: String,
        assigned_student: ID,
        status: WorkStatus,
        due_date: DateTime<Utc>,
    ) -> async_graphql::Result<TaskObject> {
        let user = current_user(ctx)?;
        require_admin(user)?;

        if name.is_empty() || description.is_empty() {
            return Err(invalid_input("All fields are required"));
        }

        let project_id = parse_id(&project_id, "project")?;
        let student_id = parse_id(&assigned_student, "student")?;
        let state = state(ctx)?;

        state
            .store
            .get_project(project_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Project"))?;

        let student = state
            .store
            .get_user(student_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Student"))?;
        if student.role != Role::Student {
            return Err(ApiError::InvalidAssignment.extend());
        }

        let task = Task::new(project_id, name, description, student_id, due_date)
            .with_status(status.into());
        let task = state.store.create_task(task).await.map_err(storage)?;
        tracing::info!(task_id = %task.id, %project_id, "Task created");

        recompute_and_publish(state, project_id).await;
        state.events.publish_task_updated(task.clone());
        Ok(TaskObject(task))
    }

    /// Applies a partial update to a task. Admins may change any field;
    /// the assigned student may change only the status.
    #[allow(clippy::too_many_arguments)]
    async fn update_task(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        description: Option<String>,
        assigned_student: Option<ID>,
        status: Option<WorkStatus>,
        due_date: Option<DateTime<Utc>>,
    ) -> async_graphql::Result<TaskObject> {
        let user = current_user(ctx)?;

        let task_id = parse_id(&id, "task")?;
        let state = state(ctx)?;
        let mut task = state
            .store
            .get_task(task_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Task"))?;

        if !user.is_admin() {
            if task.assigned_student_id != user.id {
                return Err(forbidden("Not authorized to update this task"));
            }

            let mut requested = Vec::new();
            if name.is_some() {
                requested.push("name");
            }
            if description.is_some() {
                requested.push("description");
            }
            if assigned_student.is_some() {
                requested.push("assignedStudent");
            }
            if due_date.is_some() {
                requested.push("dueDate");
            }
            if status.is_some() {
                requested.push("status");
            }

            if requested
                .iter()
                .any(|field| !STUDENT_ALLOWED_TASK_FIELDS.contains(field))
            {
                return Err(forbidden("Students can only update task status"));
            }
        }

        if let Some(assigned_student) = &assigned_student {
            let student_id = parse_id(assigned_student, "student")?;
            let student = state
                .store
                .get_user(student_id)
                .await
                .map_err(storage)?
                .ok_or_else(|| not_found("Student"))?;
            if student.role != Role::Student {
                return Err(ApiError::InvalidAssignment.extend());
            }
            task.assigned_student_id = student_id;
        }
        if let Some(name) = name {
            task.name = name;
        }
        if let Some(description) = description {
            task.description = description;
        }
        if let Some(new_status) = status {
            task.status = new_status.into();
        }
        if let Some(due_date) = due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();

        let task = state.store.update_task(task).await.map_err(storage)?;

        // Progress only moves when the status did
        if status.is_some() {
            recompute_and_publish(state, task.project_id).await;
        }
        state.events.publish_task_updated(task.clone());
        Ok(TaskObject(task))
    }

    /// Deletes a task. Admin only. Returns the pre-deletion snapshot.
    async fn delete_task(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<TaskObject> {
        let user = current_user(ctx)?;
        require_admin(user)?;

        let task_id = parse_id(&id, "task")?;
        let state = state(ctx)?;
        let task = state
            .store
            .get_task(task_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Task"))?;

        state.store.delete_task(task_id).await.map_err(storage)?;
        tracing::info!(%task_id, project_id = %task.project_id, "Task deleted");

        recompute_and_publish(state, task.project_id).await;
        Ok(TaskObject(task))
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Sends a message to another user.
    async fn send_message(
        &self,
        ctx: &Context<'_>,
        receiver_id: ID,
        message: String,
    ) -> async_graphql::Result<ChatMessageObject> {
        let user = current_user(ctx)?;
        let receiver_id = parse_id(&receiver_id, "receiver")?;
        let state = state(ctx)?;

        state
            .store
            .get_user(receiver_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Receiver"))?;

        let chat_message = ChatMessage::new(user.id, receiver_id, message);
        let chat_message = state
            .store
            .create_message(chat_message)
            .await
            .map_err(storage)?;

        state.events.publish_message_received(chat_message.clone());
        Ok(ChatMessageObject(chat_message))
    }

    /// Marks a message as read. Only the receiver may do this; repeating
    /// the call is a no-op.
    async fn mark_message_as_read(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<ChatMessageObject> {
        let user = current_user(ctx)?;
        let message_id = parse_id(&id, "message")?;
        let state = state(ctx)?;

        let mut message = state
            .store
            .get_message(message_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Message"))?;

        if message.receiver_id != user.id {
            return Err(forbidden("Not authorized to mark this message as read"));
        }

        message.read = true;
        message.updated_at = Utc::now();
        let message = state.store.update_message(message).await.map_err(storage)?;
        Ok(ChatMessageObject(message))
    }
}

/// Issues a bearer token for the given user.
fn issue_token(state: &AppState, user: &User) -> async_graphql::Result<String> {
    state
        .jwt_manager
        .generate_token(user.id, user.username.clone(), user.role.as_str().to_string())
        .map_err(auth_failure)
}

/// Recomputes a project's progress and publishes the refreshed snapshot.
///
/// Failures here never abort the triggering mutation.
async fn recompute_and_publish(state: &AppState, project_id: Uuid) {
    progress::recompute_progress(state.store.as_ref(), project_id).await;

    match state.store.get_project(project_id).await {
        Ok(Some(project)) => state.events.publish_project_updated(project),
        Ok(None) => {}
        Err(e) => {
            tracing::error!(%project_id, error = %e, "Failed to load project for update event");
        }
    }
}
