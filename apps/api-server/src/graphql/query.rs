//! Query resolvers.

use async_graphql::{Context, Object, ID};

use crate::error::{forbidden, not_found, storage};
use crate::graphql::guards::{current_user, require_admin};
use crate::graphql::types::{ChatMessageObject, ProjectObject, TaskObject, UserObject};
use crate::graphql::{parse_id, state};

/// Root query type.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The authenticated user.
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let user = current_user(ctx)?;
        Ok(UserObject(user.clone()))
    }

    /// All users. Admin only.
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserObject>> {
        let user = current_user(ctx)?;
        require_admin(user)?;

        let users = state(ctx)?.store.list_users().await.map_err(storage)?;
        Ok(users.into_iter().map(UserObject).collect())
    }

    /// A single user. Admin may view anyone; others only themselves.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<UserObject>> {
        let user = current_user(ctx)?;
        let target_id = parse_id(&id, "user")?;

        if !user.is_admin() && user.id != target_id {
            return Err(forbidden("Not authorized to view this user"));
        }

        let target = state(ctx)?.store.get_user(target_id).await.map_err(storage)?;
        Ok(target.map(UserObject))
    }

    /// All users, for chat peer selection. Includes admins.
    async fn students(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserObject>> {
        current_user(ctx)?;

        let users = state(ctx)?.store.list_users().await.map_err(storage)?;
        Ok(users.into_iter().map(UserObject).collect())
    }

    /// Projects visible to the caller: all for admins, assigned only for
    /// students.
    async fn projects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ProjectObject>> {
        let user = current_user(ctx)?;
        let state = state(ctx)?;

        let projects = if user.is_admin() {
            state.store.list_projects().await.map_err(storage)?
        } else {
            state
                .store
                .list_projects_by_student(user.id)
                .await
                .map_err(storage)?
        };
        Ok(projects.into_iter().map(ProjectObject).collect())
    }

    /// A single project.
    async fn project(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<ProjectObject> {
        let user = current_user(ctx)?;
        let project_id = parse_id(&id, "project")?;

        let project = state(ctx)?
            .store
            .get_project(project_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Project"))?;

        if !user.is_admin() && !project.has_student(user.id) {
            return Err(forbidden("Not authorized to view this project"));
        }

        Ok(ProjectObject(project))
    }

    /// Projects a student is assigned to. Admin or self.
    async fn projects_by_student(
        &self,
        ctx: &Context<'_>,
        student_id: ID,
    ) -> async_graphql::Result<Vec<ProjectObject>> {
        let user = current_user(ctx)?;
        let student_id = parse_id(&student_id, "student")?;

        if !user.is_admin() && user.id != student_id {
            return Err(forbidden("Not authorized to view these projects"));
        }

        let projects = state(ctx)?
            .store
            .list_projects_by_student(student_id)
            .await
            .map_err(storage)?;
        Ok(projects.into_iter().map(ProjectObject).collect())
    }

    /// Tasks visible to the caller: all for admins, own for students.
    async fn tasks(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TaskObject>> {
        let user = current_user(ctx)?;
        let state = state(ctx)?;

        let tasks = if user.is_admin() {
            state.store.list_tasks().await.map_err(storage)?
        } else {
            state
                .store
                .list_tasks_by_student(user.id)
                .await
                .map_err(storage)?
        };
        Ok(tasks.into_iter().map(TaskObject).collect())
    }

    /// A single task.
    async fn task(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<TaskObject> {
        let user = current_user(ctx)?;
        let task_id = parse_id(&id, "task")?;

        let task = state(ctx)?
            .store
            .get_task(task_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Task"))?;

        if !user.is_admin() && task.assigned_student_id != user.id {
            return Err(forbidden("Not authorized to view this task"));
        }

        Ok(TaskObject(task))
    }

    /// Tasks belonging to a project. Admin, or a student assigned to the
    /// project.
    async fn tasks_by_project(
        &self,
        ctx: &Context<'_>,
        project_id: ID,
    ) -> async_graphql::Result<Vec<TaskObject>> {
        let user = current_user(ctx)?;
        let project_id = parse_id(&project_id, "project")?;
        let state = state(ctx)?;

        let project = state
            .store
            .get_project(project_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found("Project"))?;

        if !user.is_admin() && !project.has_student(user.id) {
            return Err(forbidden("Not authorized to view these tasks"));
        }

        let tasks = state
            .store
            .list_tasks_by_project(project_id)
            .await
            .map_err(storage)?;
        Ok(tasks.into_iter().map(TaskObject).collect())
    }

    /// Tasks assigned to a student. Admin or self.
    async fn tasks_by_student(
        &self,
        ctx: &Context<'_>,
        student_id: ID,
    ) -> async_graphql::Result<Vec<TaskObject>> {
        let user = current_user(ctx)?;
        let student_id = parse_id(&student_id, "student")?;

        if !user.is_admin() && user.id != student_id {
            return Err(forbidden("Not authorized to view these tasks"));
        }

        let tasks = state(ctx)?
            .store
            .list_tasks_by_student(student_id)
            .await
            .map_err(storage)?;
        Ok(tasks.into_iter().map(TaskObject).collect())
    }

    /// The conversation between the caller and another user, oldest first.
    async fn chat_messages(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
    ) -> async_graphql::Result<Vec<ChatMessageObject>> {
        let user = current_user(ctx)?;
        let peer_id = parse_id(&user_id, "user")?;

        let messages = state(ctx)?
            .store
            .list_messages_between(user.id, peer_id)
            .await
            .map_err(storage)?;
        Ok(messages.into_iter().map(ChatMessageObject).collect())
    }
}
