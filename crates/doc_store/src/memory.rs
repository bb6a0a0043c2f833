//! In-memory document store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{ChatMessage, Project, Task, User};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{DocumentStore, StoreError, StoreResult};

type Collection = Arc<RwLock<HashMap<Uuid, Value>>>;

/// In-memory document store.
///
/// Each collection holds raw JSON documents keyed by id; entities are
/// serialized on write and deserialized on read, mirroring how a document
/// database stores them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Collection,
    projects: Collection,
    tasks: Collection,
    messages: Collection,
}

impl MemoryStore {
    /// Creates a new in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_doc<T: Serialize>(entity: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(entity)?)
}

fn from_doc<T: DeserializeOwned>(doc: &Value) -> StoreResult<T> {
    Ok(serde_json::from_value(doc.clone())?)
}

async fn insert<T: Serialize>(
    collection: &Collection,
    entity_type: &'static str,
    id: Uuid,
    entity: &T,
) -> StoreResult<()> {
    let mut docs = collection.write().await;
    if docs.contains_key(&id) {
        return Err(StoreError::already_exists(entity_type, id.to_string()));
    }
    docs.insert(id, to_doc(entity)?);
    Ok(())
}

async fn get<T: DeserializeOwned>(collection: &Collection, id: Uuid) -> StoreResult<Option<T>> {
    let docs = collection.read().await;
    docs.get(&id).map(|doc| from_doc(doc)).transpose()
}

async fn replace<T: Serialize>(
    collection: &Collection,
    entity_type: &'static str,
    id: Uuid,
    entity: &T,
) -> StoreResult<()> {
    let mut docs = collection.write().await;
    if !docs.contains_key(&id) {
        return Err(StoreError::not_found(entity_type, id.to_string()));
    }
    docs.insert(id, to_doc(entity)?);
    Ok(())
}

async fn remove(collection: &Collection, entity_type: &'static str, id: Uuid) -> StoreResult<()> {
    let mut docs = collection.write().await;
    if docs.remove(&id).is_none() {
        return Err(StoreError::not_found(entity_type, id.to_string()));
    }
    Ok(())
}

async fn scan<T, F>(collection: &Collection, predicate: F) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    let docs = collection.read().await;
    let mut result = Vec::new();
    for doc in docs.values() {
        let entity: T = from_doc(doc)?;
        if predicate(&entity) {
            result.push(entity);
        }
    }
    Ok(result)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        // Username uniqueness is enforced here, under the collection lock,
        // so concurrent writers cannot both slip past a resolver-level check
        let mut docs = self.users.write().await;
        if docs.contains_key(&user.id) {
            return Err(StoreError::already_exists("User", user.id.to_string()));
        }
        for doc in docs.values() {
            let existing: User = from_doc(doc)?;
            if existing.username == user.username {
                return Err(StoreError::already_exists("User", user.username.clone()));
            }
        }
        docs.insert(user.id, to_doc(&user)?);
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        get(&self.users, id).await
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users: Vec<User> = scan(&self.users, |u: &User| u.username == username).await?;
        Ok(users.into_iter().next())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = scan(&self.users, |_| true).await?;
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn count_users(&self) -> StoreResult<u64> {
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }

    // =========================================================================
    // Project operations
    // =========================================================================

    async fn create_project(&self, project: Project) -> StoreResult<Project> {
        insert(&self.projects, "Project", project.id, &project).await?;
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        get(&self.projects, id).await
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = scan(&self.projects, |_| true).await?;
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    async fn list_projects_by_student(&self, student_id: Uuid) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> =
            scan(&self.projects, |p: &Project| p.has_student(student_id)).await?;
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    async fn update_project(&self, project: Project) -> StoreResult<Project> {
        replace(&self.projects, "Project", project.id, &project).await?;
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        remove(&self.projects, "Project", id).await
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn create_task(&self, task: Task) -> StoreResult<Task> {
        insert(&self.tasks, "Task", task.id, &task).await?;
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        get(&self.tasks, id).await
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = scan(&self.tasks, |_| true).await?;
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn list_tasks_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> =
            scan(&self.tasks, |t: &Task| t.project_id == project_id).await?;
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn list_tasks_by_student(&self, student_id: Uuid) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> =
            scan(&self.tasks, |t: &Task| t.assigned_student_id == student_id).await?;
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn update_task(&self, task: Task) -> StoreResult<Task> {
        replace(&self.tasks, "Task", task.id, &task).await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        remove(&self.tasks, "Task", id).await
    }

    async fn delete_tasks_by_project(&self, project_id: Uuid) -> StoreResult<u64> {
        let doomed: Vec<Task> =
            scan(&self.tasks, |t: &Task| t.project_id == project_id).await?;
        let mut docs = self.tasks.write().await;
        for task in &doomed {
            docs.remove(&task.id);
        }
        Ok(doomed.len() as u64)
    }

    // =========================================================================
    // Chat message operations
    // =========================================================================

    async fn create_message(&self, message: ChatMessage) -> StoreResult<ChatMessage> {
        insert(&self.messages, "ChatMessage", message.id, &message).await?;
        Ok(message)
    }

    async fn get_message(&self, id: Uuid) -> StoreResult<Option<ChatMessage>> {
        get(&self.messages, id).await
    }

    async fn update_message(&self, message: ChatMessage) -> StoreResult<ChatMessage> {
        replace(&self.messages, "ChatMessage", message.id, &message).await?;
        Ok(message)
    }

    async fn list_messages_between(&self, a: Uuid, b: Uuid) -> StoreResult<Vec<ChatMessage>> {
        let mut messages: Vec<ChatMessage> = scan(&self.messages, |m: &ChatMessage| {
            (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
        })
        .await?;
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entities::{ProjectCategory, Role, WorkStatus};

    use super::*;

    #[tokio::test]
    async fn test_user_crud() {
        let store = MemoryStore::new();
        let user = User::new("admin", "hash", Role::Admin);

        let created = store.create_user(user.clone()).await.unwrap();
        assert_eq!(created.username, "admin");

        let fetched = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);

        let by_name = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let store = MemoryStore::new();
        let user = User::new("admin", "hash", Role::Admin);

        store.create_user(user.clone()).await.unwrap();
        let result = store.create_user(user).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_across_ids() {
        let store = MemoryStore::new();
        store
            .create_user(User::new("alice", "hash", Role::Student))
            .await
            .unwrap();

        // Fresh id, same username: the store itself must refuse it
        let second = store
            .create_user(User::new("alice", "other-hash", Role::Student))
            .await;
        assert!(matches!(second, Err(StoreError::AlreadyExists { .. })));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_project_student_filter() {
        let store = MemoryStore::new();
        let student = Uuid::new_v4();
        let now = Utc::now();

        let mine = Project::new("mine", "d", ProjectCategory::Other, now, now)
            .with_students(vec![student]);
        let other = Project::new("other", "d", ProjectCategory::Other, now, now);

        store.create_project(mine.clone()).await.unwrap();
        store.create_project(other).await.unwrap();

        let projects = store.list_projects_by_student(student).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, mine.id);

        assert_eq!(store.list_projects().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_task_cascade_delete() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();
        let student = Uuid::new_v4();
        let now = Utc::now();

        store
            .create_task(Task::new(project_id, "t1", "d", student, now))
            .await
            .unwrap();
        store
            .create_task(Task::new(project_id, "t2", "d", student, now))
            .await
            .unwrap();
        store
            .create_task(Task::new(Uuid::new_v4(), "t3", "d", student, now))
            .await
            .unwrap();

        let deleted = store.delete_tasks_by_project(project_id).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.list_tasks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_task_fails() {
        let store = MemoryStore::new();
        let task = Task::new(Uuid::new_v4(), "t", "d", Uuid::new_v4(), Utc::now())
            .with_status(WorkStatus::Completed);

        let result = store.update_task(task).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_conversation_ordering() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut first = ChatMessage::new(a, b, "first");
        let mut second = ChatMessage::new(b, a, "second");
        // Force a strict ordering regardless of clock resolution
        second.created_at = first.created_at + chrono::Duration::seconds(1);
        first.updated_at = first.created_at;
        second.updated_at = second.created_at;

        store.create_message(second).await.unwrap();
        store.create_message(first).await.unwrap();
        store
            .create_message(ChatMessage::new(a, Uuid::new_v4(), "unrelated"))
            .await
            .unwrap();

        let conversation = store.list_messages_between(a, b).await.unwrap();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation[0].message, "first");
        assert_eq!(conversation[1].message, "second");
    }
}
