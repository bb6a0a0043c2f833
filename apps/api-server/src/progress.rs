//! Derived project progress.

use doc_store::{DocumentStore, StoreError, StoreResult};
use entities::WorkStatus;
use uuid::Uuid;

/// Recomputes and persists a project's completion percentage.
///
/// Progress is `round(100 * completed / total)` over the project's tasks,
/// or 0 when the project has none. Storage failures are logged and degrade
/// to 0 so that a recomputation fault never fails the mutation that
/// triggered it.
pub async fn recompute_progress(store: &dyn DocumentStore, project_id: Uuid) -> u8 {
    match recompute(store, project_id).await {
        Ok(progress) => progress,
        Err(e) => {
            tracing::error!(%project_id, error = %e, "Failed to recompute project progress");
            0
        }
    }
}

async fn recompute(store: &dyn DocumentStore, project_id: Uuid) -> StoreResult<u8> {
    let tasks = store.list_tasks_by_project(project_id).await?;

    let progress = if tasks.is_empty() {
        0
    } else {
        let completed = tasks
            .iter()
            .filter(|t| t.status == WorkStatus::Completed)
            .count();
        ((completed as f64 / tasks.len() as f64) * 100.0).round() as u8
    };

    let mut project = store
        .get_project(project_id)
        .await?
        .ok_or_else(|| StoreError::not_found("Project", project_id.to_string()))?;
    project.progress = progress;
    project.updated_at = chrono::Utc::now();
    store.update_project(project).await?;

    Ok(progress)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use doc_store::MemoryStore;
    use entities::{Project, ProjectCategory, Task};

    use super::*;

    async fn project_with_tasks(statuses: &[WorkStatus]) -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let now = Utc::now();
        let project = Project::new("P", "d", ProjectCategory::Other, now, now);
        let project_id = project.id;
        store.create_project(project).await.unwrap();

        for status in statuses {
            let task = Task::new(project_id, "t", "d", Uuid::new_v4(), now).with_status(*status);
            store.create_task(task).await.unwrap();
        }

        (store, project_id)
    }

    #[tokio::test]
    async fn test_no_tasks_is_zero() {
        let (store, project_id) = project_with_tasks(&[]).await;
        assert_eq!(recompute_progress(&store, project_id).await, 0);
    }

    #[tokio::test]
    async fn test_half_completed_rounds() {
        use WorkStatus::*;
        let (store, project_id) = project_with_tasks(&[Completed, Pending]).await;
        assert_eq!(recompute_progress(&store, project_id).await, 50);

        let persisted = store.get_project(project_id).await.unwrap().unwrap();
        assert_eq!(persisted.progress, 50);
    }

    #[tokio::test]
    async fn test_one_of_three_rounds_to_33() {
        use WorkStatus::*;
        let (store, project_id) = project_with_tasks(&[Completed, Pending, InProgress]).await;
        assert_eq!(recompute_progress(&store, project_id).await, 33);
    }

    #[tokio::test]
    async fn test_all_completed_is_100() {
        use WorkStatus::*;
        let (store, project_id) = project_with_tasks(&[Completed, Completed]).await;
        assert_eq!(recompute_progress(&store, project_id).await, 100);
    }

    #[tokio::test]
    async fn test_missing_project_degrades_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(recompute_progress(&store, Uuid::new_v4()).await, 0);
    }
}
