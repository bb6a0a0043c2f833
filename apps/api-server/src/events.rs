//! In-process event bus for subscription fan-out.

use entities::{ChatMessage, Project, Task};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of each broadcast topic.
const CHANNEL_CAPACITY: usize = 256;

/// A project-updated event.
#[derive(Debug, Clone)]
pub struct ProjectEvent {
    /// Snapshot of the project after the mutation.
    pub project: Project,
}

/// A task-updated event.
#[derive(Debug, Clone)]
pub struct TaskEvent {
    /// Snapshot of the task after the mutation.
    pub task: Task,
}

/// A message-received event, scoped to one receiver.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// The delivered message.
    pub message: ChatMessage,
    /// The user the event targets.
    pub receiver_id: Uuid,
}

/// Event bus with one broadcast topic per event kind.
///
/// Publishing is fire-and-forget: delivery is at-most-once per subscriber,
/// in-process only, with no replay for late subscribers.
#[derive(Debug)]
pub struct EventBus {
    projects: broadcast::Sender<ProjectEvent>,
    tasks: broadcast::Sender<TaskEvent>,
    messages: broadcast::Sender<MessageEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        Self {
            projects: broadcast::channel(CHANNEL_CAPACITY).0,
            tasks: broadcast::channel(CHANNEL_CAPACITY).0,
            messages: broadcast::channel(CHANNEL_CAPACITY).0,
        }
    }

    /// Publishes a project-updated event.
    pub fn publish_project_updated(&self, project: Project) {
        // Ignore send errors (no subscribers)
        let _ = self.projects.send(ProjectEvent { project });
    }

    /// Publishes a task-updated event.
    pub fn publish_task_updated(&self, task: Task) {
        let _ = self.tasks.send(TaskEvent { task });
    }

    /// Publishes a message-received event targeting the receiver.
    pub fn publish_message_received(&self, message: ChatMessage) {
        let receiver_id = message.receiver_id;
        let _ = self.messages.send(MessageEvent {
            message,
            receiver_id,
        });
    }

    /// Subscribes to project-updated events.
    pub fn subscribe_projects(&self) -> broadcast::Receiver<ProjectEvent> {
        self.projects.subscribe()
    }

    /// Subscribes to task-updated events.
    pub fn subscribe_tasks(&self) -> broadcast::Receiver<TaskEvent> {
        self.tasks.subscribe()
    }

    /// Subscribes to message-received events.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<MessageEvent> {
        self.messages.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entities::{Project, ProjectCategory};

    use super::*;

    fn project() -> Project {
        let now = Utc::now();
        Project::new("P", "d", ProjectCategory::Other, now, now)
    }

    #[test]
    fn test_subscribe_and_publish() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_projects();

        let published = project();
        bus.publish_project_updated(published.clone());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.project.id, published.id);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish_project_updated(project());
    }

    #[test]
    fn test_multiple_subscribers_all_receive() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe_tasks();
        let mut rx2 = bus.subscribe_tasks();

        let task = entities::Task::new(
            Uuid::new_v4(),
            "t",
            "d",
            Uuid::new_v4(),
            Utc::now(),
        );
        bus.publish_task_updated(task);

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_late_subscriber_misses_event() {
        let bus = EventBus::new();
        bus.publish_message_received(ChatMessage::new(Uuid::new_v4(), Uuid::new_v4(), "hi"));

        let mut rx = bus.subscribe_messages();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_message_event_targets_receiver() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_messages();

        let receiver = Uuid::new_v4();
        bus.publish_message_received(ChatMessage::new(Uuid::new_v4(), receiver, "hi"));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.receiver_id, receiver);
    }
}
