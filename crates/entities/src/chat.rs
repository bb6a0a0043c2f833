//! Chat message entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed message between two users.
///
/// Immutable once created except for the `read` flag, which only the
/// receiver may set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier.
    pub id: Uuid,
    /// Sending user ID.
    pub sender_id: Uuid,
    /// Receiving user ID.
    pub receiver_id: Uuid,
    /// Message text.
    pub message: String,
    /// Whether the receiver has read the message.
    pub read: bool,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a new unread message.
    pub fn new(sender_id: Uuid, receiver_id: Uuid, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            message: message.into(),
            read: false,
            created_at: now,
            updated_at: now,
        }
    }
}
