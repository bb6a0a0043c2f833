//! Subscription resolvers.
//!
//! Each stream subscribes to one broadcast topic and filters events by id.
//! Delivery is at-most-once in-process: a lagged receiver skips the missed
//! events, a closed one ends the stream.

use async_graphql::{Context, Subscription, ID};
use futures_util::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::graphql::state;
use crate::graphql::types::{ChatMessageObject, ProjectObject, TaskObject};

/// Root subscription type.
pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Messages delivered to the given user as they arrive.
    async fn message_received(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
    ) -> async_graphql::Result<impl Stream<Item = ChatMessageObject>> {
        let receiver = state(ctx)?.events.subscribe_messages();
        let user_id = user_id.to_string();

        Ok(BroadcastStream::new(receiver).filter_map(move |event| {
            let matched = event
                .ok()
                .filter(|event| event.receiver_id.to_string() == user_id)
                .map(|event| ChatMessageObject(event.message));
            async move { matched }
        }))
    }

    /// Snapshots of one project after each mutation that touches it.
    async fn project_updated(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<impl Stream<Item = ProjectObject>> {
        let receiver = state(ctx)?.events.subscribe_projects();
        let id = id.to_string();

        Ok(BroadcastStream::new(receiver).filter_map(move |event| {
            let matched = event
                .ok()
                .filter(|event| event.project.id.to_string() == id)
                .map(|event| ProjectObject(event.project));
            async move { matched }
        }))
    }

    /// Snapshots of one task after each mutation that touches it.
    async fn task_updated(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<impl Stream<Item = TaskObject>> {
        let receiver = state(ctx)?.events.subscribe_tasks();
        let id = id.to_string();

        Ok(BroadcastStream::new(receiver).filter_map(move |event| {
            let matched = event
                .ok()
                .filter(|event| event.task.id.to_string() == id)
                .map(|event| TaskObject(event.task));
            async move { matched }
        }))
    }
}
