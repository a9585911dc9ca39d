//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and the receiver its requests land on.
//! Then use helpers like [`expect_insert`] or [`expect_action`] to pull the next
//! request off the receiver, assert on it, and answer through its responder.
//!
//! | Feature | Mock receiver | Real Actor |
//! |---------|---------------|------------|
//! | **State** | None, the test answers every request | Real roster |
//! | **Use Case** | Logic *around* the client (mapping, fallbacks) | The actor itself or the full system |
//! | **Error Injection** | Easy (send any `FrameworkError`) | Hard (requires specific state) |
//!
//! ```rust,ignore
//! let (client, mut receiver) = create_mock_client::<Order>(10);
//! let roster = RosterClient::new(client);
//! let task = tokio::spawn(async move { roster.cancel(id).await });
//!
//! let (_, action, responder) = expect_action(&mut receiver).await.unwrap();
//! responder.send(Err(FrameworkError::ActorClosed)).unwrap();
//! ```

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;

/// Creates a client whose requests are delivered to the returned receiver
/// instead of a running actor.
pub fn create_mock_client<T: ActorEntity>(
    buffer: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer);
    (ResourceClient::new(sender), receiver)
}

/// Waits for the next request and returns it if it is an `Insert`.
pub async fn expect_insert<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T, Response<bool>)> {
    match receiver.recv().await? {
        ResourceRequest::Insert { item, respond_to } => Some((item, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `Get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await? {
        ResourceRequest::Get { id, respond_to } => Some((id, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns its responder if it is a `List`.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Response<Vec<T>>> {
    match receiver.recv().await? {
        ResourceRequest::List { respond_to } => Some(respond_to),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await? {
        ResourceRequest::Action {
            id,
            action,
            respond_to,
        } => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Answers every request still queued on `receiver` with `error`.
///
/// Handy for checking how a client degrades once the store is gone.
pub async fn fail_all<T: ActorEntity>(
    mut receiver: mpsc::Receiver<ResourceRequest<T>>,
    error: fn() -> FrameworkError,
) {
    while let Some(request) = receiver.recv().await {
        match request {
            ResourceRequest::Insert { respond_to, .. } => {
                let _ = respond_to.send(Err(error()));
            }
            ResourceRequest::Get { respond_to, .. } => {
                let _ = respond_to.send(Err(error()));
            }
            ResourceRequest::List { respond_to } => {
                let _ = respond_to.send(Err(error()));
            }
            ResourceRequest::Action { respond_to, .. } => {
                let _ = respond_to.send(Err(error()));
            }
            ResourceRequest::ActionFirst { respond_to, .. } => {
                let _ = respond_to.send(Err(error()));
            }
        }
    }
}
