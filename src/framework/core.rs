//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the single-writer store.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that every stored resource must implement.
//! - [`ResourceActor`]: The generic actor that owns an insertion-ordered store.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, NotFound, Rejected).

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks and Actions)
// =============================================================================

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Architecture Note
/// The entity carries its own identity (`id()`), so the actor never mints ids.
/// Entities are constructed elsewhere (e.g. by a factory) and handed to the
/// actor with [`ResourceClient::insert`].
///
/// # Guards
/// Some rules span the whole store rather than one entity (for orders: "at most
/// one PROCESSING order"). The actor evaluates [`ActorEntity::on_insert`] and
/// [`ActorEntity::guard_action`] against the full store *inside* its message
/// loop, so check-then-mutate is atomic without any lock.
///
/// You do **not** need to implement the guards unless you want to restrict
/// behavior. The default implementation accepts everything (`Ok(())`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity (e.g., String, u64).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Enum representing resource-specific operations (e.g., `Cancel`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identity the store indexes this entity by.
    fn id(&self) -> Self::Id;

    /// Called before a new entity joins the store. `store` holds every entity
    /// already present, in insertion order.
    fn on_insert(&self, _store: &[Self]) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called before `handle_action`. Returning an error rejects the action and
    /// leaves the entity untouched.
    fn guard_action(&self, _action: &Self::Action, _store: &[Self]) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Picks the entity an [`ResourceRequest::ActionFirst`] applies to.
pub type Selector<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Internal message type sent to the actor to request operations.
///
/// - **Insert**: Membership check and append, as one step.
/// - **Get**: Fetches the current state of one entity by ID.
/// - **List**: Copies the whole store in insertion order.
/// - **Action**: Executes a custom [`ActorEntity::Action`] on one entity.
/// - **ActionFirst**: Executes an action on the first entity (insertion order)
///   the selector accepts. Selection and execution happen in the same turn.
pub enum ResourceRequest<T: ActorEntity> {
    Insert {
        item: T,
        respond_to: Response<bool>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    ActionFirst {
        select: Selector<T>,
        action: T::Action,
        respond_to: Response<Option<(T::Id, T::ActionResult)>>,
    },
}

impl<T: ActorEntity> Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert { item, .. } => write!(f, "Insert({})", item.id()),
            Self::Get { id, .. } => write!(f, "Get({id})"),
            Self::List { .. } => write!(f, "List"),
            Self::Action { id, action, .. } => write!(f, "Action({id}, {action:?})"),
            Self::ActionFirst { action, .. } => write!(f, "ActionFirst({action:?})"),
        }
    }
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns an insertion-ordered collection of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state (`store`) and
/// the receiver end of the channel.
///
/// **Concurrency Model**:
/// The actor processes its messages *sequentially* in a loop, so the `store`
/// needs no `Mutex`. Every reader and writer goes through a [`ResourceClient`],
/// and a membership check followed by an insert is a single message.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Vec<T>,
    index: HashMap<T::Id, usize>,
}

impl<T: ActorEntity> ResourceActor<T> {
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Vec::new(),
            index: HashMap::new(),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "order_pipeline::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Insert { item, respond_to } => {
                    let id = item.id();
                    if self.index.contains_key(&id) {
                        debug!(entity_type, %id, "Insert skipped, already present");
                        let _ = respond_to.send(Ok(false));
                        continue;
                    }
                    if let Err(e) = item.on_insert(&self.store) {
                        warn!(entity_type, %id, error = %e, "Insert rejected");
                        let _ = respond_to.send(Err(FrameworkError::Rejected(Box::new(e))));
                        continue;
                    }
                    self.index.insert(id.clone(), self.store.len());
                    self.store.push(item);
                    info!(entity_type, %id, size = self.store.len(), "Inserted");
                    let _ = respond_to.send(Ok(true));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.index.get(&id).map(|&idx| self.store[idx].clone());
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.clone()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(&idx) = self.index.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = self.apply(idx, action, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::ActionFirst {
                    select,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, ?action, "ActionFirst");
                    let Some(idx) = self.store.iter().position(|item| select(item)) else {
                        debug!(entity_type, "No entity selected");
                        let _ = respond_to.send(Ok(None));
                        continue;
                    };
                    let id = self.store[idx].id();
                    let result = self
                        .apply(idx, action, &context)
                        .await
                        .map(|outcome| Some((id.clone(), outcome)));
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn apply(
        &mut self,
        idx: usize,
        action: T::Action,
        context: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.store[idx]
            .guard_action(&action, &self.store)
            .map_err(|e| FrameworkError::Rejected(Box::new(e)))?;
        self.store[idx]
            .handle_action(action, context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a sender, so cloning is inexpensive and every clone talks to the
/// same store.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Derive would demand `T: Clone` on the sender wrapper for no reason.
impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn insert(&self, item: T) -> Result<bool, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Insert { item, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::List { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action {
                id,
                action,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action_on_first(
        &self,
        select: impl Fn(&T) -> bool + Send + Sync + 'static,
        action: T::Action,
    ) -> Result<Option<(T::Id, T::ActionResult)>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::ActionFirst {
                select: Box::new(select),
                action,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Ticket {
        id: u32,
        open: bool,
        holder: bool,
    }

    #[derive(Debug)]
    enum TicketAction {
        Close,
        Hold,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("ticket {0} cannot be held, another ticket is held")]
    struct HoldTaken(u32);

    #[async_trait]
    impl ActorEntity for Ticket {
        type Id = u32;
        type Action = TicketAction;
        type ActionResult = bool;
        type Context = ();
        type Error = HoldTaken;

        fn id(&self) -> u32 {
            self.id
        }

        fn guard_action(&self, action: &TicketAction, store: &[Self]) -> Result<(), HoldTaken> {
            match action {
                TicketAction::Hold if store.iter().any(|t| t.holder && t.id != self.id) => {
                    Err(HoldTaken(self.id))
                }
                _ => Ok(()),
            }
        }

        async fn handle_action(&mut self, action: TicketAction, _ctx: &()) -> Result<bool, HoldTaken> {
            match action {
                TicketAction::Close => {
                    let changed = self.open;
                    self.open = false;
                    Ok(changed)
                }
                TicketAction::Hold => {
                    self.holder = true;
                    Ok(true)
                }
            }
        }
    }

    fn ticket(id: u32) -> Ticket {
        Ticket {
            id,
            open: true,
            holder: false,
        }
    }

    // --- Test ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let (actor, client) = ResourceActor::new(10);
        tokio::spawn(actor.run(()));

        // 1. Insert is idempotent on id
        assert!(client.insert(ticket(1)).await.unwrap());
        assert!(client.insert(ticket(2)).await.unwrap());
        assert!(!client.insert(ticket(1)).await.unwrap());
        assert_eq!(client.list().await.unwrap().len(), 2);

        // 2. Perform Action
        let changed = client.perform_action(1, TicketAction::Close).await.unwrap();
        assert!(changed);
        let changed_again = client.perform_action(1, TicketAction::Close).await.unwrap();
        assert!(!changed_again);

        // 3. Verify state
        let stored = client.get(1).await.unwrap().unwrap();
        assert!(!stored.open);
        assert!(client.get(99).await.unwrap().is_none());

        // 4. Unknown id
        let missing = client.perform_action(99, TicketAction::Close).await;
        assert!(matches!(missing, Err(FrameworkError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_guard_rejects_and_first_match_selects_in_order() {
        let (actor, client) = ResourceActor::new(10);
        tokio::spawn(actor.run(()));

        for id in [3, 1, 2] {
            client.insert(ticket(id)).await.unwrap();
        }

        // First open ticket in insertion order is 3, not 1.
        let (id, held) = client
            .perform_action_on_first(|t: &Ticket| t.open, TicketAction::Hold)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(id, 3);
        assert!(held);

        let second = client.perform_action(1, TicketAction::Hold).await;
        assert!(matches!(second, Err(FrameworkError::Rejected(_))));
        assert!(!client.get(1).await.unwrap().unwrap().holder);

        let none = client
            .perform_action_on_first(|t: &Ticket| t.id > 10, TicketAction::Close)
            .await
            .unwrap();
        assert!(none.is_none());
    }
}
