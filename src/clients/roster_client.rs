use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Order, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the roster: the one store of every known order.
///
/// Producer, consumer and lifecycle code all hold a clone of this client; none
/// of them touch the underlying collection. Lookup misses and transitions the
/// roster refuses come back as `false`/`None`. Only a roster that has shut
/// down is reported as an error.
#[derive(Clone)]
pub struct RosterClient {
    inner: ResourceClient<Order>,
}

impl RosterClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Adds `order` unless an order with the same id is already present.
    ///
    /// Returns whether the order was added.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn insert(&self, order: Order) -> Result<bool, OrderError> {
        debug!(?order, "insert called");
        match self.inner.insert(order).await {
            Ok(inserted) => Ok(inserted),
            Err(FrameworkError::Rejected(reason)) => {
                debug!(%reason, "Insert refused");
                Ok(false)
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn start_processing(&self, id: OrderId) -> Result<bool, OrderError> {
        self.transition(id, OrderAction::StartProcessing).await
    }

    #[instrument(skip(self))]
    pub async fn complete(&self, id: OrderId) -> Result<bool, OrderError> {
        self.transition(id, OrderAction::Complete).await
    }

    #[instrument(skip(self))]
    pub async fn force_complete(&self, id: OrderId) -> Result<bool, OrderError> {
        self.transition(id, OrderAction::ForceComplete).await
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<bool, OrderError> {
        self.transition(id, OrderAction::Cancel).await
    }

    /// Moves the oldest WAITING order to PROCESSING in a single roster turn.
    ///
    /// Returns the id of the order that started, or `None` when nothing is
    /// waiting or another order is already processing.
    #[instrument(skip(self))]
    pub async fn start_next_waiting(&self) -> Result<Option<OrderId>, OrderError> {
        let result = self
            .inner
            .perform_action_on_first(
                |order: &Order| order.status() == OrderStatus::Waiting,
                OrderAction::StartProcessing,
            )
            .await;
        match result {
            Ok(Some((id, true))) => Ok(Some(id)),
            Ok(_) => Ok(None),
            Err(FrameworkError::Rejected(reason)) => {
                debug!(%reason, "Next order not started");
                Ok(None)
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// The order currently PROCESSING, if any.
    #[instrument(skip(self))]
    pub async fn processing_order(&self) -> Result<Option<Order>, OrderError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|order| order.status() == OrderStatus::Processing))
    }

    /// Every order currently in `status`, in roster order.
    pub async fn with_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|order| order.status() == status)
            .collect())
    }

    async fn transition(&self, id: OrderId, action: OrderAction) -> Result<bool, OrderError> {
        match self.inner.perform_action(id, action).await {
            Ok(applied) => Ok(applied),
            Err(FrameworkError::NotFound(_)) => {
                debug!(%id, "No such order");
                Ok(false)
            }
            Err(FrameworkError::Rejected(reason)) => {
                debug!(%id, %reason, "Transition refused");
                Ok(false)
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[async_trait]
impl ActorClient<Order> for RosterClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::ActorCommunicationError(e.to_string())
    }
}
