//! Order intake: records new orders in the roster and hands them to the worker.

use crate::clients::{ActorClient, RosterClient};
use crate::model::{Order, OrderId, Price};
use crate::order_actor::OrderError;
use crate::queue::SubmissionQueue;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct Producer {
    roster: RosterClient,
    queue: SubmissionQueue,
}

impl Producer {
    pub fn new(roster: RosterClient, queue: SubmissionQueue) -> Self {
        Self { roster, queue }
    }

    /// Records `order` in the roster and queues it for the worker.
    ///
    /// Never blocks on the queue. A duplicate id is left as it is in the roster
    /// but still queued. Returns whether the roster now tracks the id: a
    /// PROCESSING order offered while another order holds the slot is refused
    /// by the roster and reported as `false`.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn add_order(&self, order: Order) -> Result<bool, OrderError> {
        debug!(?order, "add_order called");
        let id = order.id();
        let inserted = self.roster.insert(order.clone()).await?;
        let tracked = inserted || self.roster.get(id).await?.is_some();
        if !tracked {
            warn!(status = %order.status(), "Roster refused order, it is queued but not tracked");
        } else if !inserted {
            debug!("Order already in roster");
        }
        if !self.queue.push(order) {
            warn!("Worker is gone, order not queued");
        }
        info!(inserted, "Order submitted");
        Ok(tracked)
    }

    /// Cancels the order with `id`. Returns `false` when there is no such
    /// order or it already reached COMPLETED or CANCELLED.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<bool, OrderError> {
        let cancelled = self.roster.cancel(id).await?;
        info!(cancelled, "Cancel requested");
        Ok(cancelled)
    }

    /// Total of one order, `0.0` when it is not in the roster.
    pub async fn order_total_price(&self, id: OrderId) -> Result<f64, OrderError> {
        Ok(self
            .roster
            .get(id)
            .await?
            .map_or(0.0, |order| order.total_price()))
    }

    /// Total over every order in the roster, whatever its status.
    pub async fn total_price(&self) -> Result<f64, OrderError> {
        let orders = self.roster.list().await?;
        Ok(orders.iter().map(Order::total).sum::<Price>().as_f64())
    }

    /// Copy of the roster in submission order.
    pub async fn total_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.roster.list().await
    }
}
