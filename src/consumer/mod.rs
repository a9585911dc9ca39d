//! The kitchen side of the pipeline.
//!
//! [`new`] returns the pair the rest of the crate works with:
//!
//! - [`ConsumerWorker`] - spawned once, drains the submission queue
//! - [`ConsumerClient`] - cloneable handle for processing operations and
//!   the aggregate getters, callable from anywhere while the worker runs
//!
//! Both sides share the roster client, the processing gate and one
//! cancellation token.

pub mod error;
pub mod worker;

pub use error::*;
pub use worker::*;

use crate::clients::{ActorClient, RosterClient};
use crate::model::{Order, OrderId, OrderStatus, Price};
use crate::queue::QueueReceiver;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Creates a consumer worker and the client that drives it.
pub fn new(
    roster: RosterClient,
    queue: QueueReceiver,
    cancel: CancellationToken,
) -> (ConsumerWorker, ConsumerClient) {
    let gate = Arc::new(Notify::new());
    let worker = ConsumerWorker {
        queue,
        roster: roster.clone(),
        gate: gate.clone(),
        cancel: cancel.clone(),
    };
    let client = ConsumerClient {
        roster,
        gate,
        cancel,
    };
    (worker, client)
}

#[derive(Clone)]
pub struct ConsumerClient {
    roster: RosterClient,
    gate: Arc<Notify>,
    cancel: CancellationToken,
}

impl ConsumerClient {
    /// Releases the worker for one dequeued order.
    ///
    /// Pulses do not stack: with the worker not yet parked, at most one is
    /// remembered for its next wait.
    pub fn start_processing(&self) {
        debug!("Processing gate pulsed");
        self.gate.notify_one();
    }

    /// Moves order `id` to PROCESSING.
    ///
    /// Returns `false` when the order is unknown, already finished, or another
    /// order holds the processing slot.
    #[instrument(skip(self))]
    pub async fn process_order(&self, id: OrderId) -> Result<bool, ConsumerError> {
        Ok(self.roster.start_processing(id).await?)
    }

    /// Moves the oldest WAITING order to PROCESSING, if the slot is free.
    #[instrument(skip(self))]
    pub async fn process_next_order(&self) -> Result<Option<OrderId>, ConsumerError> {
        let started = self.roster.start_next_waiting().await?;
        match started {
            Some(id) => info!(order_id = %id, "Processing started"),
            None => debug!("No order started"),
        }
        Ok(started)
    }

    pub async fn processing_order(&self) -> Result<Option<Order>, ConsumerError> {
        Ok(self.roster.processing_order().await?)
    }

    pub async fn completed_orders(&self) -> Result<Vec<Order>, ConsumerError> {
        Ok(self.roster.with_status(OrderStatus::Completed).await?)
    }

    pub async fn count_of_completed_orders(&self) -> Result<usize, ConsumerError> {
        Ok(self.completed_orders().await?.len())
    }

    /// Sum of totals over COMPLETED orders.
    pub async fn revenue(&self) -> Result<f64, ConsumerError> {
        let revenue: Price = self
            .completed_orders()
            .await?
            .iter()
            .map(Order::total)
            .sum();
        Ok(revenue.as_f64())
    }

    pub async fn total_orders(&self) -> Result<Vec<Order>, ConsumerError> {
        Ok(self.roster.list().await?)
    }

    /// Marks order `id` COMPLETED whatever stage it reached, unless it was cancelled.
    #[instrument(skip(self))]
    pub async fn completed_order(&self, id: OrderId) -> Result<bool, ConsumerError> {
        Ok(self.roster.force_complete(id).await?)
    }

    /// Records `order` as COMPLETED, adding it to the roster if it is not there.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn add_completed_order(&self, mut order: Order) -> Result<bool, ConsumerError> {
        if !order.force_complete() {
            return Ok(false);
        }
        let id = order.id();
        if self.roster.insert(order).await? {
            return Ok(true);
        }
        self.completed_order(id).await
    }

    /// Records `order` as PROCESSING, adding it to the roster if it is not there.
    ///
    /// Returns `false` when another order is already processing.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn set_processing_order(&self, mut order: Order) -> Result<bool, ConsumerError> {
        if !order.start_processing() {
            return Ok(false);
        }
        let id = order.id();
        if self.roster.insert(order).await? {
            return Ok(true);
        }
        self.process_order(id).await
    }

    /// Pulses the gate, waits `preparation`, then completes order `id`.
    ///
    /// The wait observes the cancellation token.
    #[instrument(skip(self))]
    pub async fn complete_after(
        &self,
        id: OrderId,
        preparation: Duration,
    ) -> Result<bool, ConsumerError> {
        self.start_processing();
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ConsumerError::Stopped),
            _ = tokio::time::sleep(preparation) => {}
        }
        let completed = self.roster.complete(id).await?;
        info!(order_id = %id, completed, "Preparation finished");
        Ok(completed)
    }

    /// One full kitchen cycle: start the oldest WAITING order, release the
    /// worker, prepare, complete.
    ///
    /// Returns the completed order's id, or `None` when nothing could start.
    pub async fn run_work_cycle(
        &self,
        preparation: Duration,
    ) -> Result<Option<OrderId>, ConsumerError> {
        let Some(id) = self.process_next_order().await? else {
            return Ok(None);
        };
        let completed = self.complete_after(id, preparation).await?;
        Ok(completed.then_some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuItem;
    use crate::producer::Producer;
    use crate::queue::submission_queue;

    struct Rig {
        producer: Producer,
        consumer: ConsumerClient,
        cancel: CancellationToken,
        worker: tokio::task::JoinHandle<Result<(), ConsumerError>>,
    }

    fn rig() -> Rig {
        let (actor, roster) = crate::order_actor::new(16);
        tokio::spawn(actor.run(()));
        let (queue, receiver) = submission_queue();
        let cancel = CancellationToken::new();
        let (worker, consumer) = new(roster.clone(), receiver, cancel.clone());
        Rig {
            producer: Producer::new(roster, queue),
            consumer,
            cancel,
            worker: tokio::spawn(worker.run()),
        }
    }

    fn order(id: u64, price: f64, quantity: u32) -> Order {
        let mut order = Order::new(OrderId(id));
        order.add_item(MenuItem::new("Bibimbap", price), quantity);
        order
    }

    #[tokio::test]
    async fn revenue_counts_completed_orders_only() {
        let rig = rig();
        rig.consumer.add_completed_order(order(1, 50.0, 2)).await.unwrap();
        rig.producer.add_order(order(2, 20.0, 1)).await.unwrap();

        assert_eq!(rig.consumer.revenue().await.unwrap(), 100.0);
        assert_eq!(rig.consumer.count_of_completed_orders().await.unwrap(), 1);
        assert_eq!(rig.producer.total_price().await.unwrap(), 120.0);
    }

    #[tokio::test]
    async fn next_order_waits_for_processing_slot() {
        let rig = rig();
        rig.producer.add_order(order(111, 10.0, 1)).await.unwrap();
        assert!(rig.consumer.set_processing_order(order(222, 10.0, 1)).await.unwrap());

        assert_eq!(rig.consumer.process_next_order().await.unwrap(), None);
        assert!(!rig.consumer.process_order(OrderId(111)).await.unwrap());

        let processing = rig.consumer.processing_order().await.unwrap().unwrap();
        assert_eq!(processing.id(), OrderId(222));
        let orders = rig.consumer.total_orders().await.unwrap();
        let waiting = orders.iter().find(|o| o.id() == OrderId(111)).unwrap();
        assert_eq!(waiting.status(), OrderStatus::Waiting);
    }

    #[tokio::test]
    async fn work_cycle_completes_oldest_waiting_order() {
        let rig = rig();
        rig.producer.add_order(order(1, 10.0, 1)).await.unwrap();
        rig.producer.add_order(order(2, 10.0, 1)).await.unwrap();

        let done = rig
            .consumer
            .run_work_cycle(Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(done, Some(OrderId(1)));
        assert!(rig.consumer.processing_order().await.unwrap().is_none());
        assert_eq!(rig.consumer.count_of_completed_orders().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cancelled_token_stops_worker_and_cycle() {
        let rig = rig();
        rig.producer.add_order(order(1, 10.0, 1)).await.unwrap();
        rig.cancel.cancel();

        let cycle = rig.consumer.run_work_cycle(Duration::from_secs(60)).await;
        assert_eq!(cycle, Err(ConsumerError::Stopped));
        assert_eq!(rig.worker.await.unwrap(), Err(ConsumerError::Stopped));
    }
}
