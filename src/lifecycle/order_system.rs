use crate::clients::{ActorClient, RosterClient};
use crate::config::PipelineConfig;
use crate::consumer::{ConsumerClient, ConsumerError};
use crate::model::{MenuItem, Order, OrderId, OrderStatus};
use crate::order_actor::OrderError;
use crate::persistence::SnapshotStore;
use crate::producer::Producer;
use crate::queue::submission_queue;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Errors surfaced by [`OrderSystem`].
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Roster(#[from] OrderError),

    #[error(transparent)]
    Consumer(#[from] ConsumerError),

    #[error("Task failed: {0}")]
    TaskFailed(String),
}

/// The main runtime orchestrator for the order pipeline.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the roster actor and the consumer worker
/// - **Dependency Wiring**: Handing the same roster client to the producer and the consumer
/// - **Persistence Hooks**: Reloading the latest snapshot at startup and writing one at shutdown
///
/// # Architecture
///
/// - **Roster actor**: the single owner of every order (see [`RosterClient`])
/// - **Consumer worker**: drains the submission queue and waits on the processing gate
/// - **Work cycles**: one tracked task per started order, completing it after the
///   preparation time
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(&PipelineConfig::default());
/// system.load_saved_orders().await?;
///
/// let id = system.submit_order(MenuItem::new("Ramen", 180.0), 2).await?;
/// system.process_next_order().await?;
///
/// system.save_orders_on_shutdown().await?;
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Direct access to the roster
    pub roster: RosterClient,

    /// Order intake
    pub producer: Producer,

    /// Processing operations and aggregates
    pub consumer: ConsumerClient,

    store: SnapshotStore,
    preparation: Duration,
    cancel: CancellationToken,
    tasks: TaskTracker,
    roster_handle: tokio::task::JoinHandle<()>,
    worker_handle: tokio::task::JoinHandle<Result<(), ConsumerError>>,
}

impl OrderSystem {
    /// Creates and starts a new `OrderSystem`.
    ///
    /// This method:
    /// 1. Spawns the roster actor
    /// 2. Connects the producer and the consumer worker through a fresh submission queue
    /// 3. Spawns the consumer worker
    pub fn new(config: &PipelineConfig) -> Self {
        let (roster_actor, roster) = crate::order_actor::new(config.roster_buffer);
        let roster_handle = tokio::spawn(roster_actor.run(()));

        let (queue, receiver) = submission_queue();
        let cancel = CancellationToken::new();
        let (worker, consumer) = crate::consumer::new(roster.clone(), receiver, cancel.clone());
        let worker_handle = tokio::spawn(worker.run());

        let producer = Producer::new(roster.clone(), queue);
        let store = SnapshotStore::new(&config.snapshot_dir).with_retention(config.keep_snapshots);

        info!(
            snapshot_dir = %config.snapshot_dir.display(),
            preparation_ms = config.preparation_time_ms,
            "Order system started"
        );

        Self {
            roster,
            producer,
            consumer,
            store,
            preparation: config.preparation_time(),
            cancel,
            tasks: TaskTracker::new(),
            roster_handle,
            worker_handle,
        }
    }

    pub fn snapshot_store(&self) -> &SnapshotStore {
        &self.store
    }

    // --- Collaborator interface ---

    /// Builds an order for `quantity` of `item` and submits it.
    ///
    /// Returns `None` when the quantity is rejected.
    pub async fn submit_order(
        &self,
        item: MenuItem,
        quantity: u32,
    ) -> Result<Option<OrderId>, SystemError> {
        let Some(order) = crate::order_factory::create_next_order(item, quantity) else {
            return Ok(None);
        };
        let id = order.id();
        self.producer.add_order(order).await?;
        Ok(Some(id))
    }

    /// Builds one order from every line of a cart and submits it.
    ///
    /// Returns `None`, submitting nothing, when the cart is empty or any
    /// quantity is rejected.
    pub async fn submit_cart(
        &self,
        lines: impl IntoIterator<Item = (MenuItem, u32)>,
    ) -> Result<Option<OrderId>, SystemError> {
        let Some(order) = crate::order_factory::create_cart_order(lines) else {
            return Ok(None);
        };
        let id = order.id();
        self.producer.add_order(order).await?;
        Ok(Some(id))
    }

    pub async fn cancel_order(&self, id: OrderId) -> Result<bool, SystemError> {
        Ok(self.producer.cancel_order(id).await?)
    }

    /// Releases the consumer worker for one dequeued order.
    pub fn start_processing(&self) {
        self.consumer.start_processing();
    }

    /// Starts the oldest WAITING order and completes it after the preparation
    /// time in a background task.
    ///
    /// Returns `None`, starting nothing, when no order is waiting or one is
    /// already processing.
    pub async fn process_next_order(&self) -> Result<Option<OrderId>, SystemError> {
        let started = self.consumer.process_next_order().await?;
        if let Some(id) = started {
            self.spawn_completion(id);
        }
        Ok(started)
    }

    pub async fn processing_order(&self) -> Result<Option<Order>, SystemError> {
        Ok(self.consumer.processing_order().await?)
    }

    pub async fn total_orders(&self) -> Result<Vec<Order>, SystemError> {
        Ok(self.producer.total_orders().await?)
    }

    pub async fn completed_orders(&self) -> Result<Vec<Order>, SystemError> {
        Ok(self.consumer.completed_orders().await?)
    }

    pub async fn count_of_completed_orders(&self) -> Result<usize, SystemError> {
        Ok(self.consumer.count_of_completed_orders().await?)
    }

    pub async fn revenue(&self) -> Result<f64, SystemError> {
        Ok(self.consumer.revenue().await?)
    }

    pub async fn total_price(&self) -> Result<f64, SystemError> {
        Ok(self.producer.total_price().await?)
    }

    // --- Persistence hooks ---

    /// Re-seeds the pipeline from the newest snapshot.
    ///
    /// WAITING orders are resubmitted, a PROCESSING order resumes and completes
    /// after the preparation time, COMPLETED orders are recorded as such and
    /// CANCELLED orders are skipped. Returns how many orders were restored.
    pub async fn load_saved_orders(&self) -> Result<usize, SystemError> {
        let saved = self.store.read_all_orders().await;
        let mut restored = 0;

        for order in saved {
            let id = order.id();
            match order.status() {
                OrderStatus::Waiting => {
                    self.producer.add_order(order).await?;
                    restored += 1;
                }
                OrderStatus::Processing => {
                    let fallback = Order::restore(
                        id,
                        order.time(),
                        OrderStatus::Waiting,
                        order.items().to_vec(),
                    );
                    if self.consumer.set_processing_order(order).await? {
                        self.spawn_completion(id);
                    } else {
                        warn!(order_id = %id, "Another order is processing, requeueing as waiting");
                        self.producer.add_order(fallback).await?;
                    }
                    restored += 1;
                }
                OrderStatus::Completed => {
                    if self.consumer.add_completed_order(order).await? {
                        restored += 1;
                    }
                }
                OrderStatus::Cancelled => debug!(order_id = %id, "Skipping cancelled order"),
            }
        }

        info!(restored, "Saved orders loaded");
        Ok(restored)
    }

    /// Writes WAITING, then PROCESSING, then COMPLETED orders to a new
    /// snapshot. CANCELLED orders are dropped.
    ///
    /// A failed write is logged and reported as `None`.
    pub async fn save_orders_on_shutdown(&self) -> Result<Option<PathBuf>, SystemError> {
        let roster = self.roster.list().await?;
        let to_save: Vec<Order> = [
            OrderStatus::Waiting,
            OrderStatus::Processing,
            OrderStatus::Completed,
        ]
        .into_iter()
        .flat_map(|status| roster.iter().filter(move |o| o.status() == status).cloned())
        .collect();

        Ok(self.store.save_orders(&to_save).await)
    }

    /// Waits until every work cycle started so far has finished.
    pub async fn wait_for_work_cycles(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn spawn_completion(&self, id: OrderId) {
        let consumer = self.consumer.clone();
        let preparation = self.preparation;
        self.tasks.spawn(async move {
            match consumer.complete_after(id, preparation).await {
                Ok(true) => info!(order_id = %id, "Order completed"),
                Ok(false) => debug!(order_id = %id, "Order left processing before completion"),
                Err(ConsumerError::Stopped) => debug!(order_id = %id, "Work cycle interrupted"),
                Err(e) => warn!(order_id = %id, error = %e, "Work cycle failed"),
            }
        });
    }

    /// Gracefully shuts down the entire system.
    ///
    /// This method:
    /// 1. Cancels the consumer worker and any running work cycle
    /// 2. Waits for them to finish
    /// 3. Drops all clients, which closes the roster actor's channel
    /// 4. Waits for the roster actor to exit
    ///
    /// Orders still PROCESSING stay PROCESSING; call
    /// [`save_orders_on_shutdown`](Self::save_orders_on_shutdown) first to keep them.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        // =====================================================================
        // Step 1: Stop the worker and the work cycles
        // =====================================================================

        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;

        match self.worker_handle.await {
            Ok(Ok(())) | Ok(Err(ConsumerError::Stopped)) => {}
            Ok(Err(e)) => warn!(error = %e, "Consumer worker ended with an error"),
            Err(e) => {
                error!("Consumer worker failed: {:?}", e);
                return Err(SystemError::TaskFailed(format!("consumer worker: {e}")));
            }
        }

        // =====================================================================
        // Step 2: Close the roster by dropping every client
        // =====================================================================

        drop(self.producer);
        drop(self.consumer);
        drop(self.roster);

        if let Err(e) = self.roster_handle.await {
            error!("Roster actor failed: {:?}", e);
            return Err(SystemError::TaskFailed(format!("roster actor: {e}")));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
