use super::error::ConsumerError;
use crate::clients::RosterClient;
use crate::model::Order;
use crate::queue::QueueReceiver;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The long-lived background task that drains the submission queue.
///
/// Each dequeued order is added to the roster (if its id is new) and the
/// worker then parks on the processing gate until exactly one
/// [`ConsumerClient::start_processing`](super::ConsumerClient::start_processing)
/// pulse releases it.
pub struct ConsumerWorker {
    pub(super) queue: QueueReceiver,
    pub(super) roster: RosterClient,
    pub(super) gate: Arc<Notify>,
    pub(super) cancel: CancellationToken,
}

fn is_well_formed(order: &Order) -> bool {
    order.id().0 != 0 && !order.items().is_empty()
}

impl ConsumerWorker {
    /// Runs until the queue closes (`Ok`) or the cancellation token fires
    /// (`Err(ConsumerError::Stopped)`). Both blocking points observe the token.
    pub async fn run(mut self) -> Result<(), ConsumerError> {
        info!("Consumer worker started");

        loop {
            let order = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("Consumer worker stopped while waiting for orders");
                    return Err(ConsumerError::Stopped);
                }
                next = self.queue.pop() => match next {
                    Some(order) => order,
                    None => {
                        info!("Submission queue closed, consumer worker exiting");
                        return Ok(());
                    }
                },
            };

            let order_id = order.id();
            if !is_well_formed(&order) {
                warn!(%order_id, "Dropping ill-formed order");
                continue;
            }

            let tracked = self.roster.insert(order).await?;
            debug!(%order_id, tracked, "Order dequeued");

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!(%order_id, "Consumer worker stopped at processing gate");
                    return Err(ConsumerError::Stopped);
                }
                _ = self.gate.notified() => {
                    debug!(%order_id, "Processing gate released");
                }
            }
        }
    }
}
