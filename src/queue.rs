//! The submission queue: an unbounded FIFO hand-off from producers to the
//! consumer worker.
//!
//! Pushing never blocks. Popping waits until an order arrives or every
//! [`SubmissionQueue`] handle has been dropped.

use crate::model::Order;
use tokio::sync::mpsc;

/// Sending half. Cheap to clone; every clone feeds the same receiver.
#[derive(Clone, Debug)]
pub struct SubmissionQueue {
    sender: mpsc::UnboundedSender<Order>,
}

/// Receiving half, owned by the consumer worker.
#[derive(Debug)]
pub struct QueueReceiver {
    receiver: mpsc::UnboundedReceiver<Order>,
}

/// Creates a connected queue pair.
pub fn submission_queue() -> (SubmissionQueue, QueueReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (SubmissionQueue { sender }, QueueReceiver { receiver })
}

impl SubmissionQueue {
    /// Appends `order` to the back of the queue.
    ///
    /// Returns `false` when the worker side is gone and the order was not queued.
    pub fn push(&self, order: Order) -> bool {
        self.sender.send(order).is_ok()
    }
}

impl QueueReceiver {
    /// Takes the order at the front, waiting for one if the queue is empty.
    ///
    /// `None` means every sender is gone and nothing is left to drain.
    /// Cancel safe: dropping the future never loses an order.
    pub async fn pop(&mut self) -> Option<Order> {
        self.receiver.recv().await
    }
}
