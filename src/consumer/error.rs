//! Error types for the consumer.

use crate::order_actor::OrderError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConsumerError {
    /// The worker or a work cycle was interrupted by its cancellation token.
    #[error("Consumer worker stopped")]
    Stopped,

    /// The roster could not be reached.
    #[error(transparent)]
    Roster(#[from] OrderError),
}
