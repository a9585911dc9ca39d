//! Entity trait implementation for the Order domain type.
//!
//! This module contains the [`ActorEntity`] trait implementation
//! that enables [`Order`] to be held by the generic [`crate::framework::ResourceActor`].
//!
//! The single-PROCESSING rule lives here: both guards run inside the actor's
//! message loop, so "is anyone else processing?" and the transition itself
//! cannot interleave with another request.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::framework::ActorEntity;
use crate::model::{Order, OrderId, OrderStatus};
use async_trait::async_trait;

fn other_processing(order: &Order, store: &[Order]) -> Option<OrderId> {
    store
        .iter()
        .find(|o| o.status() == OrderStatus::Processing && o.id() != order.id())
        .map(Order::id)
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Action = OrderAction;
    type ActionResult = bool;
    type Context = ();
    type Error = OrderError;

    fn id(&self) -> OrderId {
        Order::id(self)
    }

    /// An order may only join the roster as PROCESSING while nobody else is.
    fn on_insert(&self, store: &[Self]) -> Result<(), OrderError> {
        if self.status() != OrderStatus::Processing {
            return Ok(());
        }
        match other_processing(self, store) {
            Some(current) => Err(OrderError::AlreadyProcessing {
                requested: self.id(),
                current,
            }),
            None => Ok(()),
        }
    }

    fn guard_action(&self, action: &OrderAction, store: &[Self]) -> Result<(), OrderError> {
        if *action != OrderAction::StartProcessing || self.status() != OrderStatus::Waiting {
            return Ok(());
        }
        match other_processing(self, store) {
            Some(current) => Err(OrderError::AlreadyProcessing {
                requested: self.id(),
                current,
            }),
            None => Ok(()),
        }
    }

    /// Handles state transitions for the Order entity.
    ///
    /// # Actions
    /// - `StartProcessing`: WAITING → PROCESSING
    /// - `Complete`: PROCESSING → COMPLETED
    /// - `ForceComplete`: anything but CANCELLED → COMPLETED
    /// - `Cancel`: WAITING/PROCESSING → CANCELLED
    async fn handle_action(&mut self, action: OrderAction, _ctx: &()) -> Result<bool, OrderError> {
        Ok(match action {
            OrderAction::StartProcessing => self.start_processing(),
            OrderAction::Complete => self.complete(),
            OrderAction::ForceComplete => self.force_complete(),
            OrderAction::Cancel => self.cancel(),
        })
    }
}
