//! Custom actions for the Order actor.
//!
//! This module defines the state transitions that can be requested for an
//! [`Order`](crate::model::Order) held by the roster. They are handled by
//! [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action)
//! and every one of them answers with a `bool`: `true` when the order ends up
//! in the requested state, `false` when the transition did not apply.

/// State transitions for Order entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// WAITING → PROCESSING.
    ///
    /// # Errors
    /// Rejected by the actor when a different order is already PROCESSING.
    StartProcessing,
    /// PROCESSING → COMPLETED, at the end of a work cycle.
    Complete,
    /// Any non-cancelled state → COMPLETED.
    ForceComplete,
    /// WAITING or PROCESSING → CANCELLED.
    Cancel,
}
