//! Order-specific resource logic: the roster actor and its state transitions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::RosterClient;
use crate::framework::ResourceActor;
use crate::model::Order;

/// Creates a new roster actor and its client.
pub fn new(buffer: usize) -> (ResourceActor<Order>, RosterClient) {
    let (actor, generic_client) = ResourceActor::new(buffer);
    let client = RosterClient::new(generic_client);

    (actor, client)
}
