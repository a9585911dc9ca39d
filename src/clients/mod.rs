//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod actor_client;
pub mod roster_client;

pub use actor_client::*;
pub use roster_client::*;
