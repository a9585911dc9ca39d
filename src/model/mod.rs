//! Pure data structures. [`Order`] implements the
//! [`ActorEntity`](crate::framework::ActorEntity) trait.

pub mod menu_item;
pub mod order;

pub use menu_item::*;
pub use order::*;
