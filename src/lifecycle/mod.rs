//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`OrderSystem`] - Starts the roster actor and consumer worker, wires the
//!   producer to them, and owns the snapshot store
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod order_system;
pub mod tracing;

pub use self::order_system::*;
pub use self::tracing::*;
