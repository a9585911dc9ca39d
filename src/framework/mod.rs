//! Generic single-writer store framework.
//!
//! This module provides the building blocks for an actor that owns an
//! insertion-ordered collection of entities and applies guarded actions to them.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored types implement
//! - [`ResourceActor`] - Generic actor that owns the store
//! - [`ResourceClient`] - Type-safe, cloneable handle used by every caller
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use self::core::*;
