//! # Order Pipeline
//!
//! Restaurant orders from submission to completion: a producer records and
//! queues orders, a background consumer drains the queue under a one-shot
//! processing gate, and the roster is snapshotted to text files across restarts.
//!
//! ## Architecture Notes
//!
//! ### 1. One owner for the roster
//! Every order lives in a single [`ResourceActor`](framework::ResourceActor). The
//! producer, the consumer worker, work cycles and the lifecycle hooks all talk to it
//! through cloned [`RosterClient`](clients::RosterClient)s. The actor handles one
//! request at a time, so a membership check and an insert, or "is anyone processing?"
//! and a transition, are single steps.
//!
//! ### 2. State machine inside the store
//! ```text
//! WAITING ──▶ PROCESSING ──▶ COMPLETED
//!    └────────────┴────────▶ CANCELLED
//! ```
//! At most one order is PROCESSING. The rule is checked by the roster actor itself
//! (see [`order_actor`]), not left to callers.
//!
//! ### 3. Gate and cancellation
//! The worker parks on a [`tokio::sync::Notify`] after each dequeued order and is
//! released by exactly one [`start_processing`](consumer::ConsumerClient::start_processing)
//! pulse. A [`CancellationToken`](tokio_util::sync::CancellationToken) stops it at
//! either wait.
//!
//! ### 4. Type-Safe Error Handling
//! Each layer defines its own `thiserror` enum. Lookup misses and refused transitions
//! are `false`/`None`, never errors; snapshot I/O failures are logged and yield an empty
//! or unsaved result.
//!
//! ### 5. Observability
//! `tracing` everywhere with structured fields. See [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`framework`] - generic single-writer store actor and its client
//! - [`model`] - [`Order`](model::Order), [`MenuItem`](model::MenuItem), [`Price`](model::Price)
//! - [`order_actor`] - roster transitions and the single-PROCESSING guard
//! - [`clients`] - [`RosterClient`](clients::RosterClient)
//! - [`order_factory`] - id synthesis, order construction, input validators
//! - [`queue`], [`producer`], [`consumer`] - the hand-off and both sides of it
//! - [`persistence`] - snapshot files under a read/write lock
//! - [`config`] - figment-layered [`PipelineConfig`](config::PipelineConfig)
//! - [`lifecycle`] - [`OrderSystem`](lifecycle::OrderSystem), tracing setup
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run -- --config pipeline.toml
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod consumer;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod order_factory;
pub mod persistence;
pub mod producer;
pub mod queue;
