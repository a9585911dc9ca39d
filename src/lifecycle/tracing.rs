//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Log lines use a compact format without the crate/module prefix (`with_target(false)`).
//! The roster actor tags its lines with `entity_type` instead, and every order-related
//! line carries an `order_id` field.
//!
//! ```bash
//! # Lifecycle, submissions, completions, snapshots
//! RUST_LOG=info cargo run
//!
//! # Every roster request, gate pulse and full order payloads
//! RUST_LOG=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**, submitting and processing one order:
//!
//! ```text
//! INFO Order system started snapshot_dir=orders preparation_ms=3000
//! INFO add_order: Inserted entity_type="Order" id=17145612345671234 size=1
//! INFO add_order: Order submitted order_id=17145612345671234 inserted=true
//! INFO process_next_order: Processing started order_id=17145612345671234
//! INFO complete_after: Preparation finished order_id=17145612345671234 completed=true
//! INFO Orders saved path=orders/orders-2024-05-01-12-30-05.txt count=1
//! ```
//!
//! Use `debug` level to see the full order at the client entry points:
//!
//! ```rust,ignore
//! debug!(?order, "add_order called");
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type and order_id fields say where a line came from
        .compact()
        .init();
}
