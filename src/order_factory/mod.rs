//! Order construction: id synthesis plus input validation.

pub mod validator;

use crate::model::{MenuItem, Order, OrderId};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Highest id handed out so far in this process.
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Synthesizes a 17-digit order id: epoch milliseconds (13 digits) followed by
/// a random 4-digit suffix.
///
/// Ids are strictly increasing within a process. When the random candidate
/// would not exceed the last id issued, the last id plus one is used instead,
/// so a burst inside one millisecond can never collide.
pub fn next_order_id() -> OrderId {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let suffix: u64 = rand::thread_rng().gen_range(0..10_000);
    let candidate = millis * 10_000 + suffix;

    let previous = match LAST_ID.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(candidate.max(last + 1))
    }) {
        Ok(previous) | Err(previous) => previous,
    };
    OrderId(candidate.max(previous + 1))
}

/// Creates a WAITING order holding `quantity` of `item`.
///
/// Returns `None` when the quantity is outside 1..=99.
pub fn create_next_order(item: MenuItem, quantity: u32) -> Option<Order> {
    if !validator::is_valid_quantity(&quantity.to_string()) {
        warn!(quantity, item = item.name(), "Rejected order quantity");
        return None;
    }

    let mut order = Order::new(next_order_id());
    order.add_item(item, quantity);
    debug!(order_id = %order.id(), "Order created");
    Some(order)
}

/// Creates one WAITING order from a whole cart: the first line starts the
/// order and the rest are added to it, merging repeated items.
///
/// Returns `None` when the cart is empty or any quantity is outside 1..=99.
pub fn create_cart_order(lines: impl IntoIterator<Item = (MenuItem, u32)>) -> Option<Order> {
    let mut lines = lines.into_iter();
    let (item, quantity) = lines.next()?;
    let mut order = create_next_order(item, quantity)?;
    for (item, quantity) in lines {
        if !validator::is_valid_quantity(&quantity.to_string()) {
            warn!(quantity, item = item.name(), "Rejected cart quantity");
            return None;
        }
        order.add_item(item, quantity);
    }
    Some(order)
}
