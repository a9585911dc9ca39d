//! Customer orders.
//!
//! # Actor Framework
//! [`Order`] implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
//! allowing it to be held in the roster by a [`ResourceActor`](crate::framework::ResourceActor).
//!
//! # State machine
//! ```text
//! WAITING ──start_processing──▶ PROCESSING ──complete──▶ COMPLETED
//!    │                              │
//!    └────────cancel────────────────┴──────▶ CANCELLED
//! ```
//! COMPLETED and CANCELLED are terminal. A transition that does not apply is a
//! no-op and reports `false`.

use crate::model::{MenuItem, Price};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Waiting,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0:?}")]
pub struct StatusParseError(pub String);

impl FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// One menu item and how many of it were requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item: MenuItem,
    pub quantity: u32,
}

impl OrderLine {
    pub fn subtotal(&self) -> Price {
        self.item.price().times(self.quantity)
    }
}

/// A customer order: id, creation time, status and item lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    time: NaiveDateTime,
    status: OrderStatus,
    items: Vec<OrderLine>,
}

impl Order {
    /// Creates a WAITING order with no items, stamped with the current local time.
    pub fn new(id: OrderId) -> Self {
        Self::with_time(id, chrono::Local::now().naive_local())
    }

    /// Creates a WAITING order with an explicit creation time.
    pub fn with_time(id: OrderId, time: NaiveDateTime) -> Self {
        Self {
            id,
            time,
            status: OrderStatus::Waiting,
            items: Vec::new(),
        }
    }

    /// Rebuilds an order exactly as it was persisted, status included.
    pub fn restore(
        id: OrderId,
        time: NaiveDateTime,
        status: OrderStatus,
        items: impl IntoIterator<Item = OrderLine>,
    ) -> Self {
        let mut order = Self::with_time(id, time);
        order.status = status;
        for line in items {
            order.add_item(line.item, line.quantity);
        }
        order
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Item lines in the order they were first added.
    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    /// Looks up a line by item name.
    pub fn item(&self, name: &str) -> Option<&OrderLine> {
        self.items.iter().find(|line| line.item.name() == name)
    }

    /// Adds `quantity` of `item`; quantities of an item already present merge,
    /// clamping at `u32::MAX`.
    pub fn add_item(&mut self, item: MenuItem, quantity: u32) {
        match self.items.iter_mut().find(|line| line.item == item) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(OrderLine { item, quantity }),
        }
    }

    pub fn total(&self) -> Price {
        self.items.iter().map(OrderLine::subtotal).sum()
    }

    /// Σ(price × quantity) over all lines.
    pub fn total_price(&self) -> f64 {
        self.total().as_f64()
    }

    // --- Transitions ---

    /// WAITING → PROCESSING. An order already PROCESSING reports `true`
    /// without changing.
    pub fn start_processing(&mut self) -> bool {
        match self.status {
            OrderStatus::Waiting => {
                self.status = OrderStatus::Processing;
                true
            }
            OrderStatus::Processing => true,
            OrderStatus::Completed | OrderStatus::Cancelled => false,
        }
    }

    /// PROCESSING → COMPLETED.
    pub fn complete(&mut self) -> bool {
        if self.status == OrderStatus::Processing {
            self.status = OrderStatus::Completed;
            true
        } else {
            false
        }
    }

    /// Moves any non-cancelled order to COMPLETED. Used when replaying saved
    /// orders and when a finished order is handed over directly.
    pub fn force_complete(&mut self) -> bool {
        if self.status == OrderStatus::Cancelled {
            return false;
        }
        self.status = OrderStatus::Completed;
        true
    }

    /// WAITING or PROCESSING → CANCELLED.
    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        true
    }

    // --- Age ---

    /// More than 24 hours old at `now`.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now - Duration::hours(24) > self.time
    }

    /// Placed within the hour before `now`.
    pub fn is_new(&self, now: NaiveDateTime) -> bool {
        now - Duration::hours(1) < self.time
    }
}

/// One-line order report.
impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "order {} placed {} [{}] total {:.2}",
            self.id,
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.status,
            self.total_price()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn order_with(status: OrderStatus) -> Order {
        Order::restore(OrderId(1), at(12, 0), status, Vec::<OrderLine>::new())
    }

    #[test]
    fn new_order_starts_waiting_and_empty() {
        let order = Order::new(OrderId(42));
        assert_eq!(order.status(), OrderStatus::Waiting);
        assert!(order.items().is_empty());
        assert_eq!(order.total_price(), 0.0);
    }

    #[test]
    fn same_item_quantities_merge() {
        let mut order = Order::new(OrderId(1));
        order.add_item(MenuItem::new("Dumplings", 60.0), 2);
        order.add_item(MenuItem::new("Tea", 25.5), 1);
        order.add_item(MenuItem::new("Dumplings", 60.0), 3);

        assert_eq!(order.items().len(), 2);
        assert_eq!(order.item("Dumplings").unwrap().quantity, 5);
        assert!(order.item("Noodles").is_none());
        assert_eq!(order.total_price(), 325.5);
    }

    #[test]
    fn huge_quantities_and_prices_clamp_instead_of_overflowing() {
        let mut order = Order::new(OrderId(1));
        order.add_item(MenuItem::new("Rice", 10.0), u32::MAX);
        order.add_item(MenuItem::new("Rice", 10.0), 2);
        assert_eq!(order.item("Rice").unwrap().quantity, u32::MAX);

        let gold = MenuItem::new("Gold Leaf", Price::from_cents(u64::MAX / 2));
        order.add_item(gold, 3);
        assert_eq!(order.total(), Price::from_cents(u64::MAX));
    }

    #[test]
    fn happy_path_transitions() {
        let mut order = order_with(OrderStatus::Waiting);
        assert!(order.start_processing());
        assert_eq!(order.status(), OrderStatus::Processing);
        assert!(order.complete());
        assert_eq!(order.status(), OrderStatus::Completed);
    }

    #[test]
    fn terminal_states_do_not_move() {
        let mut completed = order_with(OrderStatus::Completed);
        assert!(!completed.cancel());
        assert!(!completed.start_processing());
        assert!(!completed.complete());
        assert_eq!(completed.status(), OrderStatus::Completed);

        let mut cancelled = order_with(OrderStatus::Cancelled);
        assert!(!cancelled.start_processing());
        assert!(!cancelled.force_complete());
        assert!(!cancelled.cancel());
        assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn cancel_from_waiting_and_processing() {
        let mut waiting = order_with(OrderStatus::Waiting);
        assert!(waiting.cancel());
        let mut processing = order_with(OrderStatus::Processing);
        assert!(processing.cancel());
        assert_eq!(processing.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn complete_requires_processing() {
        let mut waiting = order_with(OrderStatus::Waiting);
        assert!(!waiting.complete());
        assert!(waiting.force_complete());
        assert_eq!(waiting.status(), OrderStatus::Completed);
    }

    #[test]
    fn age_predicates() {
        let order = Order::with_time(OrderId(1), at(12, 0));
        assert!(order.is_new(at(12, 30)));
        assert!(!order.is_new(at(13, 30)));
        assert!(!order.is_expired(at(23, 59)));
        assert!(order.is_expired(at(12, 0) + Duration::hours(25)));
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            OrderStatus::Waiting,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("DONE".parse::<OrderStatus>().is_err());
    }
}
