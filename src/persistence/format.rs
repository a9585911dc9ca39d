//! The snapshot text format.
//!
//! ```text
//! ==== Orders Details ====
//! Order ID: 17145612345671234
//! Order Time: 2024-05-01T12:30:05.123
//! Order Status: WAITING
//! Menu Items:
//! Beef Noodles-180.0-2
//! ========================
//! ```
//!
//! Item lines are `name-price-quantity`, split from the right, so a hyphen in
//! the name survives a round trip. Records without a closing delimiter, or
//! with id 0, are dropped.

use super::error::PersistenceError;
use crate::model::{MenuItem, Order, OrderId, OrderLine, OrderStatus, Price};
use chrono::NaiveDateTime;
use std::fmt::Write;

pub const RECORD_START: &str = "==== Orders Details ====";
pub const RECORD_END: &str = "========================";
const ID_FIELD: &str = "Order ID:";
const TIME_FIELD: &str = "Order Time:";
const STATUS_FIELD: &str = "Order Status:";
const ITEMS_HEADER: &str = "Menu Items:";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIME_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// Renders `orders` as one record block each, in the given order.
pub fn encode_orders(orders: &[Order]) -> String {
    let mut out = String::new();
    for order in orders {
        // Writing into a String cannot fail.
        let _ = write_record(&mut out, order);
    }
    out
}

fn write_record(out: &mut String, order: &Order) -> std::fmt::Result {
    writeln!(out, "{RECORD_START}")?;
    writeln!(out, "{ID_FIELD} {}", order.id())?;
    writeln!(out, "{TIME_FIELD} {}", order.time().format(TIME_FORMAT))?;
    writeln!(out, "{STATUS_FIELD} {}", order.status())?;
    writeln!(out, "{ITEMS_HEADER}")?;
    for line in order.items() {
        writeln!(out, "{}-{}", line.item, line.quantity)?;
    }
    writeln!(out, "{RECORD_END}")
}

#[derive(Default)]
struct Draft {
    id: u64,
    time: Option<NaiveDateTime>,
    status: Option<OrderStatus>,
    items: Vec<OrderLine>,
}

impl Draft {
    /// Repeated item lines merge; a merged quantity past `u32::MAX` is malformed.
    fn add_line(&mut self, line: OrderLine, line_no: usize) -> Result<(), PersistenceError> {
        match self.items.iter_mut().find(|known| known.item == line.item) {
            Some(known) => {
                known.quantity = known
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| malformed(line_no, "merged quantity overflows"))?;
            }
            None => self.items.push(line),
        }
        Ok(())
    }
}

fn malformed(line: usize, message: impl Into<String>) -> PersistenceError {
    PersistenceError::Malformed {
        line,
        message: message.into(),
    }
}

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIME_FORMAT_MINUTES))
        .ok()
}

/// `None` when the line is not shaped like an item line at all.
fn parse_item(value: &str, line: usize) -> Result<Option<OrderLine>, PersistenceError> {
    let mut parts = value.rsplitn(3, '-');
    let (Some(quantity), Some(price), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Ok(None);
    };
    let price: Price = price
        .parse()
        .map_err(|e| malformed(line, format!("{e}")))?;
    let quantity: u32 = quantity
        .parse()
        .map_err(|_| malformed(line, format!("invalid quantity {quantity:?}")))?;
    Ok(Some(OrderLine {
        item: MenuItem::new(name, price),
        quantity,
    }))
}

/// Parses a whole snapshot. Any unreadable field fails the entire text.
pub fn parse_orders(text: &str) -> Result<Vec<Order>, PersistenceError> {
    let mut orders = Vec::new();
    let mut draft = Draft::default();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();

        if line == RECORD_START {
            draft = Draft::default();
        } else if let Some(value) = line.strip_prefix(ID_FIELD) {
            let value = value.trim();
            draft.id = value
                .parse()
                .map_err(|_| malformed(line_no, format!("invalid order id {value:?}")))?;
        } else if let Some(value) = line.strip_prefix(TIME_FIELD) {
            let value = value.trim();
            draft.time = Some(
                parse_time(value)
                    .ok_or_else(|| malformed(line_no, format!("invalid order time {value:?}")))?,
            );
        } else if let Some(value) = line.strip_prefix(STATUS_FIELD) {
            draft.status = Some(
                value
                    .trim()
                    .parse()
                    .map_err(|e| malformed(line_no, format!("{e}")))?,
            );
        } else if line == ITEMS_HEADER {
            continue;
        } else if line == RECORD_END {
            let finished = std::mem::take(&mut draft);
            if finished.id == 0 {
                continue;
            }
            let time = finished
                .time
                .ok_or_else(|| malformed(line_no, "record has no order time"))?;
            let status = finished
                .status
                .ok_or_else(|| malformed(line_no, "record has no order status"))?;
            orders.push(Order::restore(
                OrderId(finished.id),
                time,
                status,
                finished.items,
            ));
        } else if line.contains('-') {
            if let Some(item) = parse_item(line, line_no)? {
                draft.add_line(item, line_no)?;
            }
        }
    }

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(12, 30, 5, 123)
            .unwrap()
    }

    #[test]
    fn encodes_record_layout() {
        let mut order = Order::with_time(OrderId(17145612345671234), time());
        order.add_item(MenuItem::new("Beef Noodles", 180.0), 2);
        order.add_item(MenuItem::new("Iced Tea", 35.25), 1);

        let text = encode_orders(&[order]);
        let expected = "\
==== Orders Details ====
Order ID: 17145612345671234
Order Time: 2024-05-01T12:30:05.123
Order Status: WAITING
Menu Items:
Beef Noodles-180.0-2
Iced Tea-35.25-1
========================
";
        assert_eq!(text, expected);
    }

    #[test]
    fn hyphenated_names_survive() {
        let mut order = Order::with_time(OrderId(1), time());
        order.add_item(MenuItem::new("Fish-and-Chips", 12.5), 3);

        let parsed = parse_orders(&encode_orders(&[order.clone()])).unwrap();
        assert_eq!(parsed, vec![order]);
        assert_eq!(parsed[0].items()[0].item.name(), "Fish-and-Chips");
    }

    #[test]
    fn accepts_minute_precision_time() {
        let text = "\
==== Orders Details ====
Order ID: 5
Order Time: 2024-05-01T12:30
Order Status: COMPLETED
Menu Items:
Rice-10.0-1
========================
";
        let orders = parse_orders(text).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].time().format("%H:%M:%S").to_string(), "12:30:00");
        assert_eq!(orders[0].status(), OrderStatus::Completed);
    }

    #[test]
    fn unterminated_and_zero_id_records_are_dropped() {
        let text = "\
==== Orders Details ====
Order ID: 0
Order Time: 2024-05-01T12:30
Order Status: WAITING
Menu Items:
Rice-10.0-1
========================
==== Orders Details ====
Order ID: 7
Order Time: 2024-05-01T12:30
Order Status: WAITING
Menu Items:
Rice-10.0-1
";
        assert!(parse_orders(text).unwrap().is_empty());
    }

    #[test]
    fn item_lines_without_three_parts_are_ignored() {
        let text = "\
==== Orders Details ====
Order ID: 9
Order Time: 2024-05-01T12:30
Order Status: WAITING
Menu Items:
Rice-10.0
Soup-20.0-2
========================
";
        let orders = parse_orders(text).unwrap();
        assert_eq!(orders[0].items().len(), 1);
        assert_eq!(orders[0].total_price(), 40.0);
    }

    #[test]
    fn malformed_fields_fail_the_parse() {
        let bad_id = "==== Orders Details ====\nOrder ID: 12ab\n";
        assert!(matches!(
            parse_orders(bad_id),
            Err(PersistenceError::Malformed { line: 2, .. })
        ));

        let bad_status = "==== Orders Details ====\nOrder ID: 1\nOrder Status: DONE\n";
        assert!(parse_orders(bad_status).is_err());

        let bad_price = "==== Orders Details ====\nOrder ID: 1\nMenu Items:\nRice-ten-1\n";
        assert!(parse_orders(bad_price).is_err());

        let overflowing = "\
==== Orders Details ====
Order ID: 1
Order Time: 2024-05-01T12:30
Order Status: WAITING
Menu Items:
Rice-10.0-4294967295
Rice-10.0-2
========================
";
        assert!(matches!(
            parse_orders(overflowing),
            Err(PersistenceError::Malformed { line: 7, .. })
        ));
    }

    #[test]
    fn absurd_prices_load_and_total_without_panicking() {
        let text = "\
==== Orders Details ====
Order ID: 3
Order Time: 2024-05-01T12:30
Order Status: COMPLETED
Menu Items:
Rice-100000000000000000.0-2
Soup-5.0-1
========================
";
        let orders = parse_orders(text).unwrap();
        assert_eq!(orders[0].items()[0].quantity, 2);
        assert_eq!(orders[0].total(), Price::from_cents(u64::MAX));
        assert!(orders[0].total_price() > 0.0);
    }
}
