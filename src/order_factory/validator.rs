//! Input predicates for order entry.
//!
//! Each check takes the raw text a caller typed and answers yes or no. None of
//! them trim, parse or log.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static QUANTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]?$").expect("quantity pattern compiles"));
static ORDER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{17}$").expect("order id pattern compiles"));
static PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("price pattern compiles"));

/// A whole number from 1 to 99 with no leading zero.
pub fn is_valid_quantity(quantity: &str) -> bool {
    QUANTITY.is_match(quantity)
}

/// Exactly 17 decimal digits.
pub fn is_valid_order_id(order_id: &str) -> bool {
    ORDER_ID.is_match(order_id)
}

/// A non-negative amount with at most two decimals.
pub fn is_valid_price(price: &str) -> bool {
    PRICE.is_match(price)
}
