use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A non-negative amount of money held as whole cents.
///
/// Keeping cents as an integer makes menu item equality exact and keeps totals
/// free of float drift until they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(u64);

impl Price {
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Price of `quantity` units, clamped at the largest representable amount.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

/// Totals clamp instead of overflowing, so a loaded roster can always be summed.
impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::saturating_add)
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Self((value * 100.0).round().max(0.0) as u64)
    }
}

/// Renders one decimal when the price is a multiple of ten cents (`12.5`),
/// two decimals otherwise (`12.25`).
impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / 100;
        let cents = self.0 % 100;
        if cents % 10 == 0 {
            write!(f, "{}.{}", whole, cents / 10)
        } else {
            write!(f, "{}.{:02}", whole, cents)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price: {0:?}")]
pub struct PriceParseError(pub String);

/// Accepts `12`, `12.5` and `12.25`. Anything with more than two decimals,
/// a sign, or no digits is rejected.
impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PriceParseError(s.to_string());
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) || fraction.len() > 2 {
            return Err(err());
        }
        if s.contains('.') && fraction.is_empty() {
            return Err(err());
        }

        let whole: u64 = whole.parse().map_err(|_| err())?;
        let cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| err())? * 10,
            _ => fraction.parse::<u64>().map_err(|_| err())?,
        };
        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Price)
            .ok_or_else(err)
    }
}

/// A dish on the menu.
///
/// Two items are the same item when name and price match; the description is
/// informational only and is not persisted.
#[derive(Debug, Clone)]
pub struct MenuItem {
    name: String,
    price: Price,
    description: Option<String>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for MenuItem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.price == other.price
    }
}

impl Eq for MenuItem {}

impl Hash for MenuItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.price.hash(state);
    }
}

impl Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_display_keeps_needed_precision() {
        assert_eq!(Price::from(50.0).to_string(), "50.0");
        assert_eq!(Price::from(12.5).to_string(), "12.5");
        assert_eq!(Price::from(12.25).to_string(), "12.25");
        assert_eq!(Price::from(0.05).to_string(), "0.05");
    }

    #[test]
    fn price_parse_accepts_up_to_two_decimals() {
        assert_eq!("12".parse::<Price>().unwrap(), Price::from_cents(1200));
        assert_eq!("12.5".parse::<Price>().unwrap(), Price::from_cents(1250));
        assert_eq!("12.25".parse::<Price>().unwrap(), Price::from_cents(1225));
        assert!("12.255".parse::<Price>().is_err());
        assert!("-1.0".parse::<Price>().is_err());
        assert!("12.".parse::<Price>().is_err());
        assert!(".5".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn equality_ignores_description() {
        let plain = MenuItem::new("Ramen", 180.0);
        let described = MenuItem::new("Ramen", 180.0).with_description("tonkotsu");
        let pricier = MenuItem::new("Ramen", 190.0);
        assert_eq!(plain, described);
        assert_ne!(plain, pricier);
        assert_eq!(described.description(), Some("tonkotsu"));
    }

    #[test]
    fn price_sum_saturates() {
        let prices = [Price::from_cents(u64::MAX - 1), Price::from_cents(5), Price::from(1.0)];
        assert_eq!(prices.into_iter().sum::<Price>(), Price::from_cents(u64::MAX));
        assert_eq!(Price::from(2.5).times(4), Price::from_cents(1000));
    }
}
