//! Price type for course prices.
//!
//! Prices are whole Vietnamese dong, the smallest unit the catalog uses, so
//! an unsigned integer represents them exactly.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A listed course price in VND.
///
/// Serialized as a bare integer. Deserialization also accepts fractional
/// amounts, rounded to the nearest dong, and clamps negative ones to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Create a price from an amount in dong.
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// A zero price (free course).
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Amount in dong.
    pub fn amount(&self) -> u64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Apply a percentage discount: `price * (1 - discount / 100)`.
    ///
    /// Percentages above 100 are treated as 100. The result is rounded to the
    /// nearest dong.
    pub fn effective(&self, discount_percent: Option<u8>) -> Price {
        let Some(discount) = discount_percent else {
            return *self;
        };
        let keep = 100 - u128::from(discount.min(100));
        let amount = (u128::from(self.0) * keep + 50) / 100;
        Price(amount as u64)
    }

    /// Format for display, e.g. `1.250.000 ₫`.
    pub fn display(&self) -> String {
        format!("{} \u{20ab}", self.display_amount())
    }

    /// Format the amount with `.` thousands separators and no symbol.
    pub fn display_amount(&self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = Price;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a price in dong")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Price(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Price(u64::try_from(value).unwrap_or(0)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if !value.is_finite() {
                    return Err(de::Error::custom(format!("invalid price: {}", value)));
                }
                // saturating cast
                Ok(Price(value.round().max(0.0) as u64))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_without_discount() {
        let p = Price::new(400_000);
        assert_eq!(p.effective(None), p);
        assert_eq!(p.effective(Some(0)), p);
    }

    #[test]
    fn test_effective_price_with_discount() {
        let p = Price::new(1_000_000);
        assert_eq!(p.effective(Some(25)).amount(), 750_000);
        assert_eq!(p.effective(Some(100)).amount(), 0);
        assert_eq!(p.effective(Some(150)).amount(), 0);
    }

    #[test]
    fn test_effective_price_rounds() {
        // 333 * 0.67 = 223.11
        assert_eq!(Price::new(333).effective(Some(33)).amount(), 223);
        // 5 * 0.5 = 2.5 rounds up
        assert_eq!(Price::new(5).effective(Some(50)).amount(), 3);
    }

    #[test]
    fn test_deserialize_lenient_amounts() {
        let parse = |json: &str| serde_json::from_str::<Price>(json).unwrap().amount();
        assert_eq!(parse("499000"), 499_000);
        assert_eq!(parse("499000.5"), 499_001);
        assert_eq!(parse("499000.4"), 499_000);
        assert_eq!(parse("-5"), 0);
        assert_eq!(parse("-0.7"), 0);
        assert!(serde_json::from_str::<Price>("\"free\"").is_err());

        assert_eq!(serde_json::to_string(&Price::new(499_001)).unwrap(), "499001");
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(0).display(), "0 \u{20ab}");
        assert_eq!(Price::new(999).display_amount(), "999");
        assert_eq!(Price::new(1_000).display_amount(), "1.000");
        assert_eq!(Price::new(499_000).display_amount(), "499.000");
        assert_eq!(Price::new(1_250_000).display(), "1.250.000 \u{20ab}");
    }
}
