//! Whole-dollar price representation.
//!
//! Catalog prices carry no minor units, so an unsigned integer is enough and
//! keeps comparisons in the sort engine exact.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A price in whole US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// A zero price, used for free shipping and tax lines.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole-dollar amount.
    #[must_use]
    pub const fn new(dollars: u32) -> Self {
        Self(dollars)
    }

    /// Get the amount in whole dollars.
    #[must_use]
    pub const fn dollars(&self) -> u32 {
        self.0
    }

    /// Difference between two prices, clamped at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Format for display with thousands separators (e.g., "$6,999").
    #[must_use]
    pub fn display(&self) -> String {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        grouped.push('$');
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        grouped
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
