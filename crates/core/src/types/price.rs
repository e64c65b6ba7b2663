//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's display unit (whole tomans, not rials).
    pub amount: Decimal,
    /// Currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in tomans, the unit the storefront displays.
    #[must_use]
    pub const fn toman(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::IRT)
    }

    /// Format for display with thousands separators, e.g. `1,250,000 تومان`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.amount.round_dp(0);
        let digits = rounded.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{grouped} {}", self.currency_code.label())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Currency codes used by the store.
///
/// `IRT` is the informal code for the toman (10 rials).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    IRT,
    IRR,
}

impl CurrencyCode {
    /// Persian display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IRT => "تومان",
            Self::IRR => "ریال",
        }
    }
}
