//! Cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dokan_core::ProductId;

/// One distinct (product, color, size) entry in the cart.
///
/// The unit price is a snapshot taken when the item was added; it is not
/// re-priced from the catalogue afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartItem {
    /// Whether `other` is the same line: product, color and size all equal.
    ///
    /// Used when merging on add. Removal uses [`CartItem::matches_filter`].
    #[must_use]
    pub fn same_line(&self, other: &Self) -> bool {
        self.product_id == other.product_id && self.color == other.color && self.size == other.size
    }

    /// Whether this line matches a removal/update filter.
    ///
    /// An absent `color` or `size` in the filter matches any value, including
    /// lines with no color or size at all.
    #[must_use]
    pub fn matches_filter(
        &self,
        product_id: &ProductId,
        color: Option<&str>,
        size: Option<&str>,
    ) -> bool {
        &self.product_id == product_id
            && color.is_none_or(|c| self.color.as_deref() == Some(c))
            && size.is_none_or(|s| self.size.as_deref() == Some(s))
    }

    /// Unit price times quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Unit price times quantity, or `None` if it does not fit a `Decimal`.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}
