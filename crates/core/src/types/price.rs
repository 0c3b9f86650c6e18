//! Money formatting for the store's single currency.
//!
//! Amounts are plain [`Decimal`] values in reais. Arithmetic stays exact;
//! rounding only happens when an amount is rendered for display.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes the store can price in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
}

impl CurrencyCode {
    /// Symbol printed before an amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BRL => "BRL",
        }
    }
}

/// Format an amount for display (e.g., `R$ 15.00`).
///
/// Half-cent values round away from zero. Negative amounts keep their sign
/// after the symbol (`R$ -5.00`).
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{} {:.2}", CurrencyCode::default().symbol(), rounded)
}
