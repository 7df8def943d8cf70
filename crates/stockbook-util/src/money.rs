//! Monetary values

use rust_decimal::Decimal;

/// Monetary amount, kept as an exact decimal.
pub type Money = Decimal;

/// Number of decimal places money is rendered and persisted with.
pub const MONEY_SCALE: u32 = 2;

/// Value of `quantity` units at `unit_value` each, or `None` when the
/// product does not fit in a `Money`.
pub fn line_total(quantity: u32, unit_value: Money) -> Option<Money> {
    Decimal::from(quantity)
        .checked_mul(unit_value)
        .map(round_money)
}

/// Sum of amounts, or `None` on overflow.
pub fn checked_sum(values: impl IntoIterator<Item = Money>) -> Option<Money> {
    values
        .into_iter()
        .try_fold(Money::ZERO, |acc, value| acc.checked_add(value))
        .map(round_money)
}

/// Round to the persisted scale, keeping trailing zeros (`25` becomes `25.00`).
pub fn round_money(value: Money) -> Money {
    let mut rounded = value.round_dp(MONEY_SCALE);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Format an amount with a currency symbol, e.g. `R$ 7.50`.
pub fn format_money(symbol: &str, value: Money) -> String {
    format!("{} {}", symbol, round_money(value))
}
