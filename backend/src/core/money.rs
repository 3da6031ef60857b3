//! Integer money arithmetic
//!
//! Balances are i64 currency units. Rates are percentages held as f64 and
//! applied with truncation, so every derived amount is a whole unit and the
//! ledger stays exactly balanced.

/// Apply a percentage rate to an amount
///
/// Non-positive amounts or rates yield 0.
///
/// # Example
/// ```
/// use econ_sim_core::core::money::percent_of;
///
/// assert_eq!(percent_of(100, 10.0), 10);
/// assert_eq!(percent_of(100, 60.0), 60);
/// assert_eq!(percent_of(99, 10.0), 9); // truncated
/// ```
pub fn percent_of(amount: i64, rate_pct: f64) -> i64 {
    if amount <= 0 || rate_pct <= 0.0 {
        return 0;
    }
    ((amount as f64) * rate_pct / 100.0).floor() as i64
}

/// Tax contained in a tax-inclusive gross amount
///
/// `gross` is understood as receipts including tax at `rate_pct`, so the tax
/// share is `gross * r / (r + 1)` with `r` the rate as a fraction.
///
/// # Example
/// ```
/// use econ_sim_core::core::money::tax_inclusive_share;
///
/// // 110 gross at 10% contains 10 of tax
/// assert_eq!(tax_inclusive_share(110, 10.0), 10);
/// assert_eq!(tax_inclusive_share(110, 0.0), 0);
/// ```
pub fn tax_inclusive_share(gross: i64, rate_pct: f64) -> i64 {
    if gross <= 0 || rate_pct <= 0.0 {
        return 0;
    }
    let r = rate_pct / 100.0;
    // Nudge before flooring so exact quotients like 110 * 0.1 / 1.1 do not
    // land a hair under the integer.
    ((gross as f64) * r / (r + 1.0) + 1e-9).floor() as i64
}
