pub mod db;
pub mod prom_metrics;
pub mod quote;
pub mod rates;
pub mod server;

/// Round a monetary amount to 2 decimal places.
///
/// Engines keep full-precision `f64` totals internally; rounding happens only
/// at presentation boundaries (HTTP responses, CLI output) so that markup and
/// risk tiers are computed from the exact raw total rather than a truncated one.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_money_two_decimals() {
        assert_eq!(round_money(1234.5678), 1234.57);
        assert_eq!(round_money(0.0), 0.0);
        assert_eq!(round_money(99.999), 100.0);
        assert_eq!(round_money(0.125), 0.13);
    }

    #[test]
    fn round_money_negative_amounts() {
        // Not expected in practice (breakdowns are non-negative) but must not panic
        assert_eq!(round_money(-2.567), -2.57);
    }

    #[test]
    fn round_money_idempotent() {
        let once = round_money(17.3333333);
        assert_eq!(round_money(once), once);
    }
}
