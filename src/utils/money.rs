// Utilitários para manipulação de valores monetários

/// Converts a decimal currency amount into integer cents.
///
/// Rounds half away from zero (`f64::round`), applied exactly once at the
/// gateway boundary. Amounts already in cents must never pass through here
/// again.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Converts integer cents back into a decimal currency amount.
pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}
