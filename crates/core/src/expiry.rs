//! Accepted range for token lifetimes.

/// Longest lifetime a token may be issued with: one hundred years.
pub const MAX_TOKEN_EXPIRY_HOURS: f64 = 876_600.0;

/// True for a finite lifetime in `(0, MAX_TOKEN_EXPIRY_HOURS]`.
pub fn is_valid_expiry_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0 && hours <= MAX_TOKEN_EXPIRY_HOURS
}
