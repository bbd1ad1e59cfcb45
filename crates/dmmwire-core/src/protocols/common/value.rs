use crate::protocols::profile::ProtocolProfile;

/// Fold decimal digits (leading digit first) onto `prefix`.
pub(crate) fn fold_digits(prefix: u64, digits: impl IntoIterator<Item = u8>) -> u64 {
    digits
        .into_iter()
        .fold(prefix, |acc, digit| acc * 10 + u64::from(digit))
}

/// Scale `mantissa` by `10^exponent`.
///
/// Negative exponents divide, so a displayed `12.34` lands on the nearest
/// `f64` instead of accumulating the error of `10^-2`.
pub(crate) fn apply_exponent(mantissa: f64, exponent: i32) -> f64 {
    if exponent < 0 {
        mantissa / 10f64.powi(-exponent)
    } else {
        mantissa * 10f64.powi(exponent)
    }
}

/// Display precision for a combined exponent, bounded by the profile.
pub(crate) fn display_digits(exponent: i32, profile: &ProtocolProfile) -> i32 {
    (-exponent).clamp(profile.min_digits, profile.max_digits)
}
