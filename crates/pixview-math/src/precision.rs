//! Fixed-precision helpers.

/// Rounds `value` to `decimals` places.
///
/// ```rust
/// use pixview_math::round_to;
///
/// assert_eq!(round_to(1.23456789, 4), 1.2346);
/// assert_eq!(round_to(0.1 * 3.0, 6), 0.3);
/// ```
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `true` if `a` and `b` differ by at most `epsilon`.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(1.0 / 3.0, 3), 0.333);
        assert_eq!(round_to(1.1 * (1.0 / 1.1), 6), 1.0);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-10, 1e-9));
        assert!(!approx_eq(1.0, 1.1, 1e-3));
    }
}
