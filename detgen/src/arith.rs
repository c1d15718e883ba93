//! Integer division with balanced remainders and GCDs.

use num_integer::Integer;

/// Computes `(q, r)` such that `n = d * q + r` and `|r|` is as small as
/// possible, i.e. `2 * |r| <= |d|`.
///
/// Starting from floor division (where the remainder has the sign of `d`),
/// the remainder is shifted by `d` once it exceeds half of `d` in the
/// direction of `d`'s sign. If `2 * |r| == |d|` the remainder keeps the sign
/// of `d`.
///
/// Panics if `d` is zero.
pub fn balanced_divmod(n: i64, d: i64) -> (i64, i64) {
    assert_ne!(d, 0, "Division by zero.");
    let (mut q, mut r) = Integer::div_mod_floor(&n, &d);
    if (d > 0 && 2 * r > d) || (d < 0 && 2 * r < d) {
        r -= d;
        q += 1;
    }
    (q, r)
}

/// The greatest common divisor of all the values, which is always
/// nonnegative. The pairs are reduced from the right to the left.
/// The GCD of no values (or only zeros) is 0.
pub fn gcd(values: &[i64]) -> i64 {
    values.iter().rev().fold(0, |acc, v| Integer::gcd(&acc, v))
}

/// `floor(n / d)`.
pub fn div_floor<T: Integer>(n: T, d: T) -> T {
    Integer::div_floor(&n, &d)
}

/// `ceil(n / d)`.
pub fn div_ceil<T: Integer>(n: T, d: T) -> T {
    Integer::div_ceil(&n, &d)
}
