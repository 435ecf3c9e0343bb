//! Widening arithmetic for bonus shares.
//!
//! Bonus amounts and deposits arrive in raw token units, so with
//! 18-decimal tokens the share numerator `total_bonus * deposited` can
//! exceed `u128`. The share is therefore computed through a 256-bit
//! intermediate product, inline here rather than pulling in a big-integer
//! crate for one operation.

/// Floor of `a * b / divisor` with a 256-bit intermediate product.
///
/// Requires `divisor > 0` and `b <= divisor`, which guarantees the
/// quotient fits in `u128`; bonus callers uphold this because a single
/// depositor's weight is part of the total active weight.
pub(crate) fn mul_div(a: u128, b: u128, divisor: u128) -> u128 {
    debug_assert!(divisor > 0);
    debug_assert!(b <= divisor);
    let (hi, lo) = widening_mul(a, b);
    if hi == 0 {
        return lo / divisor;
    }
    // Restoring long division of the 256-bit product, one bit at a time.
    let mut quotient = 0u128;
    let mut remainder = 0u128;
    for i in (0..256).rev() {
        let bit = if i >= 128 {
            (hi >> (i - 128)) & 1
        } else {
            (lo >> i) & 1
        };
        // A carry out of the shift means the true remainder exceeds any
        // u128 divisor, so the subtraction below always applies and the
        // wrapping arithmetic lands back under the divisor.
        let carry = remainder >> 127;
        remainder = (remainder << 1) | bit;
        if carry != 0 || remainder >= divisor {
            remainder = remainder.wrapping_sub(divisor);
            if i < 128 {
                quotient |= 1 << i;
            }
        }
    }
    quotient
}

/// Full 256-bit product of two `u128` values as (high, low) halves.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1 << 64) - 1;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (mid << 64) | (ll & MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_match_plain_division() {
        assert_eq!(mul_div(10_000, 3_000, 8_000), 3_750);
        assert_eq!(mul_div(10_000, 5_000, 8_000), 6_250);
        assert_eq!(mul_div(7, 0, 3), 0);
    }

    #[test]
    fn test_product_beyond_u128() {
        // 1e22 * 1e21 overflows u128 by a wide margin.
        let bonus = 10u128.pow(22);
        let deposit = 10u128.pow(21);
        let weight = 4 * 10u128.pow(21);
        assert_eq!(mul_div(bonus, deposit, weight), 25 * 10u128.pow(20));
    }

    #[test]
    fn test_extreme_bounds() {
        assert_eq!(mul_div(u128::MAX, u128::MAX, u128::MAX), u128::MAX);
        assert_eq!(mul_div(u128::MAX, 1, u128::MAX), 1);
    }

    #[test]
    fn test_widening_mul_halves() {
        assert_eq!(widening_mul(u128::MAX, 1), (0, u128::MAX));
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1.
        assert_eq!(widening_mul(u128::MAX, u128::MAX), (u128::MAX - 1, 1));
    }
}
