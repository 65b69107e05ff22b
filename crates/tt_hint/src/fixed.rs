//! 26.6 fixed-point helpers: the low 6 bits of an `i32` are the fraction.

pub const ONE: i32 = 1 << 6;

/// Product of two 26.6 values, computed in 64 bits and rescaled.
pub fn mul(a: i32, b: i32) -> i32 {
    ((a as i64 * b as i64) >> 6) as i32
}

/// Quotient of two 26.6 values. `None` when `b` is zero.
pub fn div(a: i32, b: i32) -> Option<i32> {
    if b == 0 {
        return None;
    }
    Some((((a as i64) << 6) / b as i64) as i32)
}

/// Largest multiple of 64 not above `x`.
pub fn floor(x: i32) -> i32 {
    x & !63
}

/// Smallest multiple of 64 not below `x`.
pub fn ceiling(x: i32) -> i32 {
    x.wrapping_add(63) & !63
}
