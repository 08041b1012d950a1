//! Overflow-safe arithmetic primitives for the integer tower.
//!
//! Wide (64-bit) addition, subtraction and multiplication compute the naive
//! result first and promote to arbitrary precision only when the result
//! cannot be represented. For `+` and `-` overflow is detected afterwards by
//! sign-bit analysis and the wrapped value corrected by 2^64; for `*` a
//! leading-zeros pre-check decides whether the product can overflow at all.
//! The common in-range case therefore never touches a big integer.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::value::Value;

const BIT63: u64 = 0x8000_0000_0000_0000;
const HIGH32: u64 = 0xFFFF_FFFF_0000_0000;

fn big_2_64() -> BigInt {
    BigInt::from(1u8) << 64u32
}

/// Re-narrow a 64-bit result to the narrow kind when it fits in 32 bits.
#[inline]
pub fn narrow_result(r: i64) -> Value {
    // 0b0...0_0rrr -> positive narrow, 0b1...1_1rrr -> negative narrow
    if (r as u64).wrapping_add(0x8000_0000) & HIGH32 == 0 {
        Value::Int(r as i32)
    } else {
        Value::Wide(r)
    }
}

pub fn wide_add(v: i64, w: i64) -> Value {
    let r = v.wrapping_add(w);
    if (v ^ w) as u64 & BIT63 != 0 {
        // Signs were opposite: result must be in range
        Value::Wide(r)
    } else if (v ^ r) as u64 & BIT63 == 0 {
        // Sign of result is the sign of (both) operands
        Value::Wide(r)
    } else if r as u64 & BIT63 != 0 {
        // r wrapped negative: low by 2^64
        Value::big(BigInt::from(r) + big_2_64())
    } else {
        // r wrapped positive: high by 2^64
        Value::big(BigInt::from(r) - big_2_64())
    }
}

pub fn wide_sub(v: i64, w: i64) -> Value {
    let r = v.wrapping_sub(w);
    if (v ^ w) as u64 & BIT63 == 0 {
        // Signs were the same: result must be in range
        Value::Wide(r)
    } else if (v ^ r) as u64 & BIT63 == 0 {
        // Sign of result is the sign of the first operand
        Value::Wide(r)
    } else if r as u64 & BIT63 != 0 {
        Value::big(BigInt::from(r) + big_2_64())
    } else {
        Value::big(BigInt::from(r) - big_2_64())
    }
}

pub fn wide_mul(v: i64, w: i64) -> Value {
    if v == 0 || w == 0 {
        return Value::Wide(0);
    }
    // |v| <= 2^(64-zv), even for i64::MIN
    let zv = (v.unsigned_abs() - 1).leading_zeros();
    let zw = (w.unsigned_abs() - 1).leading_zeros();
    if zv + zw >= 65 {
        // |v||w| <= 2^(128-(zv+zw)) <= 2^63. The checked multiply only
        // rejects the exact +2^63 boundary product.
        if let Some(r) = v.checked_mul(w) {
            return Value::Wide(r);
        }
    }
    Value::big(BigInt::from(v) * BigInt::from(w))
}

pub fn wide_neg(v: i64) -> Value {
    if v == i64::MIN {
        Value::big(-BigInt::from(v))
    } else {
        Value::Wide(-v)
    }
}

/// Narrow negation, re-narrowing the widened result.
pub fn int_neg(v: i32) -> Value {
    narrow_result(-(v as i64))
}

/// Lossy conversion of a big integer to float. Values beyond the float
/// range become signed infinity.
pub fn big_to_f64(n: &BigInt) -> f64 {
    n.to_f64().unwrap_or(if n.is_negative() {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    })
}
