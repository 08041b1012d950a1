//! Numeric tower behavior, exercised through operator dispatch and checked
//! against arbitrary-precision reference arithmetic.

use std::rc::Rc;

use num_bigint::BigInt;
use proptest::prelude::*;

use krait_core::num;
use krait_runtime::{BinOp, BinOpCell, OpsRegistry, UnaryOp, UnaryOpCell, Value};

fn eval(reg: &OpsRegistry, op: BinOp, v: Value, w: Value) -> Value {
    let cell = BinOpCell::new(op);
    cell.call(reg, &v, &w).expect("dispatch succeeds")
}

fn big(n: BigInt) -> Value {
    Value::Big(Rc::new(n))
}

#[test]
fn division_always_widens() {
    let reg = OpsRegistry::new();
    assert_eq!(
        eval(&reg, BinOp::Div, Value::Int(7), Value::Int(2)),
        Value::Float(3.5)
    );
    assert_eq!(
        eval(&reg, BinOp::Div, Value::Int(4), Value::Int(2)),
        Value::Float(2.0)
    );
    assert_eq!(
        eval(&reg, BinOp::Div, Value::Wide(1 << 40), Value::Int(2)),
        Value::Float((1u64 << 39) as f64)
    );
    assert_eq!(
        eval(&reg, BinOp::Div, big(BigInt::from(10)), Value::Int(4)),
        Value::Float(2.5)
    );
}

#[test]
fn division_by_zero_is_a_float_infinity() {
    let reg = OpsRegistry::new();
    assert_eq!(
        eval(&reg, BinOp::Div, Value::Int(7), Value::Int(0)),
        Value::Float(f64::INFINITY)
    );
}

#[test]
fn wide_overflow_promotes() {
    let reg = OpsRegistry::new();
    // The canonical example: MAX + 1 is the value one past MAX, not a
    // wrapped negative.
    assert_eq!(
        eval(&reg, BinOp::Add, Value::Wide(i64::MAX), Value::Int(1)),
        big(BigInt::from(i64::MAX) + 1)
    );
    assert_eq!(
        eval(&reg, BinOp::Sub, Value::Wide(i64::MIN), Value::Int(1)),
        big(BigInt::from(i64::MIN) - 1)
    );
    assert_eq!(
        eval(&reg, BinOp::Mul, Value::Wide(i64::MAX), Value::Wide(i64::MAX)),
        big(BigInt::from(i64::MAX) * BigInt::from(i64::MAX))
    );
}

#[test]
fn narrow_results_renarrow_when_they_fit() {
    let reg = OpsRegistry::new();
    assert_eq!(
        eval(&reg, BinOp::Add, Value::Int(1), Value::Int(2)),
        Value::Int(3)
    );
    // 2^30 + 2^30 leaves the narrow range
    assert_eq!(
        eval(&reg, BinOp::Add, Value::Int(1 << 30), Value::Int(1 << 30)),
        Value::Wide(1 << 31)
    );
    assert_eq!(
        eval(&reg, BinOp::Mul, Value::Int(i32::MAX), Value::Int(i32::MAX)),
        Value::Wide(i32::MAX as i64 * i32::MAX as i64)
    );
}

#[test]
fn mixed_kinds_widen_the_narrower_operand() {
    let reg = OpsRegistry::new();
    assert_eq!(
        eval(&reg, BinOp::Add, Value::Int(1), Value::Wide(1 << 40)),
        Value::Wide((1 << 40) + 1)
    );
    assert_eq!(
        eval(&reg, BinOp::Add, Value::Wide(1 << 40), Value::Int(1)),
        Value::Wide((1 << 40) + 1)
    );
    assert_eq!(
        eval(&reg, BinOp::Mul, big(BigInt::from(1) << 80), Value::Int(2)),
        big(BigInt::from(1) << 81)
    );
    assert_eq!(
        eval(&reg, BinOp::Add, Value::Int(1), Value::Float(0.5)),
        Value::Float(1.5)
    );
    assert_eq!(
        eval(&reg, BinOp::Sub, Value::Float(1.5), Value::Wide(1)),
        Value::Float(0.5)
    );
}

#[test]
fn unary_negation_promotes_at_the_boundary() {
    let reg = OpsRegistry::new();
    let cell = UnaryOpCell::new(UnaryOp::Neg);
    assert_eq!(cell.call(&reg, &Value::Int(5)).unwrap(), Value::Int(-5));
    assert_eq!(
        cell.call(&reg, &Value::Wide(i64::MIN)).unwrap(),
        big(-BigInt::from(i64::MIN))
    );
    assert_eq!(
        cell.call(&reg, &Value::Float(2.5)).unwrap(),
        Value::Float(-2.5)
    );
}

/// The tower result as a big integer, plus whether it stayed wide.
fn as_bigint(v: &Value) -> (BigInt, bool) {
    match v {
        Value::Int(i) => (BigInt::from(*i), true),
        Value::Wide(i) => (BigInt::from(*i), true),
        Value::Big(n) => ((**n).clone(), false),
        other => panic!("unexpected result kind: {other:?}"),
    }
}

fn in_wide_range(n: &BigInt) -> bool {
    *n >= BigInt::from(i64::MIN) && *n <= BigInt::from(i64::MAX)
}

proptest! {
    #[test]
    fn wide_add_matches_reference(a in any::<i64>(), b in any::<i64>()) {
        let expected = BigInt::from(a) + BigInt::from(b);
        let (got, stayed_wide) = as_bigint(&num::wide_add(a, b));
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(stayed_wide, in_wide_range(&expected));
    }

    #[test]
    fn wide_sub_matches_reference(a in any::<i64>(), b in any::<i64>()) {
        let expected = BigInt::from(a) - BigInt::from(b);
        let (got, stayed_wide) = as_bigint(&num::wide_sub(a, b));
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(stayed_wide, in_wide_range(&expected));
    }

    #[test]
    fn wide_mul_matches_reference(a in any::<i64>(), b in any::<i64>()) {
        let expected = BigInt::from(a) * BigInt::from(b);
        let (got, stayed_wide) = as_bigint(&num::wide_mul(a, b));
        prop_assert_eq!(&got, &expected);
        // The leading-zeros pre-check may promote a product that would
        // have fit, but must never keep one that does not fit.
        if stayed_wide {
            prop_assert!(in_wide_range(&expected));
        }
    }

    #[test]
    fn narrow_result_is_exact(r in any::<i64>()) {
        let v = num::narrow_result(r);
        match v {
            Value::Int(i) => prop_assert_eq!(i as i64, r),
            Value::Wide(i) => {
                prop_assert_eq!(i, r);
                prop_assert!(r < i32::MIN as i64 || r > i32::MAX as i64);
            }
            other => prop_assert!(false, "unexpected kind: {:?}", other),
        }
    }
}
