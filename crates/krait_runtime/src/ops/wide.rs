//! Operations making the wide integer representation an `int`.
//!
//! The generic rows widen an accompanying narrow integer first, so any
//! (narrow, wide) pair resolves here. Overflowing results promote to the
//! arbitrary-precision kind (see `krait_core::num`).

use std::rc::Rc;

use krait_core::num;
use krait_core::{Repr, Value};

use super::{BinOp, KindPat, OpsHandler, UnaryOp};

const WIDE: KindPat = KindPat::Is(Repr::Wide);
const ANY: KindPat = KindPat::General;

fn accepts(r: Repr) -> bool {
    matches!(r, Repr::Int | Repr::Wide)
}

fn pair(v: &Value, w: &Value) -> Option<(i64, i64)> {
    Some((v.as_wide()?, w.as_wide()?))
}

fn add(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(num::wide_add(a, b))
}

fn sub(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(num::wide_sub(a, b))
}

fn mul(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(num::wide_mul(a, b))
}

fn div(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(Value::Float(a as f64 / b as f64))
}

fn neg(v: &Value) -> Option<Value> {
    match v {
        Value::Wide(a) => Some(num::wide_neg(*a)),
        _ => None,
    }
}

fn pos(v: &Value) -> Option<Value> {
    match v {
        Value::Wide(_) => Some(v.clone()),
        _ => None,
    }
}

pub(crate) fn wide_handler() -> Rc<OpsHandler> {
    OpsHandler::builder("long")
        .accepts(accepts)
        .binary(BinOp::Add, WIDE, WIDE, add)
        .binary(BinOp::Sub, WIDE, WIDE, sub)
        .binary(BinOp::Mul, WIDE, WIDE, mul)
        .binary(BinOp::Add, WIDE, ANY, add)
        .binary(BinOp::Sub, WIDE, ANY, sub)
        .binary(BinOp::Mul, WIDE, ANY, mul)
        .binary(BinOp::Add, ANY, WIDE, add)
        .binary(BinOp::Sub, ANY, WIDE, sub)
        .binary(BinOp::Mul, ANY, WIDE, mul)
        .binary(BinOp::Div, ANY, ANY, div)
        .unary(UnaryOp::Neg, WIDE, neg)
        .unary(UnaryOp::Pos, WIDE, pos)
        .build()
}
