//! Operations making the arbitrary-precision representation an `int`.
//!
//! Results stay arbitrary-precision; nothing narrows back down. Division
//! is float true division like every other integer kind.

use std::rc::Rc;

use num_bigint::BigInt;

use krait_core::{Repr, Value};

use super::{BinOp, KindPat, OpsHandler, UnaryOp};

const BIG: KindPat = KindPat::Is(Repr::Big);
const ANY: KindPat = KindPat::General;

fn accepts(r: Repr) -> bool {
    matches!(r, Repr::Int | Repr::Wide | Repr::Big)
}

fn widen(v: &Value) -> Option<BigInt> {
    match v {
        Value::Big(n) => Some((**n).clone()),
        _ => v.as_wide().map(BigInt::from),
    }
}

fn add(v: &Value, w: &Value) -> Option<Value> {
    Some(Value::big(widen(v)? + widen(w)?))
}

fn sub(v: &Value, w: &Value) -> Option<Value> {
    Some(Value::big(widen(v)? - widen(w)?))
}

fn mul(v: &Value, w: &Value) -> Option<Value> {
    Some(Value::big(widen(v)? * widen(w)?))
}

fn div(v: &Value, w: &Value) -> Option<Value> {
    Some(Value::Float(v.to_float()? / w.to_float()?))
}

fn neg(v: &Value) -> Option<Value> {
    match v {
        Value::Big(n) => Some(Value::big(-(**n).clone())),
        _ => None,
    }
}

fn pos(v: &Value) -> Option<Value> {
    match v {
        Value::Big(_) => Some(v.clone()),
        _ => None,
    }
}

pub(crate) fn big_handler() -> Rc<OpsHandler> {
    OpsHandler::builder("bigint")
        .accepts(accepts)
        .binary(BinOp::Add, BIG, BIG, add)
        .binary(BinOp::Sub, BIG, BIG, sub)
        .binary(BinOp::Mul, BIG, BIG, mul)
        .binary(BinOp::Add, BIG, ANY, add)
        .binary(BinOp::Sub, BIG, ANY, sub)
        .binary(BinOp::Mul, BIG, ANY, mul)
        .binary(BinOp::Add, ANY, BIG, add)
        .binary(BinOp::Sub, ANY, BIG, sub)
        .binary(BinOp::Mul, ANY, BIG, mul)
        .binary(BinOp::Div, ANY, ANY, div)
        .unary(UnaryOp::Neg, BIG, neg)
        .unary(UnaryOp::Pos, BIG, pos)
        .build()
}
