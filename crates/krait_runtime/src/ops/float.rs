//! Operations making the float representation a `float`.
//!
//! Any integer kind mixed with a float converts to float first. The
//! conversion is lossy for magnitudes beyond 2^53; big integers outside
//! the float range become infinities.

use std::rc::Rc;

use krait_core::{Repr, Value};

use super::{BinOp, KindPat, OpsHandler, UnaryOp};

const FLOAT: KindPat = KindPat::Is(Repr::Float);
const ANY: KindPat = KindPat::General;

fn accepts(r: Repr) -> bool {
    matches!(r, Repr::Int | Repr::Wide | Repr::Big | Repr::Float)
}

fn pair(v: &Value, w: &Value) -> Option<(f64, f64)> {
    Some((v.to_float()?, w.to_float()?))
}

fn add(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(Value::Float(a + b))
}

fn sub(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(Value::Float(a - b))
}

fn mul(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(Value::Float(a * b))
}

fn div(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(Value::Float(a / b))
}

fn neg(v: &Value) -> Option<Value> {
    match v {
        Value::Float(a) => Some(Value::Float(-a)),
        _ => None,
    }
}

fn pos(v: &Value) -> Option<Value> {
    match v {
        Value::Float(_) => Some(v.clone()),
        _ => None,
    }
}

pub(crate) fn float_handler() -> Rc<OpsHandler> {
    OpsHandler::builder("float")
        .accepts(accepts)
        .binary(BinOp::Add, FLOAT, FLOAT, add)
        .binary(BinOp::Sub, FLOAT, FLOAT, sub)
        .binary(BinOp::Mul, FLOAT, FLOAT, mul)
        .binary(BinOp::Div, FLOAT, FLOAT, div)
        .binary(BinOp::Add, FLOAT, ANY, add)
        .binary(BinOp::Sub, FLOAT, ANY, sub)
        .binary(BinOp::Mul, FLOAT, ANY, mul)
        .binary(BinOp::Div, FLOAT, ANY, div)
        .binary(BinOp::Add, ANY, FLOAT, add)
        .binary(BinOp::Sub, ANY, FLOAT, sub)
        .binary(BinOp::Mul, ANY, FLOAT, mul)
        .binary(BinOp::Div, ANY, FLOAT, div)
        .unary(UnaryOp::Neg, FLOAT, neg)
        .unary(UnaryOp::Pos, FLOAT, pos)
        .build()
}
