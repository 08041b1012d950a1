//! Operations making the narrow integer representation an `int`.
//!
//! Arithmetic computes in 64 bits and re-narrows when the result fits;
//! mixed-kind pairs are not handled here, they resolve through the wider
//! operand's handler.

use std::rc::Rc;

use krait_core::num;
use krait_core::{Repr, Value};

use super::{BinOp, KindPat, OpsHandler, UnaryOp};

const INT: KindPat = KindPat::Is(Repr::Int);

fn pair(v: &Value, w: &Value) -> Option<(i64, i64)> {
    match (v, w) {
        (Value::Int(a), Value::Int(b)) => Some((*a as i64, *b as i64)),
        _ => None,
    }
}

fn add(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(num::narrow_result(a + b))
}

fn sub(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(num::narrow_result(a - b))
}

fn mul(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(num::narrow_result(a * b))
}

fn div(v: &Value, w: &Value) -> Option<Value> {
    let (a, b) = pair(v, w)?;
    Some(Value::Float(a as f64 / b as f64))
}

fn neg(v: &Value) -> Option<Value> {
    match v {
        Value::Int(a) => Some(num::int_neg(*a)),
        _ => None,
    }
}

fn pos(v: &Value) -> Option<Value> {
    match v {
        Value::Int(_) => Some(v.clone()),
        _ => None,
    }
}

pub(crate) fn int_handler() -> Rc<OpsHandler> {
    OpsHandler::builder("int")
        .binary(BinOp::Add, INT, INT, add)
        .binary(BinOp::Sub, INT, INT, sub)
        .binary(BinOp::Mul, INT, INT, mul)
        .binary(BinOp::Div, INT, INT, div)
        .unary(UnaryOp::Neg, INT, neg)
        .unary(UnaryOp::Pos, INT, pos)
        .build()
}
