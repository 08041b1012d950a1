//! String operations: concatenation and repetition.
//!
//! A non-numeric handler; exercises the reflected dispatch path whenever a
//! string meets an integer (`3 * "ab"` resolves through this handler's
//! reflected row, not through the integer handler).

use std::rc::Rc;

use krait_core::{Repr, Value};

use super::{BinOp, KindPat, OpsHandler};

const STR: KindPat = KindPat::Is(Repr::Str);
const INT: KindPat = KindPat::Is(Repr::Int);
const WIDE: KindPat = KindPat::Is(Repr::Wide);

fn concat(v: &Value, w: &Value) -> Option<Value> {
    match (v, w) {
        (Value::Str(a), Value::Str(b)) => {
            let mut out = String::with_capacity(a.len() + b.len());
            out.push_str(a);
            out.push_str(b);
            Some(Value::str(&out))
        }
        _ => None,
    }
}

fn repeat_by(s: &str, n: i64) -> Value {
    if n <= 0 {
        return Value::str("");
    }
    Value::str(&s.repeat(n as usize))
}

fn repeat(v: &Value, w: &Value) -> Option<Value> {
    match (v, w) {
        (Value::Str(s), n) => Some(repeat_by(s, n.as_wide()?)),
        (n, Value::Str(s)) => Some(repeat_by(s, n.as_wide()?)),
        _ => None,
    }
}

pub(crate) fn str_handler() -> Rc<OpsHandler> {
    OpsHandler::builder("str")
        .binary(BinOp::Add, STR, STR, concat)
        .binary(BinOp::Mul, STR, INT, repeat)
        .binary(BinOp::Mul, STR, WIDE, repeat)
        .binary(BinOp::Mul, INT, STR, repeat)
        .binary(BinOp::Mul, WIDE, STR, repeat)
        .build()
}
