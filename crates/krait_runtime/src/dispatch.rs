//! Per-call-site operator dispatch cells (inline caches).
//!
//! A cell belongs to one syntactic occurrence of an operator. The first
//! execution runs the full resolution procedure and caches the outcome
//! behind a guard over the operand representations; later executions with
//! the same representations run the cached implementation directly. A
//! guard miss re-resolves and swaps in a new specialization, so a cell
//! cycles freely through specializations as operand types vary.
//!
//! Replacement is swap-style: the specialization is an `Rc` snapshot taken
//! before execution, so a replacement never invalidates an execution
//! already in flight.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use krait_core::{Repr, Value};

use crate::errors::DispatchError;
use crate::ops::{BinFn, BinOp, UnaryFn, UnaryOp};
use crate::registry::OpsRegistry;

/// Resolved executable for one binary specialization.
#[derive(Clone, Copy)]
enum BinExec {
    Single(BinFn),
    /// Try the first; on "not applicable" fall through to the second.
    Chain(BinFn, BinFn),
}

impl BinExec {
    fn run(self, v: &Value, w: &Value) -> Option<Value> {
        match self {
            BinExec::Single(f) => f(v, w),
            BinExec::Chain(first, second) => first(v, w).or_else(|| second(v, w)),
        }
    }
}

struct BinSpec {
    lhs: Repr,
    rhs: Repr,
    exec: BinExec,
}

/// Dispatch cell for one binary operator occurrence.
pub struct BinOpCell {
    op: BinOp,
    spec: RefCell<Option<Rc<BinSpec>>>,
    fallback_count: Cell<u64>,
}

impl BinOpCell {
    pub fn new(op: BinOp) -> Self {
        Self {
            op,
            spec: RefCell::new(None),
            fallback_count: Cell::new(0),
        }
    }

    pub fn op(&self) -> BinOp {
        self.op
    }

    /// How many times this cell has run the slow resolution path. Stays at
    /// one for a monomorphic call site.
    pub fn fallback_count(&self) -> u64 {
        self.fallback_count.get()
    }

    pub fn call(
        &self,
        reg: &OpsRegistry,
        v: &Value,
        w: &Value,
    ) -> Result<Value, DispatchError> {
        if reg.config().ops_cache {
            let cached = self.spec.borrow().clone();
            if let Some(spec) = cached {
                if spec.lhs == v.repr() && spec.rhs == w.repr() {
                    return spec.exec.run(v, w).ok_or_else(|| self.failure(v, w));
                }
            }
        }
        self.fallback(reg, v, w)
    }

    fn fallback(&self, reg: &OpsRegistry, v: &Value, w: &Value) -> Result<Value, DispatchError> {
        self.fallback_count.set(self.fallback_count.get() + 1);
        let exec = match resolve_binary(reg, self.op, v.repr(), w.repr()) {
            Some(exec) => exec,
            None => return Err(self.failure(v, w)),
        };
        trace!(
            op = self.op.symbol(),
            lhs = v.type_name(),
            rhs = w.type_name(),
            "specializing operator cell"
        );
        if reg.config().ops_cache {
            let spec = Rc::new(BinSpec { lhs: v.repr(), rhs: w.repr(), exec });
            *self.spec.borrow_mut() = Some(spec);
        }
        exec.run(v, w).ok_or_else(|| self.failure(v, w))
    }

    fn failure(&self, v: &Value, w: &Value) -> DispatchError {
        debug!(
            op = self.op.symbol(),
            lhs = v.type_name(),
            rhs = w.type_name(),
            "binary dispatch failed"
        );
        DispatchError::Binary {
            symbol: self.op.symbol(),
            lhs: Rc::from(v.type_name()),
            rhs: Rc::from(w.type_name()),
        }
    }
}

struct UnarySpec {
    operand: Repr,
    exec: UnaryFn,
}

/// Dispatch cell for one unary operator occurrence.
pub struct UnaryOpCell {
    op: UnaryOp,
    spec: RefCell<Option<Rc<UnarySpec>>>,
    fallback_count: Cell<u64>,
}

impl UnaryOpCell {
    pub fn new(op: UnaryOp) -> Self {
        Self {
            op,
            spec: RefCell::new(None),
            fallback_count: Cell::new(0),
        }
    }

    pub fn op(&self) -> UnaryOp {
        self.op
    }

    pub fn fallback_count(&self) -> u64 {
        self.fallback_count.get()
    }

    pub fn call(&self, reg: &OpsRegistry, v: &Value) -> Result<Value, DispatchError> {
        if reg.config().ops_cache {
            let cached = self.spec.borrow().clone();
            if let Some(spec) = cached {
                if spec.operand == v.repr() {
                    return (spec.exec)(v).ok_or_else(|| self.failure(v));
                }
            }
        }
        self.fallback(reg, v)
    }

    fn fallback(&self, reg: &OpsRegistry, v: &Value) -> Result<Value, DispatchError> {
        self.fallback_count.set(self.fallback_count.get() + 1);
        let exec = match resolve_unary(reg, self.op, v.repr()) {
            Some(exec) => exec,
            None => return Err(self.failure(v)),
        };
        trace!(
            op = self.op.symbol(),
            operand = v.type_name(),
            "specializing operator cell"
        );
        if reg.config().ops_cache {
            *self.spec.borrow_mut() = Some(Rc::new(UnarySpec { operand: v.repr(), exec }));
        }
        exec(v).ok_or_else(|| self.failure(v))
    }

    fn failure(&self, v: &Value) -> DispatchError {
        debug!(
            op = self.op.symbol(),
            operand = v.type_name(),
            "unary dispatch failed"
        );
        DispatchError::Unary {
            symbol: self.op.symbol(),
            operand: Rc::from(v.type_name()),
        }
    }
}

/// One-shot binary evaluation, bypassing any cell.
pub fn eval_binary(
    reg: &OpsRegistry,
    op: BinOp,
    v: &Value,
    w: &Value,
) -> Result<Value, DispatchError> {
    let failure = || DispatchError::Binary {
        symbol: op.symbol(),
        lhs: Rc::from(v.type_name()),
        rhs: Rc::from(w.type_name()),
    };
    let exec = resolve_binary(reg, op, v.repr(), w.repr()).ok_or_else(failure)?;
    exec.run(v, w).ok_or_else(failure)
}

/// One-shot unary evaluation, bypassing any cell.
pub fn eval_unary(reg: &OpsRegistry, op: UnaryOp, v: &Value) -> Result<Value, DispatchError> {
    let failure = || DispatchError::Unary {
        symbol: op.symbol(),
        operand: Rc::from(v.type_name()),
    };
    let exec = resolve_unary(reg, op, v.repr()).ok_or_else(failure)?;
    exec(v).ok_or_else(failure)
}

/// The generic resolution procedure for `v OP w`.
///
/// Looks up the left operand's handler first, most specific signature
/// first. When the right operand's handler is a different object its
/// reflected lookup runs too, and the declared handler subtype relation
/// decides which candidate is tried first; the loser becomes the fallback
/// of a two-candidate chain.
fn resolve_binary(reg: &OpsRegistry, op: BinOp, vr: Repr, wr: Repr) -> Option<BinExec> {
    match (reg.handler(vr), reg.handler(wr)) {
        (None, None) => None,
        (Some(h), None) => h.find_binary(op, vr, wr).map(BinExec::Single),
        (None, Some(h)) => h.find_binary(op, vr, wr).map(BinExec::Single),
        (Some(hv), Some(hw)) => {
            let fv = hv.find_binary(op, vr, wr);
            if Rc::ptr_eq(hv, hw) {
                return fv.map(BinExec::Single);
            }
            let fw = hw.find_binary(op, vr, wr);
            match (fv, fw) {
                (None, None) => None,
                (Some(f), None) | (None, Some(f)) => Some(BinExec::Single(f)),
                (Some(a), Some(b)) => {
                    if std::ptr::fn_addr_eq(a, b) {
                        Some(BinExec::Single(b))
                    } else if hv.is_subtype_of(hw) {
                        Some(BinExec::Chain(b, a))
                    } else {
                        Some(BinExec::Chain(a, b))
                    }
                }
            }
        }
    }
}

fn resolve_unary(reg: &OpsRegistry, op: UnaryOp, vr: Repr) -> Option<UnaryFn> {
    reg.handler(vr).and_then(|h| h.find_unary(op, vr))
}
