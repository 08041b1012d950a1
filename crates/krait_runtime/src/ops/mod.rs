//! Operand handlers: per-representation bundles of operator implementations.
//!
//! A handler owns an insertion-ordered table from (operator, operand-kind
//! pattern) to a plain implementation function. A row's operand slot is
//! either one concrete representation or the handler's *general* operand
//! kind: the set of foreign representations its `accepts` predicate admits
//! and its generic rows widen. Lookup probes the most specific signature
//! first, then the general rows.
//!
//! Implementation functions return `None` for "not applicable". That is a
//! sentinel checked by ordinary control flow in the dispatch layer, never
//! an error: a binary resolution may chain two candidates and only fails
//! after both decline.

mod big;
mod float;
mod int;
mod string;
mod wide;

use std::rc::Rc;

use indexmap::IndexMap;

use krait_core::{Repr, Value};

pub(crate) use big::big_handler;
pub(crate) use float::float_handler;
pub(crate) use int::int_handler;
pub(crate) use string::str_handler;
pub(crate) use wide::wide_handler;

/// Binary operators carried by dispatch cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// True division: integer operands produce a float.
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Pos,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
        }
    }
}

/// A binary implementation; `None` means "not applicable to this pair".
pub type BinFn = fn(&Value, &Value) -> Option<Value>;

/// A unary implementation; `None` means "not applicable to this operand".
pub type UnaryFn = fn(&Value) -> Option<Value>;

/// One operand slot of a table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindPat {
    /// Exactly this representation.
    Is(Repr),
    /// Any representation the handler's `accepts` predicate admits.
    General,
}

/// The bundle of operator implementations for one runtime representation.
///
/// Handlers are built once at registry construction and shared read-only
/// thereafter.
pub struct OpsHandler {
    name: &'static str,
    /// Handler names this handler declares itself a subtype of. Used only
    /// to break dispatch ties between two distinct handlers; unrelated to
    /// the type registry's MRO.
    supertypes: &'static [&'static str],
    accepts: fn(Repr) -> bool,
    binary: IndexMap<(BinOp, KindPat, KindPat), BinFn>,
    unary: IndexMap<(UnaryOp, KindPat), UnaryFn>,
}

impl OpsHandler {
    pub fn builder(name: &'static str) -> OpsHandlerBuilder {
        OpsHandlerBuilder {
            name,
            supertypes: &[],
            accepts: |_| false,
            binary: IndexMap::new(),
            unary: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this handler is a declared subtype of `other`, for the
    /// purposes of choosing which operand's implementation is tried first.
    pub fn is_subtype_of(&self, other: &OpsHandler) -> bool {
        self.supertypes.contains(&other.name)
    }

    /// Find an implementation of `op` for operand representations
    /// `(v, w)`: exact signature first, then rows over the general operand
    /// kind where the foreign representation is acceptable.
    pub fn find_binary(&self, op: BinOp, v: Repr, w: Repr) -> Option<BinFn> {
        if let Some(f) = self.binary.get(&(op, KindPat::Is(v), KindPat::Is(w))) {
            return Some(*f);
        }
        let av = (self.accepts)(v);
        let aw = (self.accepts)(w);
        if aw {
            if let Some(f) = self.binary.get(&(op, KindPat::Is(v), KindPat::General)) {
                return Some(*f);
            }
        }
        if av {
            if let Some(f) = self.binary.get(&(op, KindPat::General, KindPat::Is(w))) {
                return Some(*f);
            }
        }
        if av && aw {
            if let Some(f) = self.binary.get(&(op, KindPat::General, KindPat::General)) {
                return Some(*f);
            }
        }
        None
    }

    /// Find an implementation of unary `op` for operand representation `v`.
    pub fn find_unary(&self, op: UnaryOp, v: Repr) -> Option<UnaryFn> {
        if let Some(f) = self.unary.get(&(op, KindPat::Is(v))) {
            return Some(*f);
        }
        if (self.accepts)(v) {
            if let Some(f) = self.unary.get(&(op, KindPat::General)) {
                return Some(*f);
            }
        }
        None
    }
}

/// Builder for an [`OpsHandler`]. Rows are kept in insertion order; later
/// rows for the same signature replace earlier ones.
pub struct OpsHandlerBuilder {
    name: &'static str,
    supertypes: &'static [&'static str],
    accepts: fn(Repr) -> bool,
    binary: IndexMap<(BinOp, KindPat, KindPat), BinFn>,
    unary: IndexMap<(UnaryOp, KindPat), UnaryFn>,
}

impl OpsHandlerBuilder {
    /// Set the general-operand-kind predicate.
    pub fn accepts(mut self, f: fn(Repr) -> bool) -> Self {
        self.accepts = f;
        self
    }

    /// Declare the handlers this one is a subtype of.
    pub fn subtype_of(mut self, names: &'static [&'static str]) -> Self {
        self.supertypes = names;
        self
    }

    pub fn binary(mut self, op: BinOp, v: KindPat, w: KindPat, f: BinFn) -> Self {
        self.binary.insert((op, v, w), f);
        self
    }

    pub fn unary(mut self, op: UnaryOp, v: KindPat, f: UnaryFn) -> Self {
        self.unary.insert((op, v), f);
        self
    }

    pub fn build(self) -> Rc<OpsHandler> {
        Rc::new(OpsHandler {
            name: self.name,
            supertypes: self.supertypes,
            accepts: self.accepts,
            binary: self.binary,
            unary: self.unary,
        })
    }
}
