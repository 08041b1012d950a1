//! Runtime value representation.
//!
//! Values are boxed over a fixed set of host representations. The numeric
//! kinds form a tower (narrow int, wide int, big int, float) with widening
//! rules implemented in [`crate::num`]. `Repr` is the representation tag
//! that operator dispatch guards compare and that the handler registry is
//! keyed by.

use std::fmt;
use std::rc::Rc;

use ahash::RandomState;
use hashbrown::HashMap;
use indexmap::IndexMap;
use num_bigint::BigInt;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

pub fn fast_map_new<K, V>() -> FastHashMap<K, V> {
    FastHashMap::with_hasher(RandomState::new())
}

/// Insertion-ordered keyword map. Keyword arguments at a call site and the
/// keyword overflow collector both preserve call order.
pub type KwMap = IndexMap<Rc<str>, Value>;

/// Index of a type descriptor in the type registry arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The root `object` type always occupies slot 0 of the registry.
    pub const OBJECT: TypeId = TypeId(0);
}

/// Header of a user-type instance: the type identity needed for dispatch
/// and diagnostics. Instance storage proper belongs to the interpreter
/// layer, which is outside this core.
#[derive(Clone, Debug, PartialEq)]
pub struct Obj {
    pub ty: TypeId,
    pub ty_name: Rc<str>,
}

impl Obj {
    pub fn new(ty: TypeId, ty_name: &str) -> Rc<Obj> {
        Rc::new(Obj { ty, ty_name: Rc::from(ty_name) })
    }
}

/// A dynamically-typed value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    /// Narrow integer. Arithmetic results re-narrow to this kind whenever
    /// they fit (see [`crate::num::narrow_result`]).
    Int(i32),
    /// Wide integer.
    Wide(i64),
    /// Arbitrary-precision integer, reached only by overflow promotion.
    Big(Rc<BigInt>),
    Float(f64),
    Str(Rc<str>),
    Tuple(Rc<[Value]>),
    Dict(Rc<KwMap>),
    /// Instance of a user-defined type.
    Object(Rc<Obj>),
}

/// Runtime representation tag of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Repr {
    None,
    Bool,
    Int,
    Wide,
    Big,
    Float,
    Str,
    Tuple,
    Dict,
    Object(TypeId),
}

impl Value {
    pub fn big(n: BigInt) -> Value {
        Value::Big(Rc::new(n))
    }

    pub fn str(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }

    pub fn repr(&self) -> Repr {
        match self {
            Value::None => Repr::None,
            Value::Bool(_) => Repr::Bool,
            Value::Int(_) => Repr::Int,
            Value::Wide(_) => Repr::Wide,
            Value::Big(_) => Repr::Big,
            Value::Float(_) => Repr::Float,
            Value::Str(_) => Repr::Str,
            Value::Tuple(_) => Repr::Tuple,
            Value::Dict(_) => Repr::Dict,
            Value::Object(o) => Repr::Object(o.ty),
        }
    }

    /// Language-level type name, as surfaced in diagnostics. All three
    /// integer representations present as one `int` type.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::Wide(_) | Value::Big(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Object(o) => &o.ty_name,
        }
    }

    /// Widen a narrow or wide integer to 64 bits.
    pub fn as_wide(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i as i64),
            Value::Wide(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert any numeric kind to float. Lossy for magnitudes beyond
    /// 2^53, and for big integers beyond the float range entirely.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Wide(i) => Some(*i as f64),
            Value::Big(n) => Some(crate::num::big_to_f64(n)),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Int(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Value::Wide(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Value::Big(n) => write!(f, "{}", n),
            Value::Float(x) => {
                if x.is_finite() {
                    f.write_str(ryu::Buffer::new().format(*x))
                } else if x.is_nan() {
                    f.write_str("nan")
                } else if *x > 0.0 {
                    f.write_str("inf")
                } else {
                    f.write_str("-inf")
                }
            }
            Value::Str(s) => f.write_str(s),
            Value::Tuple(items) => {
                f.write_str("(")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Dict(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{}': {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Object(o) => write!(f, "<{} object>", o.ty_name),
        }
    }
}
