//! Krait core: the boxed value representation and the numeric tower.
//!
//! Everything here is a leaf: pure data and pure functions, no registries,
//! no caches. The dispatch machinery, type system and call binder live in
//! `krait_runtime` and build on these types.

pub mod num;
pub mod value;

pub use value::{FastHashMap, KwMap, Obj, Repr, TypeId, Value, fast_map_new};
