//! Type descriptors and the type registry arena.
//!
//! Types form a DAG (multiple inheritance), so descriptors live in an
//! arena and refer to each other by index ([`TypeId`]), never by deep
//! copy. A descriptor is immutable once defined; redefining a name
//! produces a new descriptor. The registry seeds the root `object` type
//! at slot 0.

mod mro;

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::debug;

use krait_core::{FastHashMap, TypeId, Value, fast_map_new};

use crate::errors::TypeDefError;

/// Instance-layout flags of a type: whether instances carry an attribute
/// map, fixed named slots, or both.
#[derive(Clone, Debug, Default)]
pub struct TypeFlags {
    pub has_dict: bool,
    pub slots: Option<Box<[Rc<str>]>>,
}

impl TypeFlags {
    pub fn with_dict() -> Self {
        Self { has_dict: true, slots: None }
    }

    pub fn with_slots(names: &[&str]) -> Self {
        Self {
            has_dict: false,
            slots: Some(names.iter().map(|n| Rc::from(*n)).collect()),
        }
    }
}

/// Everything a type definition supplies. Consumed by
/// [`TypeRegistry::define`].
pub struct TypeSpec {
    name: Rc<str>,
    bases: Vec<TypeId>,
    flags: TypeFlags,
    attrs: Vec<(Rc<str>, Value)>,
}

impl TypeSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: Rc::from(name),
            bases: Vec::new(),
            flags: TypeFlags::with_dict(),
            attrs: Vec::new(),
        }
    }

    pub fn base(mut self, base: TypeId) -> Self {
        self.bases.push(base);
        self
    }

    pub fn bases(mut self, bases: &[TypeId]) -> Self {
        self.bases.extend_from_slice(bases);
        self
    }

    pub fn flags(mut self, flags: TypeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.push((Rc::from(name), value));
        self
    }
}

/// One defined type. The MRO starts with the type itself and is immutable.
pub struct TypeDescriptor {
    name: Rc<str>,
    bases: SmallVec<[TypeId; 4]>,
    mro: SmallVec<[TypeId; 8]>,
    flags: TypeFlags,
    attrs: FastHashMap<Rc<str>, Value>,
}

impl TypeDescriptor {
    pub fn name(&self) -> &Rc<str> {
        &self.name
    }

    pub fn bases(&self) -> &[TypeId] {
        &self.bases
    }

    pub fn mro(&self) -> &[TypeId] {
        &self.mro
    }

    pub fn flags(&self) -> &TypeFlags {
        &self.flags
    }

    /// An attribute defined directly on this type (no MRO search).
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }
}

/// Arena of type descriptors.
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
}

impl TypeRegistry {
    /// A registry containing only the root `object` type.
    pub fn new() -> Self {
        let object = TypeDescriptor {
            name: Rc::from("object"),
            bases: SmallVec::new(),
            mro: SmallVec::from_slice(&[TypeId::OBJECT]),
            flags: TypeFlags::with_dict(),
            attrs: fast_map_new(),
        };
        Self { types: vec![object] }
    }

    pub fn object(&self) -> TypeId {
        TypeId::OBJECT
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id.0 as usize)
    }

    /// Define a new type. Bases must already be defined in this registry;
    /// a type declared with no bases derives from `object`. On any error
    /// the registry is unchanged.
    pub fn define(&mut self, spec: TypeSpec) -> Result<TypeId, TypeDefError> {
        let mut bases = spec.bases;
        if bases.is_empty() {
            bases.push(TypeId::OBJECT);
        }
        for (i, base) in bases.iter().enumerate() {
            if self.get(*base).is_none() {
                return Err(TypeDefError::UnknownBase(*base));
            }
            if bases[..i].contains(base) {
                let name = self.types[base.0 as usize].name.clone();
                return Err(TypeDefError::DuplicateBase { name });
            }
        }

        let id = TypeId(self.types.len() as u32);
        let mro = mro::compute(id, &bases, &self.types)?;
        debug!(name = %spec.name, mro_len = mro.len(), "type defined");

        self.types.push(TypeDescriptor {
            name: spec.name,
            bases: SmallVec::from_vec(bases),
            mro,
            flags: spec.flags,
            attrs: spec.attrs.into_iter().collect(),
        });
        Ok(id)
    }

    /// Whether `a` is `b` or derives from it.
    pub fn is_subtype(&self, a: TypeId, b: TypeId) -> bool {
        self.get(a).is_some_and(|d| d.mro.contains(&b))
    }

    /// Resolve an attribute along the MRO: the first type in `a`'s MRO
    /// that defines `name` wins.
    pub fn lookup(&self, a: TypeId, name: &str) -> Option<&Value> {
        let mro = &self.get(a)?.mro;
        for t in mro.iter() {
            if let Some(v) = self.types[t.0 as usize].attr(name) {
                return Some(v);
            }
        }
        None
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
