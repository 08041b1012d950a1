//! Krait language runtime core.
//!
//! The three load-bearing subsystems of the runtime, plus their shared
//! support:
//!
//! - [`ops`] / [`registry`]: operand handlers (per-representation operator
//!   tables) and the write-once registry mapping runtime representations to
//!   handlers.
//! - [`dispatch`]: per-call-site operator cells that cache a resolved
//!   implementation behind a representation guard.
//! - [`types`]: the type descriptor arena and C3 method resolution order.
//! - [`callbind`]: binding positional/keyword arguments onto declared
//!   signatures with defaults and overflow collectors.
//!
//! The interpreter loop that drives these is a separate layer; it owns one
//! dispatch cell per operator occurrence and calls into this crate at
//! operator, type-definition and call instructions.

#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

pub mod callbind;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod ops;
pub mod registry;
pub mod types;

pub use callbind::{KwArgs, Signature};
pub use config::RuntimeConfig;
pub use dispatch::{BinOpCell, UnaryOpCell, eval_binary, eval_unary};
pub use errors::{BindError, DispatchError, SignatureError, TypeDefError};
pub use krait_core::{Obj, Repr, TypeId, Value};
pub use ops::{BinFn, BinOp, KindPat, OpsHandler, UnaryFn, UnaryOp};
pub use registry::OpsRegistry;
pub use types::{TypeDescriptor, TypeFlags, TypeRegistry, TypeSpec};
