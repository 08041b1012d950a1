//! Structured runtime errors.
//!
//! Every failure in this crate is a synchronous, non-retryable value
//! carrying enough data (kinds, counts, names) for a caller to decide how
//! to surface it. The `Display` texts reproduce the conventional
//! interpreter diagnostics.

use std::rc::Rc;

use thiserror::Error;

use krait_core::TypeId;

/// Operator dispatch found no applicable implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unsupported operand type(s) for {symbol}: '{lhs}' and '{rhs}'")]
    Binary {
        symbol: &'static str,
        lhs: Rc<str>,
        rhs: Rc<str>,
    },

    #[error("bad operand type for unary {symbol}: '{operand}'")]
    Unary {
        symbol: &'static str,
        operand: Rc<str>,
    },
}

/// Type definition failed; the registry is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeDefError {
    #[error(
        "cannot create a consistent method resolution order (MRO) for bases ({})",
        .bases.join(", ")
    )]
    InconsistentMro { bases: Vec<Rc<str>> },

    #[error("duplicate base class {name}")]
    DuplicateBase { name: Rc<str> },

    #[error("base type {0:?} is not defined in this registry")]
    UnknownBase(TypeId),
}

/// A signature declaration was rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("more defaults ({given} given) than positional parameters ({allowed} allowed) when specifying '{func}'")]
    TooManyDefaults {
        func: Rc<str>,
        given: usize,
        allowed: usize,
    },

    #[error("keyword default '{name}' does not name a keyword-only parameter of '{func}'")]
    UnknownKwDefault { func: Rc<str>, name: Rc<str> },

    #[error("misplaced empty parameter name in signature of '{func}'")]
    UnnamedParameter { func: Rc<str> },

    #[error("positional-only and keyword-only counts exceed the {named} named parameters of '{func}'")]
    BadCounts { func: Rc<str>, named: usize },
}

/// A call does not fit the target signature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("{}", render_too_many_positional(.func, .min, .max, .given, .kw_given))]
    TooManyPositional {
        func: Rc<str>,
        /// Fewest positional arguments accepted (after defaults).
        min: usize,
        /// Most positional arguments accepted.
        max: usize,
        given: usize,
        /// Keyword-only arguments that were also supplied in the call.
        kw_given: usize,
    },

    #[error("{func}(): multiple values for argument '{name}'")]
    MultipleValues { func: Rc<str>, name: Rc<str> },

    #[error("{func}(): unexpected keyword argument '{name}'")]
    UnexpectedKeyword { func: Rc<str>, name: Rc<str> },

    #[error("{func}(): positional-only arguments passed by keyword: {}", .names.join(", "))]
    PositionalOnlyPassedByKeyword { func: Rc<str>, names: Vec<Rc<str>> },

    #[error(
        "{func}() missing {} required positional argument{}: {}",
        .names.len(),
        plural(.names.len()),
        join_names(.names)
    )]
    MissingPositional { func: Rc<str>, names: Vec<Rc<str>> },

    #[error(
        "{func}() missing {} required keyword-only argument{}: {}",
        .names.len(),
        plural(.names.len()),
        join_names(.names)
    )]
    MissingKeywordOnly { func: Rc<str>, names: Vec<Rc<str>> },
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Join names as `a`, `a and b`, `a, b and c`.
pub(crate) fn join_names(names: &[Rc<str>]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [head @ .., last_but_one, last] => {
            let mut out = String::new();
            for name in head {
                out.push_str(name);
                out.push_str(", ");
            }
            out.push_str(last_but_one);
            out.push_str(" and ");
            out.push_str(last);
            out
        }
    }
}

fn render_too_many_positional(
    func: &str,
    min: &usize,
    max: &usize,
    given: &usize,
    kw_given: &usize,
) -> String {
    let (min, max, given, kw_given) = (*min, *max, *given, *kw_given);
    let (pos_text, pos_plural) = if min != max {
        (format!("from {min} to {max}"), true)
    } else if max == 0 {
        ("no".to_string(), true)
    } else {
        (max.to_string(), max != 1)
    };
    let given_text = if kw_given > 0 {
        format!(
            " positional argument{} (and {} keyword-only argument{})",
            plural(given),
            kw_given,
            plural(kw_given)
        )
    } else {
        String::new()
    };
    let verb = if given == 1 && kw_given == 0 { "was" } else { "were" };
    format!(
        "{func}() takes {pos_text} positional argument{} but {given}{given_text} {verb} given",
        if pos_plural { "s" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ns: &[&str]) -> Vec<Rc<str>> {
        ns.iter().map(|n| Rc::from(*n)).collect()
    }

    #[test]
    fn join_name_lists() {
        assert_eq!(join_names(&names(&["a"])), "a");
        assert_eq!(join_names(&names(&["a", "b"])), "a and b");
        assert_eq!(join_names(&names(&["a", "b", "c"])), "a, b and c");
        assert_eq!(join_names(&names(&["a", "b", "c", "d"])), "a, b, c and d");
    }

    #[test]
    fn too_many_positional_messages() {
        let e = BindError::TooManyPositional {
            func: Rc::from("f"),
            min: 2,
            max: 2,
            given: 3,
            kw_given: 0,
        };
        assert_eq!(
            e.to_string(),
            "f() takes 2 positional arguments but 3 were given"
        );

        let e = BindError::TooManyPositional {
            func: Rc::from("f"),
            min: 2,
            max: 4,
            given: 5,
            kw_given: 1,
        };
        assert_eq!(
            e.to_string(),
            "f() takes from 2 to 4 positional arguments but 5 positional arguments \
             (and 1 keyword-only argument) were given"
        );

        let e = BindError::TooManyPositional {
            func: Rc::from("f"),
            min: 0,
            max: 0,
            given: 1,
            kw_given: 0,
        };
        assert_eq!(
            e.to_string(),
            "f() takes no positional arguments but 1 was given"
        );
    }
}
