//! Binding calls onto declared parameter signatures.
//!
//! A [`Signature`] is the declared shape of a callable: ordered parameter
//! names split into positional-only, regular and keyword-only regions,
//! optional overflow collectors, right-aligned positional defaults and
//! named keyword defaults. [`Signature::bind`] maps one call's positional
//! and keyword arguments onto that shape, producing the frame array
//! `[parameters..., *collector?, **collector?]`, or a [`BindError`]
//! saying precisely what did not fit.

use std::rc::Rc;

use tracing::debug;

use krait_core::value::KwMap;
use krait_core::{FastHashMap, Value, fast_map_new};

use crate::errors::{BindError, SignatureError};

/// Keyword arguments of one call, in call order.
pub type KwArgs = KwMap;

#[derive(Debug)]
pub struct Signature {
    name: Rc<str>,
    /// Regular parameter names, then the collectors (if declared).
    params: Box<[Rc<str>]>,
    /// Number of regular parameters (excludes collectors).
    regargcount: usize,
    /// Number of parameters fillable by position.
    argcount: usize,
    posonly: usize,
    kwonly: usize,
    varargs: Option<usize>,
    varkw: Option<usize>,
    defaults: Box<[Value]>,
    kwdefaults: FastHashMap<Rc<str>, Value>,
}

impl Signature {
    /// Declare a signature. `names` lists the regular parameters in order;
    /// the first `posonly` of them are positional-only and the last
    /// `kwonly` keyword-only. Collector names are given separately and
    /// land at the end of the frame. Positional-only parameters may be
    /// unnamed (`""`); any other empty name is rejected.
    pub fn new(
        name: &str,
        varargs: Option<&str>,
        varkw: Option<&str>,
        posonly: usize,
        kwonly: usize,
        names: &[&str],
    ) -> Result<Signature, SignatureError> {
        let func: Rc<str> = Rc::from(name);
        let regargcount = names.len();
        if posonly + kwonly > regargcount {
            return Err(SignatureError::BadCounts { func, named: regargcount });
        }
        for n in &names[posonly..] {
            if n.is_empty() {
                return Err(SignatureError::UnnamedParameter { func });
            }
        }

        let mut params: Vec<Rc<str>> = names.iter().map(|n| Rc::from(*n)).collect();
        let varargs_index = varargs.map(|n| {
            params.push(Rc::from(n));
            params.len() - 1
        });
        let varkw_index = varkw.map(|n| {
            params.push(Rc::from(n));
            params.len() - 1
        });

        Ok(Signature {
            name: func,
            params: params.into_boxed_slice(),
            regargcount,
            argcount: regargcount - kwonly,
            posonly,
            kwonly,
            varargs: varargs_index,
            varkw: varkw_index,
            defaults: Box::new([]),
            kwdefaults: fast_map_new(),
        })
    }

    /// Declare a signature from a parameter list with markers, e.g.
    /// `["a", "b", "/", "c", "*args", "d", "**kw"]`: `/` ends the
    /// positional-only region, `*` (bare) or `*name` starts the
    /// keyword-only region.
    pub fn from_spec(name: &str, decl: &[&str]) -> Result<Signature, SignatureError> {
        let mut names: Vec<&str> = Vec::new();
        let mut varargs = None;
        let mut varkw = None;
        let mut posonly = 0;
        let mut poscount = None;

        for arg in decl {
            if let Some(rest) = arg.strip_prefix("**") {
                varkw = Some(rest);
            } else if let Some(rest) = arg.strip_prefix('*') {
                poscount.get_or_insert(names.len());
                if !rest.is_empty() {
                    varargs = Some(rest);
                }
            } else if arg.starts_with('/') {
                posonly = names.len();
            } else {
                names.push(arg);
            }
        }
        let poscount = poscount.unwrap_or(names.len());

        Signature::new(name, varargs, varkw, posonly, names.len() - poscount, &names)
    }

    /// Provide the positional defaults. `k` values correspond to the last
    /// `k` positional parameters in declaration order.
    pub fn defaults(
        mut self,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Signature, SignatureError> {
        let defaults: Vec<Value> = values.into_iter().collect();
        if defaults.len() > self.argcount {
            return Err(SignatureError::TooManyDefaults {
                func: self.name.clone(),
                given: defaults.len(),
                allowed: self.argcount,
            });
        }
        self.defaults = defaults.into_boxed_slice();
        Ok(self)
    }

    /// Provide keyword defaults by parameter name. Each name must match a
    /// keyword-only parameter.
    pub fn kwdefaults<'a>(
        mut self,
        pairs: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Signature, SignatureError> {
        for (name, value) in pairs {
            let kwonly_region = &self.params[self.argcount..self.regargcount];
            match kwonly_region.iter().find(|p| &***p == name) {
                Some(param) => {
                    self.kwdefaults.insert(param.clone(), value);
                }
                None => {
                    return Err(SignatureError::UnknownKwDefault {
                        func: self.name.clone(),
                        name: Rc::from(name),
                    });
                }
            }
        }
        Ok(self)
    }

    pub fn name(&self) -> &Rc<str> {
        &self.name
    }

    /// All frame slot names: regular parameters, then collectors.
    pub fn param_names(&self) -> &[Rc<str>] {
        &self.params
    }

    pub fn argcount(&self) -> usize {
        self.argcount
    }

    pub fn has_varargs(&self) -> bool {
        self.varargs.is_some()
    }

    pub fn has_varkw(&self) -> bool {
        self.varkw.is_some()
    }

    /// Bind one call. On success every frame slot is populated: parameters
    /// from arguments or defaults, collectors always (empty if unused).
    pub fn bind(&self, args: &[Value], kwargs: &KwArgs) -> Result<Box<[Value]>, BindError> {
        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        let nargs = args.len();

        // Positional arguments, up to the positional region. Excess is not
        // an error yet: a collector may catch it below.
        for (slot, arg) in slots.iter_mut().zip(&args[..nargs.min(self.argcount)]) {
            *slot = Some(arg.clone());
        }

        // Keyword arguments. Anything that does not name an allowed
        // parameter goes to the keyword collector, or is an error.
        let mut kwdict = self.varkw.map(|_| KwMap::new());
        for (name, value) in kwargs {
            match self.keyword_index(name) {
                Some(i) => {
                    if slots[i].is_some() {
                        return Err(self.fail(BindError::MultipleValues {
                            func: self.name.clone(),
                            name: name.clone(),
                        }));
                    }
                    slots[i] = Some(value.clone());
                }
                None => match &mut kwdict {
                    Some(d) => {
                        d.insert(name.clone(), value.clone());
                    }
                    None => return Err(self.fail(self.unexpected_keyword(name, kwargs))),
                },
            }
        }

        if nargs > self.argcount {
            match self.varargs {
                Some(i) => slots[i] = Some(Value::Tuple(Rc::from(&args[self.argcount..]))),
                None => return Err(self.fail(self.too_many_positional(nargs, &slots))),
            }
        } else {
            if let Some(i) = self.varargs {
                // No excess: the collector is still bound, to empty.
                let empty: Rc<[Value]> = Rc::new([]);
                slots[i] = Some(Value::Tuple(empty));
            }
            if nargs < self.argcount {
                self.apply_defaults(nargs, &mut slots)?;
            }
        }

        if let Some(i) = self.varkw {
            slots[i] = Some(Value::Dict(Rc::new(kwdict.unwrap_or_default())));
        }

        if self.kwonly > 0 {
            self.apply_kwdefaults(&mut slots)?;
        }

        Ok(slots
            .into_iter()
            .map(|s| s.expect("all parameter slots bound"))
            .collect())
    }

    /// Index of `name` among the parameters a keyword may bind: anything
    /// after the positional-only boundary, up through the keyword-only
    /// region.
    fn keyword_index(&self, name: &str) -> Option<usize> {
        self.params[self.posonly..self.regargcount]
            .iter()
            .position(|p| &**p == name)
            .map(|i| i + self.posonly)
    }

    /// Diagnose a keyword with no matching parameter. If any keyword in
    /// the call names a positional-only parameter, report those by name;
    /// otherwise the offending keyword is simply unexpected.
    fn unexpected_keyword(&self, name: &Rc<str>, kwargs: &KwArgs) -> BindError {
        let mut posonly_hits: Vec<Rc<str>> = Vec::new();
        for param in &self.params[..self.posonly] {
            if kwargs.contains_key(param) {
                posonly_hits.push(param.clone());
            }
        }
        if posonly_hits.is_empty() {
            BindError::UnexpectedKeyword {
                func: self.name.clone(),
                name: name.clone(),
            }
        } else {
            BindError::PositionalOnlyPassedByKeyword {
                func: self.name.clone(),
                names: posonly_hits,
            }
        }
    }

    /// Diagnose positional overflow. Keyword-only arguments that were
    /// supplied are counted so the message can distinguish them.
    fn too_many_positional(&self, given: usize, slots: &[Option<Value>]) -> BindError {
        let kw_given = slots[self.argcount..self.regargcount]
            .iter()
            .filter(|s| s.is_some())
            .count();
        BindError::TooManyPositional {
            func: self.name.clone(),
            min: self.argcount - self.defaults.len(),
            max: self.argcount,
            given,
            kw_given,
        }
    }

    /// Fill unbound positional parameters from the right-aligned defaults:
    /// the last `k` defaults belong to the last `k` positional parameters.
    /// Whatever has no default and is still unbound is reported missing,
    /// all names together.
    fn apply_defaults(&self, nargs: usize, slots: &mut [Option<Value>]) -> Result<(), BindError> {
        let first_default = self.argcount - self.defaults.len();
        let mut missing: Vec<Rc<str>> = Vec::new();
        for i in nargs..first_default {
            if slots[i].is_none() {
                missing.push(self.arg_name(i));
            }
        }
        if !missing.is_empty() {
            return Err(self.fail(BindError::MissingPositional {
                func: self.name.clone(),
                names: missing,
            }));
        }
        for (j, default) in self.defaults.iter().enumerate() {
            let i = first_default + j;
            if slots[i].is_none() {
                slots[i] = Some(default.clone());
            }
        }
        Ok(())
    }

    /// Fill unbound keyword-only parameters from the keyword defaults;
    /// report the remainder missing, separately from positional ones.
    fn apply_kwdefaults(&self, slots: &mut [Option<Value>]) -> Result<(), BindError> {
        let mut missing: Vec<Rc<str>> = Vec::new();
        for i in self.argcount..self.regargcount {
            if slots[i].is_none() {
                match self.kwdefaults.get(&self.params[i]) {
                    Some(v) => slots[i] = Some(v.clone()),
                    None => missing.push(self.arg_name(i)),
                }
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(self.fail(BindError::MissingKeywordOnly {
                func: self.name.clone(),
                names: missing,
            }))
        }
    }

    /// The name of parameter `i`, or a made-up one for unnamed
    /// positional-only parameters.
    fn arg_name(&self, i: usize) -> Rc<str> {
        let name = &self.params[i];
        if name.is_empty() {
            Rc::from(format!("arg {}", i + 1))
        } else {
            name.clone()
        }
    }

    fn fail(&self, err: BindError) -> BindError {
        debug!(func = %self.name, error = %err, "call binding failed");
        err
    }
}
