//! Call binding: positional copy, keyword matching, defaults, collectors
//! and the exact shape of each diagnostic.

use std::rc::Rc;

use krait_runtime::{BindError, KwArgs, Signature, SignatureError, Value};

fn int(i: i32) -> Value {
    Value::Int(i)
}

fn kw(pairs: &[(&str, Value)]) -> KwArgs {
    pairs
        .iter()
        .map(|(k, v)| (Rc::from(*k), v.clone()))
        .collect()
}

/// The example signature from the parser documentation:
/// `def func(a, b, c=3, d=4, /, e=5, f=6, *aa, g=7, h, i=9, **kk)`.
fn func() -> Signature {
    Signature::new(
        "func",
        Some("aa"),
        Some("kk"),
        4,
        3,
        &["a", "b", "c", "d", "e", "f", "g", "h", "i"],
    )
    .unwrap()
    .defaults([int(3), int(4), int(5), int(6)])
    .unwrap()
    .kwdefaults([("g", int(7)), ("i", int(9))])
    .unwrap()
}

#[test]
fn trailing_defaults_fill_unbound_parameters() {
    let sig = Signature::new("f", None, None, 0, 0, &["a", "b", "c", "d"])
        .unwrap()
        .defaults([int(30), int(40)])
        .unwrap();
    let frame = sig.bind(&[int(1), int(2)], &KwArgs::new()).unwrap();
    assert_eq!(&*frame, &[int(1), int(2), int(30), int(40)]);

    // A supplied argument beats its default
    let frame = sig.bind(&[int(1), int(2), int(3)], &KwArgs::new()).unwrap();
    assert_eq!(&*frame, &[int(1), int(2), int(3), int(40)]);
}

#[test]
fn defaults_stay_right_aligned_when_keywords_fill_the_front() {
    let sig = Signature::new("f", None, None, 0, 0, &["a", "b", "c", "d"])
        .unwrap()
        .defaults([int(30), int(40)])
        .unwrap();
    // No positional arguments at all; a and b arrive as keywords. The two
    // defaults still belong to c and d.
    let frame = sig.bind(&[], &kw(&[("b", int(2)), ("a", int(1))])).unwrap();
    assert_eq!(&*frame, &[int(1), int(2), int(30), int(40)]);
}

#[test]
fn missing_positional_arguments_are_reported_together() {
    let sig = Signature::new("f", None, None, 0, 0, &["a", "b", "c"]).unwrap();
    let err = sig.bind(&[], &KwArgs::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "f() missing 3 required positional arguments: a, b and c"
    );

    let err = sig.bind(&[int(1)], &KwArgs::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "f() missing 2 required positional arguments: b and c"
    );

    let err = sig.bind(&[int(1), int(2)], &KwArgs::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "f() missing 1 required positional argument: c"
    );
}

#[test]
fn missing_keyword_only_arguments_use_their_own_wording() {
    let sig = Signature::new("f", None, None, 0, 2, &["a", "p", "q"]).unwrap();
    let err = sig.bind(&[int(1)], &KwArgs::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "f() missing 2 required keyword-only arguments: p and q"
    );
}

#[test]
fn too_many_positional_without_collector() {
    let sig = Signature::new("f", None, None, 0, 0, &["a", "b"]).unwrap();
    let err = sig.bind(&[int(1), int(2), int(3)], &KwArgs::new()).unwrap_err();
    assert_eq!(
        err,
        BindError::TooManyPositional {
            func: Rc::from("f"),
            min: 2,
            max: 2,
            given: 3,
            kw_given: 0,
        }
    );
    assert_eq!(
        err.to_string(),
        "f() takes 2 positional arguments but 3 were given"
    );
}

#[test]
fn too_many_positional_reports_the_range_and_keywords_given() {
    let sig = Signature::new("f", None, None, 0, 1, &["a", "b", "c", "p"])
        .unwrap()
        .defaults([int(0)])
        .unwrap();
    let err = sig
        .bind(&[int(1), int(2), int(3), int(4)], &kw(&[("p", int(5))]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "f() takes from 2 to 3 positional arguments but 4 positional arguments \
         (and 1 keyword-only argument) were given"
    );
}

#[test]
fn positional_overflow_collector_gathers_the_excess() {
    let sig = Signature::new("f", Some("rest"), None, 0, 0, &["a"]).unwrap();
    let frame = sig.bind(&[int(1), int(2), int(3)], &KwArgs::new()).unwrap();
    assert_eq!(frame[0], int(1));
    assert_eq!(frame[1], Value::Tuple(Rc::from(vec![int(2), int(3)].as_slice())));

    // No excess: the collector is still bound, to an empty sequence
    let frame = sig.bind(&[int(1)], &KwArgs::new()).unwrap();
    let empty: Rc<[Value]> = Rc::new([]);
    assert_eq!(frame[1], Value::Tuple(empty));
}

#[test]
fn keyword_overflow_collector_gathers_unknown_keywords() {
    let sig = Signature::new("f", None, Some("extras"), 0, 0, &["a"]).unwrap();
    let frame = sig
        .bind(&[int(1)], &kw(&[("z", int(26)), ("y", int(25))]))
        .unwrap();
    match &frame[1] {
        Value::Dict(d) => {
            // Call order is preserved
            let keys: Vec<&str> = d.keys().map(|k| &**k).collect();
            assert_eq!(keys, ["z", "y"]);
            assert_eq!(d["z"], int(26));
        }
        other => panic!("expected dict, got {other:?}"),
    }
}

#[test]
fn unknown_keyword_without_collector_fails() {
    let sig = Signature::new("f", None, None, 0, 0, &["a"]).unwrap();
    let err = sig.bind(&[int(1)], &kw(&[("z", int(26))])).unwrap_err();
    assert_eq!(err.to_string(), "f(): unexpected keyword argument 'z'");
}

#[test]
fn keyword_matching_a_positional_only_parameter_is_called_out() {
    let sig = Signature::new("f", None, None, 2, 0, &["a", "b", "c"]).unwrap();
    let err = sig
        .bind(&[int(1), int(2)], &kw(&[("b", int(9)), ("c", int(3))]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "f(): positional-only arguments passed by keyword: b"
    );
}

#[test]
fn duplicate_binding_is_multiple_values() {
    let sig = Signature::new("f", None, None, 0, 0, &["a", "b"]).unwrap();
    let err = sig
        .bind(&[int(1), int(2)], &kw(&[("b", int(9))]))
        .unwrap_err();
    assert_eq!(err.to_string(), "f(): multiple values for argument 'b'");
}

#[test]
fn the_documented_example_signature_binds() {
    let sig = func();
    // func(1, 2): a=1 b=2, c..f from defaults, g/i from kwdefaults, h given
    let frame = sig.bind(&[int(1), int(2)], &kw(&[("h", int(8))])).unwrap();
    assert_eq!(
        &*frame,
        &[
            int(1),
            int(2),
            int(3),
            int(4),
            int(5),
            int(6),
            int(7),
            int(8),
            int(9),
            Value::Tuple(Rc::new([])),
            Value::Dict(Rc::new(KwArgs::new())),
        ]
    );

    // Excess positional goes to aa, unknown keywords to kk
    let args: Vec<Value> = (1..=8).map(int).collect();
    let frame = sig
        .bind(&args, &kw(&[("h", int(8)), ("zz", int(0))]))
        .unwrap();
    assert_eq!(frame[9], Value::Tuple(Rc::from(vec![int(7), int(8)].as_slice())));
    match &frame[10] {
        Value::Dict(d) => assert_eq!(d.len(), 1),
        other => panic!("expected dict, got {other:?}"),
    }
}

#[test]
fn from_spec_markers_describe_the_same_signature() {
    let sig = Signature::from_spec(
        "func",
        &["a", "b", "c", "d", "/", "e", "f", "*aa", "g", "h", "i", "**kk"],
    )
    .unwrap()
    .defaults([int(3), int(4), int(5), int(6)])
    .unwrap()
    .kwdefaults([("g", int(7)), ("i", int(9))])
    .unwrap();

    assert_eq!(sig.argcount(), 6);
    assert!(sig.has_varargs());
    assert!(sig.has_varkw());
    let frame = sig.bind(&[int(1), int(2)], &kw(&[("h", int(8))])).unwrap();
    let reference = func().bind(&[int(1), int(2)], &kw(&[("h", int(8))])).unwrap();
    assert_eq!(frame[..9], reference[..9]);
}

#[test]
fn keyword_only_marker_without_collector() {
    let sig = Signature::from_spec("f", &["a", "*", "p"]).unwrap();
    let err = sig.bind(&[int(1), int(2)], &KwArgs::new()).unwrap_err();
    assert!(matches!(err, BindError::TooManyPositional { given: 2, max: 1, .. }));
    let frame = sig.bind(&[int(1)], &kw(&[("p", int(2))])).unwrap();
    assert_eq!(&*frame, &[int(1), int(2)]);
}

#[test]
fn signature_shape_is_validated() {
    let err = Signature::new("f", None, None, 0, 0, &["a"])
        .unwrap()
        .defaults([int(1), int(2)])
        .unwrap_err();
    assert!(matches!(
        err,
        SignatureError::TooManyDefaults { given: 2, allowed: 1, .. }
    ));

    let err = Signature::new("f", None, None, 0, 0, &["a"])
        .unwrap()
        .kwdefaults([("zz", int(1))])
        .unwrap_err();
    assert!(matches!(err, SignatureError::UnknownKwDefault { .. }));

    let err = Signature::new("f", None, None, 1, 0, &["", ""]).unwrap_err();
    assert!(matches!(err, SignatureError::UnnamedParameter { .. }));

    // Unnamed is fine inside the positional-only region
    let sig = Signature::new("f", None, None, 2, 0, &["", ""]).unwrap();
    let err = sig.bind(&[], &KwArgs::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "f() missing 2 required positional arguments: arg 1 and arg 2"
    );
}
