//! Value codec and argument handling through bound entry points.

mod common;

use std::ffi::CString;

use common::MockVm;
use scriptbind::{Bindings, CallError, ConversionError, NativeClass, NativeFn, Params, TypeHash, Value};

#[derive(Default, NativeClass)]
struct Echo;

fn echo_bindings() -> (MockVm, Bindings<usize>, usize, Value) {
    let mut vm = MockVm::new();
    let mut bindings = Bindings::new();
    bindings
        .register_class::<Echo, _>(&mut vm, "Echo", None)
        .unwrap()
        .method("i8", |_: &Echo, v: i8| v)
        .unwrap()
        .method("i16", |_: &Echo, v: i16| v)
        .unwrap()
        .method("i32", |_: &Echo, v: i32| v)
        .unwrap()
        .method("i64", |_: &Echo, v: i64| v)
        .unwrap()
        .method("isize", |_: &Echo, v: isize| v)
        .unwrap()
        .method("u8", |_: &Echo, v: u8| v)
        .unwrap()
        .method("u16", |_: &Echo, v: u16| v)
        .unwrap()
        .method("u32", |_: &Echo, v: u32| v)
        .unwrap()
        .method("u64", |_: &Echo, v: u64| v)
        .unwrap()
        .method("usize", |_: &Echo, v: usize| v)
        .unwrap()
        .method("same_bool", |_: &Echo, v: bool| v)
        .unwrap()
        .method("same_char", |_: &Echo, v: char| v)
        .unwrap()
        .method("f32", |_: &Echo, v: f32| v)
        .unwrap()
        .method("f64", |_: &Echo, v: f64| v)
        .unwrap()
        .method("bool", |_: &Echo, v: bool| !v)
        .unwrap()
        .method("char", |_: &Echo, v: char| v.to_ascii_uppercase())
        .unwrap()
        .method("string", |_: &Echo, v: String| v)
        .unwrap()
        .method("cstring", |_: &Echo, v: CString| v)
        .unwrap()
        .method("maybe", |_: &Echo, v: Option<i32>| v.map(|n| n * 2))
        .unwrap()
        .method("any", |_: &Echo, v: Value| v)
        .unwrap()
        .method("greeting", |_: &Echo| "hello")
        .unwrap()
        .method("huge", |_: &Echo| u64::MAX)
        .unwrap()
        .method_with(
            "join",
            Params::new().required().optional(", ").optional(false),
            |_: &Echo, items: String, sep: String, upper: bool| {
                let joined = items.split(' ').collect::<Vec<_>>().join(&sep);
                if upper { joined.to_uppercase() } else { joined }
            },
        )
        .unwrap();
    let class = vm.class_named("Echo");
    let echo = vm.new_object(bindings.instances_mut(), class, &[]).unwrap();
    (vm, bindings, class, echo)
}

fn call(fixture: &mut (MockVm, Bindings<usize>, usize, Value), name: &str, args: &[Value]) -> Result<Value, CallError> {
    let (vm, bindings, class, echo) = fixture;
    vm.call(bindings.instances_mut(), *class, echo, name, args)
}

#[test]
fn scalars_round_trip() {
    let mut fx = echo_bindings();
    let cases = [
        ("i8", Value::Int(-128)),
        ("i64", Value::Int(i64::MIN)),
        ("u16", Value::Int(65535)),
        ("u64", Value::Int(i64::MAX)),
        ("f64", Value::Float(-0.25)),
        ("f32", Value::Float(1.5)),
        ("string", Value::Str("héllo wörld".into())),
        ("string", Value::Str(String::new())),
        ("cstring", Value::Str("plain".into())),
        ("any", Value::Bool(true)),
        ("any", Value::Nil),
    ];
    for (name, value) in cases {
        let ret = call(&mut fx, name, std::slice::from_ref(&value)).unwrap();
        assert_eq!(ret, value, "{name}");
    }
}

#[test]
fn integer_bounds_round_trip() {
    let mut fx = echo_bindings();
    let cases = [
        ("i8", i64::from(i8::MIN), i64::from(i8::MAX)),
        ("i16", i64::from(i16::MIN), i64::from(i16::MAX)),
        ("i32", i64::from(i32::MIN), i64::from(i32::MAX)),
        ("i64", i64::MIN, i64::MAX),
        ("isize", isize::MIN as i64, isize::MAX as i64),
        ("u8", 0, i64::from(u8::MAX)),
        ("u16", 0, i64::from(u16::MAX)),
        ("u32", 0, i64::from(u32::MAX)),
        ("u64", 0, i64::MAX),
        ("usize", 0, i64::try_from(usize::MAX).unwrap_or(i64::MAX)),
    ];
    for (name, min, max) in cases {
        for bound in [min, max] {
            let value = Value::Int(bound);
            let ret = call(&mut fx, name, std::slice::from_ref(&value)).unwrap();
            assert_eq!(ret, value, "{name} at {bound}");
        }
    }

    for (name, past) in [("i16", i64::from(i16::MAX) + 1), ("i32", i64::from(i32::MIN) - 1), ("u8", 256), ("u32", -1)] {
        let err = call(&mut fx, name, &[Value::Int(past)]).unwrap_err();
        assert!(
            matches!(err, CallError::Argument { source: ConversionError::IntegerOverflow { .. }, .. }),
            "{name} at {past}"
        );
    }
}

#[test]
fn bool_and_char_round_trip() {
    let mut fx = echo_bindings();
    let cases = [
        ("same_bool", Value::Bool(true)),
        ("same_bool", Value::Bool(false)),
        ("same_char", Value::Str("z".into())),
        ("same_char", Value::Str("é".into())),
        ("same_char", Value::Str("\u{1F600}".into())),
    ];
    for (name, value) in cases {
        let ret = call(&mut fx, name, std::slice::from_ref(&value)).unwrap();
        assert_eq!(ret, value, "{name}");
    }
}

#[test]
fn scalar_transforms() {
    let mut fx = echo_bindings();
    assert_eq!(call(&mut fx, "bool", &[Value::Bool(true)]).unwrap(), Value::Bool(false));
    assert_eq!(call(&mut fx, "char", &[Value::Str("q".into())]).unwrap(), Value::Str("Q".into()));
    assert_eq!(call(&mut fx, "maybe", &[Value::Int(21)]).unwrap(), Value::Int(42));
    assert_eq!(call(&mut fx, "maybe", &[Value::Nil]).unwrap(), Value::Nil);
    assert_eq!(call(&mut fx, "greeting", &[]).unwrap(), Value::Str("hello".into()));
}

#[test]
fn integers_widen_to_floats() {
    let mut fx = echo_bindings();
    assert_eq!(call(&mut fx, "f64", &[Value::Int(3)]).unwrap(), Value::Float(3.0));
}

#[test]
fn narrowing_is_checked() {
    let mut fx = echo_bindings();

    let err = call(&mut fx, "i8", &[Value::Int(128)]).unwrap_err();
    assert!(matches!(
        err,
        CallError::Argument {
            index: 0,
            source: ConversionError::IntegerOverflow { value: 128, target_type: "i8" }
        }
    ));

    let err = call(&mut fx, "u64", &[Value::Int(-1)]).unwrap_err();
    assert!(matches!(err, CallError::Argument { source: ConversionError::IntegerOverflow { .. }, .. }));

    let err = call(&mut fx, "i64", &[Value::Float(1.0)]).unwrap_err();
    assert!(matches!(err, CallError::Argument { source: ConversionError::TypeMismatch { .. }, .. }));

    let err = call(&mut fx, "f32", &[Value::Float(1e300)]).unwrap_err();
    assert!(matches!(err, CallError::Argument { source: ConversionError::FloatConversion { .. }, .. }));
}

#[test]
fn wide_unsigned_return_is_checked() {
    let mut fx = echo_bindings();
    let err = call(&mut fx, "huge", &[]).unwrap_err();
    assert_eq!(err, CallError::Return(ConversionError::UnsignedOverflow { value: u64::MAX }));
}

#[test]
fn strings_are_validated() {
    let mut fx = echo_bindings();

    let err = call(&mut fx, "cstring", &[Value::Str("a\0b".into())]).unwrap_err();
    assert!(matches!(
        err,
        CallError::Argument {
            source: ConversionError::InteriorNul { position: 1 },
            ..
        }
    ));

    let err = call(&mut fx, "char", &[Value::Str("ab".into())]).unwrap_err();
    assert!(matches!(
        err,
        CallError::Argument {
            source: ConversionError::NotAChar { length: 2 },
            ..
        }
    ));

    let err = call(&mut fx, "string", &[Value::Int(1)]).unwrap_err();
    assert!(matches!(err, CallError::Argument { source: ConversionError::TypeMismatch { .. }, .. }));
}

#[test]
fn string_defaults_fill_trailing_parameters() {
    let mut fx = echo_bindings();
    let items = Value::Str("a b c".into());

    let ret = call(&mut fx, "join", std::slice::from_ref(&items)).unwrap();
    assert_eq!(ret, Value::Str("a, b, c".into()));

    let ret = call(&mut fx, "join", &[items.clone(), Value::Str("-".into())]).unwrap();
    assert_eq!(ret, Value::Str("a-b-c".into()));

    let ret = call(&mut fx, "join", &[items, Value::Str("/".into()), Value::Bool(true)]).unwrap();
    assert_eq!(ret, Value::Str("A/B/C".into()));
}

#[test]
fn free_function_frame() {
    let entry = NativeFn::new(TypeHash::from_name("add"), |ctx: &mut scriptbind::CallContext| -> Result<(), CallError> {
        let (a, b): (i32, i32) = ctx.args()?;
        ctx.set_return(a + b)
    });

    let mut instances = scriptbind::InstanceTable::new();
    let mut ret = Value::Nil;
    let args = [Value::Int(2), Value::Int(40)];
    let mut ctx = scriptbind::CallContext::new(&args, 0, &mut ret, &mut instances);
    entry.call(&mut ctx).unwrap();
    assert_eq!(ret, Value::Int(42));

    let mut ret = Value::Nil;
    let mut ctx = scriptbind::CallContext::new(&args[..1], 0, &mut ret, &mut instances);
    let err = entry.call(&mut ctx).unwrap_err();
    assert!(matches!(err, CallError::ArgumentCount { given: 1, required: 2, max: 2 }));
}
