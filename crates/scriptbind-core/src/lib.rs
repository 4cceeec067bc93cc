//! Core types for binding native Rust code to a scripting VM.
//!
//! This crate holds everything that runs at script call time:
//!
//! ```text
//! Value / ValueKind        - tagged values at the VM boundary
//! FromValue / IntoValue    - the value codec
//! InstanceTable            - owner of wrapped native instances
//! CallContext / NativeFn   - entry points and their call frames
//! Params / ArgumentList    - declared parameters and defaults
//! ArgTuple                 - typed argument extraction
//! ```
//!
//! Bind-time machinery (class registry, builders, overloads) lives in
//! `scriptbind-registry`.

mod args;
mod callable;
mod convert;
mod error;
mod instance;
mod native_fn;
mod params;
mod script_type;
mod type_hash;
mod value;

pub use args::ArgTuple;
pub use callable::{Constructor, Method, MethodMut};
pub use convert::{FromValue, IntoValue, instance_from_value, instance_into_value};
pub use error::{CallError, CallErrorKind, ConversionError, RegistrationError};
pub use instance::{InstanceHandle, InstanceTable};
pub use native_fn::{CallContext, NativeCallable, NativeFn};
pub use params::{ArgumentDescriptor, ArgumentList, DefaultValue, Params};
pub use script_type::{NativeClass, ParamType, ScriptType, TypeKind};
pub use type_hash::{TypeHash, hash_constants};
pub use value::{Value, ValueKind};
