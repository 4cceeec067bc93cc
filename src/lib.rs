//! Bind native Rust types to an embedded, dynamically typed scripting VM.
//!
//! The embedding VM implements [`HostVm`]; native types are registered on
//! a [`Bindings`] and their members bound through a [`ClassBuilder`]. Each
//! binder synthesises a [`NativeFn`] that converts script arguments,
//! applies declared defaults, calls the native code and encodes the result.
//!
//! ```ignore
//! use scriptbind::{Bindings, NativeClass, Params};
//!
//! #[derive(Default, NativeClass)]
//! struct Monster {
//!     #[script(get, set)]
//!     hp: u32,
//!     #[script(get)]
//!     atk: u32,
//! }
//!
//! let mut bindings = Bindings::new();
//! bindings
//!     .register_class::<Monster, _>(&mut vm, "Monster", None)?
//!     .constructor_with(Params::new().optional(0), Monster::of_kind)?
//!     .method_mut("apply_damage", |m: &mut Monster, dmg: u32| m.apply_damage(dmg))?
//!     .fields()?;
//! ```

mod bindings;

pub use bindings::Bindings;

pub use scriptbind_core::*;
pub use scriptbind_macros::NativeClass;
pub use scriptbind_registry::*;
