//! Derive macro for scriptbind native classes.
//!
//! # Example
//!
//! ```ignore
//! use scriptbind::NativeClass;
//!
//! #[derive(Default, Clone, NativeClass)]
//! #[script(name = "Monster", value)]
//! pub struct Monster {
//!     #[script(get, set)]
//!     pub hp: u32,
//!
//!     #[script(get, name = "attack")]
//!     pub atk: u32,
//! }
//! ```

use proc_macro::TokenStream;

mod attrs;
mod derive_native_class;

/// Derive `ScriptType`, `NativeClass`, the instance codec and
/// `ScriptFields` for a type.
///
/// # Attributes
///
/// - `#[script(name = "...")]` - Script-side class name
/// - `#[script(value)]` - Accept instances by value (implements `FromValue`; requires `Clone`)
///
/// # Field Attributes
///
/// - `#[script(get)]` - Bind a getter (requires the field type to be `Clone`)
/// - `#[script(set)]` - Bind a setter
/// - `#[script(name = "...")]` - Script-side accessor name
#[proc_macro_derive(NativeClass, attributes(script))]
pub fn derive_native_class(input: TokenStream) -> TokenStream {
    derive_native_class::derive_native_class_impl(input)
}
