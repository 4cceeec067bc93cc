//! Script-visible type identity.
//!
//! [`ScriptType`] is implemented by every type that may appear in a bound
//! signature: the primitives below, `Option<T>`, raw [`Value`] passthrough,
//! and native classes (usually via `#[derive(NativeClass)]`). It carries the
//! script name used in error messages, the [`TypeHash`] used for overload
//! selection, and the [`TypeKind`] used for bind-time validation.
//!
//! Types without an implementation (raw pointers, borrowed references)
//! cannot be named in an automatic binding at all; the compiler rejects
//! them before any entry point exists.

use std::ffi::CString;
use std::fmt;

use crate::{TypeHash, Value};

/// Shape of a script-visible type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// No value (`()` return)
    Void,
    Bool,
    Int,
    Float,
    /// Strings and characters
    Str,
    /// A registered native class
    Instance,
    /// Raw [`Value`] passthrough
    Any,
}

/// Trait for types that can appear in a bound signature.
///
/// # Example
///
/// ```
/// use scriptbind_core::{NativeClass, ScriptType, TypeKind};
///
/// #[derive(Default)]
/// struct Monster {
///     hp: u32,
/// }
///
/// impl ScriptType for Monster {
///     const KIND: TypeKind = TypeKind::Instance;
///
///     fn type_name() -> &'static str {
///         "Monster"
///     }
/// }
///
/// impl NativeClass for Monster {}
/// ```
pub trait ScriptType: 'static {
    /// The shape of this type.
    const KIND: TypeKind;

    /// The script-facing type name.
    fn type_name() -> &'static str;

    /// The hash identifying this type in signatures.
    fn type_hash() -> TypeHash {
        TypeHash::from_name(Self::type_name())
    }
}

/// Marker for native types that can be wrapped as VM instances.
///
/// The instance table stores implementors as `Box<dyn Any>` and checks the
/// stored `TypeId` on every unwrap.
pub trait NativeClass: ScriptType + Sized {}

/// A parameter or return type, erased for storage in descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamType {
    pub hash: TypeHash,
    pub name: &'static str,
    pub kind: TypeKind,
}

impl ParamType {
    /// Describe `T`.
    pub fn of<T: ScriptType>() -> Self {
        Self {
            hash: T::type_hash(),
            name: T::type_name(),
            kind: T::KIND,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

macro_rules! impl_script_type {
    ($($ty:ty => $kind:ident, $name:literal;)*) => {
        $(
            impl ScriptType for $ty {
                const KIND: TypeKind = TypeKind::$kind;

                fn type_name() -> &'static str {
                    $name
                }
            }
        )*
    };
}

impl_script_type! {
    () => Void, "void";
    bool => Bool, "bool";
    i8 => Int, "int8";
    i16 => Int, "int16";
    i32 => Int, "int";
    i64 => Int, "int64";
    isize => Int, "isize";
    u8 => Int, "uint8";
    u16 => Int, "uint16";
    u32 => Int, "uint";
    u64 => Int, "uint64";
    usize => Int, "usize";
    f32 => Float, "float";
    f64 => Float, "double";
    char => Str, "char";
    String => Str, "string";
    &'static str => Str, "string";
    CString => Str, "cstring";
    Value => Any, "any";
}

impl<T: ScriptType> ScriptType for Option<T> {
    const KIND: TypeKind = T::KIND;

    fn type_name() -> &'static str {
        T::type_name()
    }

    fn type_hash() -> TypeHash {
        T::type_hash().nullable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names() {
        assert_eq!(i32::type_name(), "int");
        assert_eq!(u32::type_name(), "uint");
        assert_eq!(f64::type_name(), "double");
        assert_eq!(<()>::type_name(), "void");
    }

    #[test]
    fn primitive_hashes_are_distinct() {
        let hashes = [
            i8::type_hash(),
            i16::type_hash(),
            i32::type_hash(),
            i64::type_hash(),
            u8::type_hash(),
            u16::type_hash(),
            u32::type_hash(),
            u64::type_hash(),
            f32::type_hash(),
            f64::type_hash(),
            bool::type_hash(),
            String::type_hash(),
        ];
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn option_shares_name_but_not_hash() {
        assert_eq!(<Option<i32>>::type_name(), "int");
        assert_ne!(<Option<i32>>::type_hash(), i32::type_hash());
        assert_eq!(<Option<i32>>::KIND, TypeKind::Int);
    }

    #[test]
    fn param_type_of() {
        let param = ParamType::of::<u8>();
        assert_eq!(param.name, "uint8");
        assert_eq!(param.kind, TypeKind::Int);
        assert_eq!(param.to_string(), "uint8");
    }
}
