//! Deterministic hash-based identity for script-visible types and members.
//!
//! [`TypeHash`] names a type by its script name and a member by its owner,
//! name and ordered parameter types. Two native overloads bound under the
//! same script name therefore hash differently, which is what the overload
//! selector keys on.
//!
//! Native type *identity* (the thing that decides whether an instance may be
//! unwrapped as `T`) is `std::any::TypeId`, not this hash: two Rust types
//! sharing a script name must never be confused.
//!
//! ```
//! use scriptbind_core::TypeHash;
//!
//! let a = TypeHash::from_name("int");
//! assert_eq!(a, TypeHash::from_name("int"));
//!
//! let owner = TypeHash::from_name("Monster");
//! let by_int = TypeHash::from_method(owner, "hit", &[a], false);
//! let by_float = TypeHash::from_method(owner, "hit", &[TypeHash::from_name("float")], false);
//! assert_ne!(by_int, by_float);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants.
pub mod hash_constants {
    /// Separator constant for sequence mixing
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for instance method hashes
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for constructor hashes
    pub const CONSTRUCTOR: u64 = 0x9a7f3d5e2b8c4601;

    /// Marker folded into a type hash to form its nullable (`Option<T>`) variant
    pub const NULLABLE: u64 = 0x5ea77ffbcdf5f302;

    /// Per-position parameter markers so `(int, float)` and `(float, int)` differ.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a script type or bound member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Hash a script type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash a method from its owner, script name, ordered parameter types and
    /// receiver mutability.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, param_hashes: &[TypeHash], is_mut: bool) -> Self {
        let seed = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0) ^ u64::from(is_mut);
        TypeHash(mix_params(seed, param_hashes))
    }

    /// Hash a constructor from its owner and ordered parameter types.
    #[inline]
    pub fn from_constructor(owner: TypeHash, param_hashes: &[TypeHash]) -> Self {
        TypeHash(mix_params(hash_constants::CONSTRUCTOR ^ owner.0, param_hashes))
    }

    /// The nullable variant of this type.
    #[inline]
    pub const fn nullable(self) -> Self {
        TypeHash(self.0 ^ hash_constants::NULLABLE)
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

fn mix_params(mut hash: u64, param_hashes: &[TypeHash]) -> u64 {
    for (i, param) in param_hashes.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps the fold order-sensitive
        hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ param.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
