//! Overload sets and explicit signatures.
//!
//! A script name can only refer to one native member. When several native
//! members compete for a name, collect them in an [`Overloads`] set and
//! pick one with a [`Signature`] at bind time:
//!
//! ```ignore
//! let hits = Overloads::<Monster>::new("hit")
//!     .method_mut(|m: &mut Monster, dmg: u32| m.hit(dmg))
//!     .method_mut(|m: &mut Monster, dmg: f64| m.hit_scaled(dmg));
//!
//! builder.overload(
//!     hits,
//!     Some(Signature::method_mut::<Monster, (f64,), ()>()),
//!     Params::new().optional(0.5),
//! )?;
//! ```

use std::fmt;
use std::marker::PhantomData;

use scriptbind_core::{
    ArgTuple, ArgumentList, IntoValue, Method, MethodMut, NativeClass, NativeFn, ParamType, Params, RegistrationError,
    ScriptType, TypeHash,
};

use crate::entry::{method_entry, method_mut_entry};

/// Receiver, parameter and return types of a native member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub receiver: ParamType,
    pub params: Vec<ParamType>,
    pub ret: ParamType,
    /// Whether the receiver is borrowed exclusively
    pub is_mut: bool,
}

impl Signature {
    /// A member taking `&T`.
    pub fn method<T: NativeClass, Args: ArgTuple, Ret: ScriptType>() -> Self {
        Self {
            receiver: ParamType::of::<T>(),
            params: Args::param_types(),
            ret: ParamType::of::<Ret>(),
            is_mut: false,
        }
    }

    /// A member taking `&mut T`.
    pub fn method_mut<T: NativeClass, Args: ArgTuple, Ret: ScriptType>() -> Self {
        Self {
            is_mut: true,
            ..Self::method::<T, Args, Ret>()
        }
    }

    /// Hash identifying the member bound under `name` with this signature.
    pub fn member_hash(&self, name: &str) -> TypeHash {
        let params: Vec<TypeHash> = self.params.iter().map(|p| p.hash).collect();
        TypeHash::from_method(self.receiver.hash, name, &params, self.is_mut)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let receiver = if self.is_mut { "&mut " } else { "&" };
        write!(f, "fn({receiver}{}", self.receiver)?;
        for param in &self.params {
            write!(f, ", {param}")?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

type MakeEntry = Box<dyn FnOnce(TypeHash, ArgumentList) -> NativeFn>;
type ResolveParams = fn(&str, &Params) -> Result<ArgumentList, RegistrationError>;

pub(crate) struct Candidate {
    pub(crate) signature: Signature,
    pub(crate) resolve: ResolveParams,
    pub(crate) make: MakeEntry,
}

/// Native members competing for one script name.
pub struct Overloads<T> {
    name: String,
    candidates: Vec<Candidate>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: NativeClass> Overloads<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidates: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Add a candidate taking `&T`.
    pub fn method<F, Args, Ret>(mut self, f: F) -> Self
    where
        F: Method<T, Args, Ret>,
        Args: ArgTuple,
        Ret: IntoValue,
    {
        self.candidates.push(Candidate {
            signature: Signature::method::<T, Args, Ret>(),
            resolve: Args::argument_list,
            make: Box::new(move |id, list| method_entry::<T, Args, Ret, F>(id, list, f)),
        });
        self
    }

    /// Add a candidate taking `&mut T`.
    pub fn method_mut<F, Args, Ret>(mut self, f: F) -> Self
    where
        F: MethodMut<T, Args, Ret>,
        Args: ArgTuple,
        Ret: IntoValue,
    {
        self.candidates.push(Candidate {
            signature: Signature::method_mut::<T, Args, Ret>(),
            resolve: Args::argument_list,
            make: Box::new(move |id, list| method_mut_entry::<T, Args, Ret, F>(id, list, f)),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Signatures of every candidate, in insertion order.
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.candidates.iter().map(|c| &c.signature)
    }

    /// Pick the one candidate `signature` names.
    ///
    /// Without a signature the set must hold exactly one candidate.
    pub(crate) fn select(self, signature: Option<&Signature>) -> Result<(String, Candidate), RegistrationError> {
        let Self { name, candidates, .. } = self;
        let mut matching: Vec<Candidate> = match signature {
            Some(wanted) => candidates.into_iter().filter(|c| &c.signature == wanted).collect(),
            None => candidates,
        };

        match matching.len() {
            1 => {
                let candidate = matching.remove(0);
                Ok((name, candidate))
            }
            0 => Err(RegistrationError::NoMatchingOverload {
                member: name,
                signature: signature.map_or_else(|| "<none>".to_owned(), Signature::to_string),
            }),
            candidates => Err(RegistrationError::AmbiguousOverload { member: name, candidates }),
        }
    }
}

impl<T> fmt::Debug for Overloads<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overloads")
            .field("name", &self.name)
            .field("candidates", &self.candidates.len())
            .finish()
    }
}
