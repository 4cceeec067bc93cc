//! Per-class binding records.

use std::any::TypeId;
use std::fmt;

use rustc_hash::FxHashMap;
use scriptbind_core::{NativeFn, RegistrationError, TypeHash};

use crate::Finalizer;

/// What a bound member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Constructor,
    Method,
    Getter,
    Setter,
    /// Hand-written entry point
    Raw,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberKind::Constructor => "constructor",
            MemberKind::Method => "method",
            MemberKind::Getter => "getter",
            MemberKind::Setter => "setter",
            MemberKind::Raw => "raw method",
        })
    }
}

/// A member bound on a class.
#[derive(Debug, Clone)]
pub struct MemberEntry {
    /// Script-side name
    pub name: String,
    pub kind: MemberKind,
    /// Signature hash of the native member
    pub signature: TypeHash,
    /// Minimum argument count
    pub required: usize,
    /// Maximum argument count; `None` for raw entries
    pub max: Option<usize>,
    pub entry: NativeFn,
}

/// Everything known about one registered native type.
#[derive(Debug)]
pub struct ClassInfo<C> {
    pub type_id: TypeId,
    pub type_hash: TypeHash,
    /// Script-side class name
    pub name: String,
    /// Rust type name, for diagnostics
    pub native_name: &'static str,
    pub vm_class: C,
    /// Enclosing namespace the class was declared under
    pub scope: Option<C>,
    allocator: NativeFn,
    finalizer: Finalizer,
    constructor: Option<MemberEntry>,
    members: FxHashMap<String, MemberEntry>,
}

impl<C: Copy> ClassInfo<C> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        type_id: TypeId,
        type_hash: TypeHash,
        name: String,
        native_name: &'static str,
        vm_class: C,
        scope: Option<C>,
        allocator: NativeFn,
        finalizer: Finalizer,
    ) -> Self {
        Self {
            type_id,
            type_hash,
            name,
            native_name,
            vm_class,
            scope,
            allocator,
            finalizer,
            constructor: None,
            members: FxHashMap::default(),
        }
    }

    /// The current allocation hook.
    pub fn allocator(&self) -> &NativeFn {
        &self.allocator
    }

    pub fn finalizer(&self) -> Finalizer {
        self.finalizer
    }

    /// The bound constructor, if any.
    pub fn constructor(&self) -> Option<&MemberEntry> {
        self.constructor.as_ref()
    }

    pub fn member(&self, name: &str) -> Option<&MemberEntry> {
        self.members.get(name)
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberEntry> {
        self.members.values()
    }

    pub(crate) fn add_member(&mut self, entry: MemberEntry) -> Result<(), RegistrationError> {
        if let Some(existing) = self.members.get(&entry.name) {
            return Err(RegistrationError::DuplicateRegistration {
                name: entry.name,
                kind: existing.kind.to_string(),
            });
        }
        self.members.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Replace the allocation hook with a bound constructor.
    pub(crate) fn set_constructor(&mut self, entry: MemberEntry) -> Result<(), RegistrationError> {
        if let Some(existing) = &self.constructor {
            return Err(RegistrationError::DuplicateRegistration {
                name: existing.name.clone(),
                kind: MemberKind::Constructor.to_string(),
            });
        }
        self.allocator = entry.entry.clone();
        self.constructor = Some(entry);
        Ok(())
    }
}
