//! ClassRegistry - native type identity to binding record.
//!
//! Keyed by `TypeId`, so two Rust types are never confused even if they
//! are registered under the same script name. The registry is written
//! during setup only and is owned by whoever drives the bindings; there is
//! no global state.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ClassRegistry::new();
//! registry.register::<Monster, _>(&mut vm, "Monster", None, allocator)?;
//!
//! let info = registry.lookup::<Monster>()?;
//! assert_eq!(info.name, "Monster");
//! ```

use std::any::{TypeId, type_name};
use std::fmt;

use rustc_hash::FxHashMap;
use scriptbind_core::{NativeClass, NativeFn, RegistrationError};

use crate::{ClassBuilder, ClassInfo, HostVm, finalize_instance};

/// Registry of wrapped native classes.
pub struct ClassRegistry<C> {
    classes: FxHashMap<TypeId, ClassInfo<C>>,
}

impl<C: Copy + Eq + fmt::Debug> ClassRegistry<C> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            classes: FxHashMap::default(),
        }
    }

    /// Declare `T` to the VM and record it.
    ///
    /// Installs `allocator` and the default finalizer as the class's
    /// lifecycle hooks. Fails with `DuplicateType` if `T` is already
    /// registered; in that case the VM is not touched.
    pub fn register<T, V>(
        &mut self,
        vm: &mut V,
        name: &str,
        scope: Option<C>,
        allocator: NativeFn,
    ) -> Result<&mut ClassInfo<C>, RegistrationError>
    where
        T: NativeClass,
        V: HostVm<Class = C>,
    {
        let type_id = TypeId::of::<T>();
        if self.classes.contains_key(&type_id) {
            return Err(RegistrationError::DuplicateType(name.to_owned()));
        }

        let vm_class = vm.define_class(name, scope);
        vm.set_lifecycle(vm_class, allocator.clone(), finalize_instance);
        tracing::debug!(class = name, native = type_name::<T>(), ?vm_class, "registered class");

        let info = ClassInfo::new(
            type_id,
            T::type_hash(),
            name.to_owned(),
            type_name::<T>(),
            vm_class,
            scope,
            allocator,
            finalize_instance,
        );
        Ok(self.classes.entry(type_id).or_insert(info))
    }

    /// Look up the record of `T`.
    pub fn lookup<T: NativeClass>(&self) -> Result<&ClassInfo<C>, RegistrationError> {
        self.classes
            .get(&TypeId::of::<T>())
            .ok_or_else(|| RegistrationError::TypeNotFound(type_name::<T>().to_owned()))
    }

    /// Look up the record of `T` for modification.
    pub fn lookup_mut<T: NativeClass>(&mut self) -> Result<&mut ClassInfo<C>, RegistrationError> {
        self.classes
            .get_mut(&TypeId::of::<T>())
            .ok_or_else(|| RegistrationError::TypeNotFound(type_name::<T>().to_owned()))
    }

    /// A builder binding members of the registered type `T`.
    pub fn builder<'a, T, V>(&'a mut self, vm: &'a mut V) -> Result<ClassBuilder<'a, T, V>, RegistrationError>
    where
        T: NativeClass,
        V: HostVm<Class = C>,
    {
        let info = self.lookup_mut::<T>()?;
        Ok(ClassBuilder::new(vm, info))
    }

    pub fn contains<T: NativeClass>(&self) -> bool {
        self.classes.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo<C>> {
        self.classes.values()
    }
}

impl<C: Copy + Eq + fmt::Debug> Default for ClassRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ClassRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("class_count", &self.classes.len())
            .finish()
    }
}
