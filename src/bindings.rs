//! Bindings - class registry and instance table owned together.

use std::fmt;

use scriptbind_core::{
    CallContext, CallError, ConversionError, InstanceTable, NativeCallable, NativeClass, NativeFn, RegistrationError,
    TypeHash, Value, instance_into_value,
};
use scriptbind_registry::{ClassBuilder, ClassInfo, ClassRegistry, HostVm};

/// Everything the binding layer keeps for one VM.
///
/// `C` is the VM's class handle type ([`HostVm::Class`]). There is no
/// global state: the embedding code owns a `Bindings` next to its VM and
/// passes the instance table into every call frame.
///
/// # Example
///
/// ```ignore
/// let mut bindings = Bindings::new();
/// bindings
///     .register_class::<Monster, _>(&mut vm, "Monster", None)?
///     .constructor_with(Params::new().optional(0), Monster::of_kind)?
///     .method_mut("apply_damage", Monster::apply_damage)?
///     .fields()?;
/// ```
pub struct Bindings<C> {
    registry: ClassRegistry<C>,
    instances: InstanceTable,
}

impl<C: Copy + Eq + fmt::Debug> Bindings<C> {
    pub fn new() -> Self {
        Self {
            registry: ClassRegistry::new(),
            instances: InstanceTable::new(),
        }
    }

    /// Register `T` under `name` inside `scope`, allocating instances with
    /// `T::default()` until a constructor is bound.
    ///
    /// `scope` is the enclosing namespace handle; `None` declares the class
    /// at top level. It does not make the new class a subclass.
    pub fn register_class<'a, T, V>(
        &'a mut self,
        vm: &'a mut V,
        name: &str,
        scope: Option<C>,
    ) -> Result<ClassBuilder<'a, T, V>, RegistrationError>
    where
        T: NativeClass + Default,
        V: HostVm<Class = C>,
    {
        let allocator = NativeFn::new(
            TypeHash::from_constructor(T::type_hash(), &[]),
            |ctx: &mut CallContext| -> Result<(), CallError> {
                ctx.args::<()>()?;
                let handle = ctx.instances_mut().insert(T::default());
                ctx.set_return_value(Value::Instance(handle));
                Ok(())
            },
        );
        self.registry.register::<T, V>(vm, name, scope, allocator)?;
        self.registry.builder::<T, V>(vm)
    }

    /// Register `T` without a default allocation.
    ///
    /// Instantiating the class fails with [`CallError::NoConstructor`]
    /// until a constructor is bound.
    pub fn declare_class<'a, T, V>(
        &'a mut self,
        vm: &'a mut V,
        name: &str,
        scope: Option<C>,
    ) -> Result<ClassBuilder<'a, T, V>, RegistrationError>
    where
        T: NativeClass,
        V: HostVm<Class = C>,
    {
        let class = name.to_owned();
        let allocator = NativeFn::new(
            TypeHash::from_constructor(T::type_hash(), &[]),
            move |_: &mut CallContext| -> Result<(), CallError> {
                Err(CallError::NoConstructor { class: class.clone() })
            },
        );
        self.registry.register::<T, V>(vm, name, scope, allocator)?;
        self.registry.builder::<T, V>(vm)
    }

    /// Builder for an already registered `T`.
    pub fn class<'a, T, V>(&'a mut self, vm: &'a mut V) -> Result<ClassBuilder<'a, T, V>, RegistrationError>
    where
        T: NativeClass,
        V: HostVm<Class = C>,
    {
        self.registry.builder::<T, V>(vm)
    }

    /// The registry record of `T`.
    pub fn class_info<T: NativeClass>(&self) -> Result<&ClassInfo<C>, RegistrationError> {
        self.registry.lookup::<T>()
    }

    /// Bind a hand-written entry point on `T`.
    pub fn define_raw<T, V, F>(&mut self, vm: &mut V, name: &str, required: usize, f: F) -> Result<(), RegistrationError>
    where
        T: NativeClass,
        V: HostVm<Class = C>,
        F: NativeCallable + Send + Sync + 'static,
    {
        self.class::<T, V>(vm)?.raw(name, required, f)?;
        Ok(())
    }

    /// Borrow the native instance a VM value wraps.
    pub fn unwrap<T: NativeClass>(&self, value: &Value) -> Result<&T, ConversionError> {
        self.instances.resolve(value)
    }

    /// Mutably borrow the native instance a VM value wraps.
    pub fn unwrap_mut<T: NativeClass>(&mut self, value: &Value) -> Result<&mut T, ConversionError> {
        match value {
            Value::Instance(handle) => self.instances.get_mut(*handle),
            Value::Nil => Err(ConversionError::NullInstance {
                target_type: T::type_name(),
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: T::type_name(),
                actual: other.type_name(),
            }),
        }
    }

    /// Wrap `native` and store it in the instance variable `name` of the
    /// script object `object`.
    ///
    /// `T` must be registered; the VM tags the stored value with its class
    /// so the wrapped instance is finalized like any other. Returns the
    /// stored value.
    pub fn set_instance_variable<T, V>(
        &mut self,
        vm: &mut V,
        object: &Value,
        name: &str,
        native: T,
    ) -> Result<Value, RegistrationError>
    where
        T: NativeClass,
        V: HostVm<Class = C>,
    {
        let class = self.registry.lookup::<T>()?.vm_class;
        let value = instance_into_value(native, &mut self.instances);
        tracing::debug!(variable = name, class = T::type_name(), "stored instance variable");
        vm.set_instance_variable(object, name, class, value.clone());
        Ok(value)
    }

    /// Borrow the native instance held in the instance variable `name` of
    /// `object`. An unset variable reads as nil and fails with
    /// `NullInstance`.
    pub fn instance_variable<T, V>(&self, vm: &V, object: &Value, name: &str) -> Result<&T, ConversionError>
    where
        T: NativeClass,
        V: HostVm<Class = C>,
    {
        self.instances.resolve(&vm.instance_variable(object, name))
    }

    pub fn registry(&self) -> &ClassRegistry<C> {
        &self.registry
    }

    pub fn instances(&self) -> &InstanceTable {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut InstanceTable {
        &mut self.instances
    }
}

impl<C: Copy + Eq + fmt::Debug> Default for Bindings<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Bindings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("registry", &self.registry)
            .field("instances", &self.instances)
            .finish()
    }
}
