//! ClassBuilder for binding members of a registered native type.
//!
//! Every binder validates its declaration first and only then hands the
//! synthesised entry point to the VM, so a rejected binding never becomes
//! callable.
//!
//! # Example
//!
//! ```ignore
//! bindings
//!     .register_class::<Monster, _>(&mut vm, "Monster", None)?
//!     .constructor_with(Params::new().optional(0), Monster::new)?
//!     .method("hp", |m: &Monster| m.hp)?
//!     .method_mut("apply_damage", |m: &mut Monster, dmg: u32| m.apply_damage(dmg))?
//!     .property("name", |m: &Monster| m.name.clone(), |m: &mut Monster, v: String| m.name = v)?;
//! ```

use std::marker::PhantomData;

use scriptbind_core::{
    ArgTuple, ArgumentList, CallContext, CallError, Constructor, FromValue, IntoValue, Method, MethodMut, NativeCallable,
    NativeClass, NativeFn, ParamType, Params, RegistrationError, TypeHash, Value,
};

use crate::entry::{constructor_entry, method_entry, method_mut_entry};
use crate::{ClassInfo, HostVm, MemberEntry, MemberKind, Overloads, Signature};

/// Field accessors generated by `#[derive(NativeClass)]`.
pub trait ScriptFields: NativeClass {
    /// Bind a getter and/or setter for every exposed field.
    fn bind_fields<'a, V: HostVm>(builder: ClassBuilder<'a, Self, V>)
    -> Result<ClassBuilder<'a, Self, V>, RegistrationError>;
}

/// Builder binding constructors, methods and accessors of `T`.
///
/// Obtained from the registry (or `Bindings`) once `T` is registered.
pub struct ClassBuilder<'a, T: NativeClass, V: HostVm> {
    vm: &'a mut V,
    info: &'a mut ClassInfo<V::Class>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: NativeClass, V: HostVm> ClassBuilder<'a, T, V> {
    pub(crate) fn new(vm: &'a mut V, info: &'a mut ClassInfo<V::Class>) -> Self {
        Self {
            vm,
            info,
            _marker: PhantomData,
        }
    }

    /// The record of the class being built.
    pub fn info(&self) -> &ClassInfo<V::Class> {
        self.info
    }

    /// Bind a constructor whose parameters are all required.
    pub fn constructor<F, Args>(self, f: F) -> Result<Self, RegistrationError>
    where
        F: Constructor<Args, T>,
        Args: ArgTuple,
    {
        self.constructor_with(Params::required_count(Args::ARITY), f)
    }

    /// Bind a constructor with declared parameters.
    ///
    /// Replaces the class's allocation hook. Binding a second constructor
    /// fails with `DuplicateRegistration`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// builder.constructor_with(Params::new().optional(0), |kind: i32| Monster::of_kind(kind))?;
    /// ```
    pub fn constructor_with<F, Args>(mut self, params: Params, f: F) -> Result<Self, RegistrationError>
    where
        F: Constructor<Args, T>,
        Args: ArgTuple,
    {
        let list = Args::argument_list("new", &params)?;
        let hashes: Vec<TypeHash> = list.descriptors().iter().map(|d| d.ty.hash).collect();
        let signature = TypeHash::from_constructor(T::type_hash(), &hashes);
        let (required, max) = (list.required(), list.arity());
        let entry = constructor_entry::<T, Args, F>(signature, list, f);

        self.info.set_constructor(MemberEntry {
            name: "new".to_owned(),
            kind: MemberKind::Constructor,
            signature,
            required,
            max: Some(max),
            entry: entry.clone(),
        })?;
        self.vm.set_lifecycle(self.info.vm_class, entry, self.info.finalizer());
        tracing::debug!(class = %self.info.name, required, max, "bound constructor");
        Ok(self)
    }

    /// Bind a method taking `&T` whose parameters are all required.
    pub fn method<F, Args, Ret>(self, name: &str, f: F) -> Result<Self, RegistrationError>
    where
        F: Method<T, Args, Ret>,
        Args: ArgTuple,
        Ret: IntoValue,
    {
        self.method_with(name, Params::required_count(Args::ARITY), f)
    }

    /// Bind a method taking `&T` with declared parameters.
    pub fn method_with<F, Args, Ret>(mut self, name: &str, params: Params, f: F) -> Result<Self, RegistrationError>
    where
        F: Method<T, Args, Ret>,
        Args: ArgTuple,
        Ret: IntoValue,
    {
        let list = Args::argument_list(name, &params)?;
        let signature = Signature::method::<T, Args, Ret>().member_hash(name);
        let (required, max) = (list.required(), list.arity());
        let entry = method_entry::<T, Args, Ret, F>(signature, list, f);
        self.bind(name, MemberKind::Method, signature, required, Some(max), entry)?;
        Ok(self)
    }

    /// Bind a method taking `&mut T` whose parameters are all required.
    pub fn method_mut<F, Args, Ret>(self, name: &str, f: F) -> Result<Self, RegistrationError>
    where
        F: MethodMut<T, Args, Ret>,
        Args: ArgTuple,
        Ret: IntoValue,
    {
        self.method_mut_with(name, Params::required_count(Args::ARITY), f)
    }

    /// Bind a method taking `&mut T` with declared parameters.
    pub fn method_mut_with<F, Args, Ret>(mut self, name: &str, params: Params, f: F) -> Result<Self, RegistrationError>
    where
        F: MethodMut<T, Args, Ret>,
        Args: ArgTuple,
        Ret: IntoValue,
    {
        let list = Args::argument_list(name, &params)?;
        let signature = Signature::method_mut::<T, Args, Ret>().member_hash(name);
        let (required, max) = (list.required(), list.arity());
        let entry = method_mut_entry::<T, Args, Ret, F>(signature, list, f);
        self.bind(name, MemberKind::Method, signature, required, Some(max), entry)?;
        Ok(self)
    }

    /// Bind a nullary reader under `name`.
    pub fn getter<F, R>(mut self, name: &str, f: F) -> Result<Self, RegistrationError>
    where
        F: Method<T, (), R>,
        R: IntoValue,
    {
        let signature = Signature::method::<T, (), R>().member_hash(name);
        let entry = method_entry::<T, (), R, F>(signature, ArgumentList::default(), f);
        self.bind(name, MemberKind::Getter, signature, 0, Some(0), entry)?;
        Ok(self)
    }

    /// Bind a unary writer for `name`; the script-side name comes from
    /// [`HostVm::setter_name`]. The entry returns nil.
    pub fn setter<F, A>(mut self, name: &str, f: F) -> Result<Self, RegistrationError>
    where
        F: MethodMut<T, (A,), ()>,
        A: FromValue,
    {
        let script_name = self.vm.setter_name(name);
        let list = ArgumentList::required_only(&[ParamType::of::<A>()]);
        let signature = Signature::method_mut::<T, (A,), ()>().member_hash(&script_name);
        let entry = method_mut_entry::<T, (A,), (), F>(signature, list, f);
        self.bind(&script_name, MemberKind::Setter, signature, 1, Some(1), entry)?;
        Ok(self)
    }

    /// Bind a getter and a setter for `name`.
    pub fn property<A, G, S>(self, name: &str, get: G, set: S) -> Result<Self, RegistrationError>
    where
        A: FromValue + IntoValue,
        G: Method<T, (), A>,
        S: MethodMut<T, (A,), ()>,
    {
        self.getter(name, get)?.setter(name, set)
    }

    /// Bind the accessors generated for `#[script(get, set)]` fields.
    pub fn fields(self) -> Result<Self, RegistrationError>
    where
        T: ScriptFields,
    {
        T::bind_fields(self)
    }

    /// Bind the member of `set` selected by `signature`.
    ///
    /// Without a signature the set must hold a single candidate; otherwise
    /// this fails with `AmbiguousOverload`. A signature matching no
    /// candidate fails with `NoMatchingOverload`.
    pub fn overload(
        mut self,
        set: Overloads<T>,
        signature: Option<Signature>,
        params: Params,
    ) -> Result<Self, RegistrationError> {
        let (name, candidate) = set.select(signature.as_ref())?;
        let list = (candidate.resolve)(&name, &params)?;
        let hash = candidate.signature.member_hash(&name);
        let (required, max) = (list.required(), list.arity());
        let entry = (candidate.make)(hash, list);
        self.bind(&name, MemberKind::Method, hash, required, Some(max), entry)?;
        Ok(self)
    }

    /// Bind a hand-written entry point.
    ///
    /// `required` is passed to the VM as the minimum argument count; the
    /// entry does its own argument handling through the [`CallContext`].
    pub fn raw<F>(mut self, name: &str, required: usize, f: F) -> Result<Self, RegistrationError>
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        let signature = TypeHash::from_method(T::type_hash(), name, &[], true);
        self.bind(name, MemberKind::Raw, signature, required, None, NativeFn::new(signature, f))?;
        Ok(self)
    }

    /// Bind `name` as a method returning a fresh wrapped copy of the receiver.
    pub fn clone_method(mut self, name: &str) -> Result<Self, RegistrationError>
    where
        T: Clone,
    {
        let signature = Signature::method::<T, (), T>().member_hash(name);
        let entry = NativeFn::new(signature, |ctx: &mut CallContext| -> Result<(), CallError> {
            ctx.args::<()>()?;
            let copy = ctx.this::<T>()?.clone();
            let handle = ctx.instances_mut().insert(copy);
            ctx.set_return_value(Value::Instance(handle));
            Ok(())
        });
        self.bind(name, MemberKind::Method, signature, 0, Some(0), entry)?;
        Ok(self)
    }

    fn bind(
        &mut self,
        name: &str,
        kind: MemberKind,
        signature: TypeHash,
        required: usize,
        max: Option<usize>,
        entry: NativeFn,
    ) -> Result<(), RegistrationError> {
        self.info.add_member(MemberEntry {
            name: name.to_owned(),
            kind,
            signature,
            required,
            max,
            entry: entry.clone(),
        })?;
        self.vm.define_method(self.info.vm_class, name, required, entry);
        tracing::debug!(class = %self.info.name, member = name, %kind, required, ?max, "bound member");
        Ok(())
    }
}
