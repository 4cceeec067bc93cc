//! Entry point synthesis shared by the builder and overload sets.

use scriptbind_core::{
    ArgTuple, ArgumentList, CallContext, CallError, Constructor, IntoValue, Method, MethodMut, NativeClass, NativeFn,
    TypeHash, Value,
};

/// Extract, construct, wrap.
pub(crate) fn constructor_entry<T, Args, F>(id: TypeHash, list: ArgumentList, f: F) -> NativeFn
where
    T: NativeClass,
    Args: ArgTuple,
    F: Constructor<Args, T>,
{
    NativeFn::new(id, move |ctx: &mut CallContext| -> Result<(), CallError> {
        let args = Args::extract(ctx, &list)?;
        let instance = f.construct(args);
        let handle = ctx.instances_mut().insert(instance);
        ctx.set_return_value(Value::Instance(handle));
        Ok(())
    })
}

/// Unwrap receiver, extract, invoke, encode.
pub(crate) fn method_entry<T, Args, Ret, F>(id: TypeHash, list: ArgumentList, f: F) -> NativeFn
where
    T: NativeClass,
    Args: ArgTuple,
    Ret: IntoValue,
    F: Method<T, Args, Ret>,
{
    NativeFn::new(id, move |ctx: &mut CallContext| -> Result<(), CallError> {
        let this = ctx.this::<T>()?;
        let args = Args::extract(ctx, &list)?;
        let ret = f.invoke(this, args);
        ctx.set_return(ret)
    })
}

/// As [`method_entry`], with the receiver borrowed exclusively for the call.
pub(crate) fn method_mut_entry<T, Args, Ret, F>(id: TypeHash, list: ArgumentList, f: F) -> NativeFn
where
    T: NativeClass,
    Args: ArgTuple,
    Ret: IntoValue,
    F: MethodMut<T, Args, Ret>,
{
    NativeFn::new(id, move |ctx: &mut CallContext| -> Result<(), CallError> {
        ctx.this::<T>()?;
        let args = Args::extract(ctx, &list)?;
        let ret = f.invoke_mut(ctx.this_mut::<T>()?, args);
        ctx.set_return(ret)
    })
}
