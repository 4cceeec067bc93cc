//! Argument extraction into typed tuples.
//!
//! [`ArgTuple`] is implemented for tuples of up to eight [`FromValue`]
//! types. Given a call with A arguments against a list of N declared
//! parameters of which R are required, [`ArgTuple::extract`]:
//!
//! 1. fails with `ArgumentCount` if A < R or A > N,
//! 2. converts argument i for every i < A,
//! 3. converts the declared default for every i in [A, N).
//!
//! The result is the tuple in declared order, ready to be spread into the
//! native call.

use crate::{ArgumentList, CallContext, CallError, FromValue, InstanceTable, ParamType, Params, RegistrationError};

/// A tuple of native parameter types.
pub trait ArgTuple: Sized {
    /// Number of parameters.
    const ARITY: usize;

    /// Descriptors for each element, in order.
    fn param_types() -> Vec<ParamType>;

    /// Convert exactly `ARITY` arguments, with no defaults.
    fn from_slots(ctx: &CallContext<'_>) -> Result<Self, CallError>;

    /// Convert arguments, filling omitted trailing parameters from `list`.
    fn extract(ctx: &CallContext<'_>, list: &ArgumentList) -> Result<Self, CallError>;

    /// Trial-convert every declared default to its parameter type.
    fn validate_defaults(member: &str, list: &ArgumentList) -> Result<(), RegistrationError>;

    /// Resolve `params` against this tuple and validate its defaults.
    fn argument_list(member: &str, params: &Params) -> Result<ArgumentList, RegistrationError> {
        let list = ArgumentList::resolve(member, &Self::param_types(), params)?;
        Self::validate_defaults(member, &list)?;
        Ok(list)
    }
}

#[cfg_attr(feature = "profiling", profiling::function)]
fn extract_one<T: FromValue>(ctx: &CallContext<'_>, list: &ArgumentList, index: usize) -> Result<T, CallError> {
    let value = if index < ctx.arg_count() {
        ctx.arg_slot(index)
    } else {
        list.default_at(index)
    };
    let value = value.ok_or(CallError::ArgumentCount {
        given: ctx.arg_count(),
        required: list.required(),
        max: list.arity(),
    })?;
    T::from_value(value, ctx.instances()).map_err(|source| CallError::Argument { index, source })
}

fn validate_one<T: FromValue>(
    member: &str,
    list: &ArgumentList,
    index: usize,
    scratch: &InstanceTable,
) -> Result<(), RegistrationError> {
    match list.default_at(index) {
        Some(default) => T::from_value(default, scratch)
            .map(drop)
            .map_err(|err| RegistrationError::InvalidDefault {
                member: member.to_owned(),
                index,
                reason: err.to_string(),
            }),
        None => Ok(()),
    }
}

macro_rules! impl_arg_tuple {
    ($arity:literal; $($T:ident $idx:tt),*) => {
        impl<$($T: FromValue),*> ArgTuple for ($($T,)*) {
            const ARITY: usize = $arity;

            fn param_types() -> Vec<ParamType> {
                vec![$(ParamType::of::<$T>()),*]
            }

            fn from_slots(ctx: &CallContext<'_>) -> Result<Self, CallError> {
                if ctx.arg_count() != $arity {
                    return Err(CallError::ArgumentCount {
                        given: ctx.arg_count(),
                        required: $arity,
                        max: $arity,
                    });
                }
                Ok(($(ctx.arg::<$T>($idx)?,)*))
            }

            #[allow(unused_variables)]
            fn extract(ctx: &CallContext<'_>, list: &ArgumentList) -> Result<Self, CallError> {
                list.check_count(ctx.arg_count())?;
                Ok(($(extract_one::<$T>(ctx, list, $idx)?,)*))
            }

            #[allow(unused_variables)]
            fn validate_defaults(member: &str, list: &ArgumentList) -> Result<(), RegistrationError> {
                let scratch = InstanceTable::new();
                $(validate_one::<$T>(member, list, $idx, &scratch)?;)*
                Ok(())
            }
        }
    };
}

impl_arg_tuple!(0;);
impl_arg_tuple!(1; A 0);
impl_arg_tuple!(2; A 0, B 1);
impl_arg_tuple!(3; A 0, B 1, C 2);
impl_arg_tuple!(4; A 0, B 1, C 2, D 3);
impl_arg_tuple!(5; A 0, B 1, C 2, D 3, E 4);
impl_arg_tuple!(6; A 0, B 1, C 2, D 3, E 4, F 5);
impl_arg_tuple!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_arg_tuple!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
