//! Native entry points and their execution context.
//!
//! A [`NativeFn`] is what the binding layer hands to the host VM for every
//! constructor, method and accessor. The VM calls it with a
//! [`CallContext`] over its argument slots; the entry point reads
//! arguments, runs native code and writes the return slot.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::args::ArgTuple;
use crate::{
    CallError, ConversionError, FromValue, InstanceHandle, InstanceTable, IntoValue, NativeClass, TypeHash, Value,
    ValueKind,
};

/// Type-erased native entry point.
///
/// The inner callable is shared through an `Arc` so the registry and the
/// VM can both hold the same entry.
pub struct NativeFn {
    /// Identity of the bound member (its signature hash)
    pub id: TypeHash,
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    /// Wrap a callable under the given member identity.
    pub fn new<F>(id: TypeHash, f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self { id, inner: Arc::new(f) }
    }

    /// Run the entry point.
    ///
    /// A panic inside native code is caught here and reported as
    /// [`CallError::Panic`]; unwinding never reaches the VM.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn call(&self, ctx: &mut CallContext) -> Result<(), CallError> {
        tracing::trace!(id = %self.id, args = ctx.arg_count(), "dispatch");
        match panic::catch_unwind(AssertUnwindSafe(|| self.inner.call(ctx))) {
            Ok(result) => result,
            Err(payload) => Err(CallError::Panic {
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Clone for NativeFn {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Trait for callable native entry points.
pub trait NativeCallable {
    /// Call this entry point with the given context.
    fn call(&self, ctx: &mut CallContext) -> Result<(), CallError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut CallContext) -> Result<(), CallError>,
{
    fn call(&self, ctx: &mut CallContext) -> Result<(), CallError> {
        (self)(ctx)
    }
}

/// Context for native entry point calls.
///
/// Bridges the VM's argument slots and the instance table. For methods,
/// slot 0 holds the receiver and `arg_offset` is 1.
pub struct CallContext<'vm> {
    slots: &'vm [Value],
    arg_offset: usize,
    return_slot: &'vm mut Value,
    instances: &'vm mut InstanceTable,
}

impl<'vm> CallContext<'vm> {
    /// Create a new call context.
    ///
    /// # Arguments
    ///
    /// * `slots` - The call frame (for methods, slot 0 is the receiver)
    /// * `arg_offset` - Offset to the first argument (0 for functions, 1 for methods)
    /// * `return_slot` - Where the return value is written
    /// * `instances` - Instance table for wrapped natives
    pub fn new(
        slots: &'vm [Value],
        arg_offset: usize,
        return_slot: &'vm mut Value,
        instances: &'vm mut InstanceTable,
    ) -> Self {
        Self {
            slots,
            arg_offset,
            return_slot,
            instances,
        }
    }

    /// Number of arguments, excluding the receiver.
    pub fn arg_count(&self) -> usize {
        self.slots.len().saturating_sub(self.arg_offset)
    }

    /// Raw argument slot.
    pub fn arg_slot(&self, index: usize) -> Option<&Value> {
        self.slots.get(self.arg_offset + index)
    }

    /// Runtime tag of an argument.
    pub fn arg_kind(&self, index: usize) -> Option<ValueKind> {
        self.arg_slot(index).map(Value::kind)
    }

    /// Convert a single argument.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T, CallError> {
        let value = self.arg_slot(index).ok_or(CallError::ArgumentCount {
            given: self.arg_count(),
            required: index + 1,
            max: index + 1,
        })?;
        T::from_value(value, self.instances).map_err(|source| CallError::Argument { index, source })
    }

    /// Borrow a string argument without copying it.
    pub fn arg_str(&self, index: usize) -> Result<&str, CallError> {
        let value = self.arg_slot(index).ok_or(CallError::ArgumentCount {
            given: self.arg_count(),
            required: index + 1,
            max: index + 1,
        })?;
        value.as_str().ok_or_else(|| CallError::Argument {
            index,
            source: ConversionError::TypeMismatch {
                expected: "string",
                actual: value.type_name(),
            },
        })
    }

    /// Convert all arguments into a tuple of exactly matching arity.
    ///
    /// No defaults apply: a call with any other argument count fails.
    pub fn args<A: ArgTuple>(&self) -> Result<A, CallError> {
        A::from_slots(self)
    }

    /// Handle of the receiver.
    pub fn this_handle(&self) -> Result<InstanceHandle, CallError> {
        match self.receiver() {
            Some(Value::Instance(handle)) => Ok(*handle),
            Some(other) => Err(CallError::Receiver(ConversionError::TypeMismatch {
                expected: "instance",
                actual: other.type_name(),
            })),
            None => Err(CallError::Receiver(ConversionError::NullInstance {
                target_type: "instance",
            })),
        }
    }

    /// Borrow the receiver as `T`.
    pub fn this<T: NativeClass>(&self) -> Result<&T, CallError> {
        let handle = self.this_handle()?;
        self.instances.get(handle).map_err(CallError::Receiver)
    }

    /// Mutably borrow the receiver as `T`.
    pub fn this_mut<T: NativeClass>(&mut self) -> Result<&mut T, CallError> {
        let handle = self.this_handle()?;
        self.instances.get_mut(handle).map_err(CallError::Receiver)
    }

    fn receiver(&self) -> Option<&Value> {
        if self.arg_offset == 0 {
            None
        } else {
            self.slots.first()
        }
    }

    /// Encode and store the return value.
    pub fn set_return<T: IntoValue>(&mut self, value: T) -> Result<(), CallError> {
        *self.return_slot = value.into_value(self.instances).map_err(CallError::Return)?;
        Ok(())
    }

    /// Store a raw return value.
    pub fn set_return_value(&mut self, value: Value) {
        *self.return_slot = value;
    }

    /// The return value written so far.
    pub fn return_value(&self) -> &Value {
        self.return_slot
    }

    /// Get access to the instance table.
    pub fn instances(&self) -> &InstanceTable {
        self.instances
    }

    /// Get mutable access to the instance table.
    pub fn instances_mut(&mut self) -> &mut InstanceTable {
        self.instances
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("arg_count", &self.arg_count())
            .field("arg_offset", &self.arg_offset)
            .finish()
    }
}
