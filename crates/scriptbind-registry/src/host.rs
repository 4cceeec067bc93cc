//! The interface a host VM implements to receive bindings.

use std::fmt;

use scriptbind_core::{InstanceHandle, InstanceTable, NativeFn, Value};

/// Finalizer hook installed on every wrapped class.
///
/// Called by the VM's garbage collector with the handle stored in the dying
/// object. Returns whether an instance was actually destroyed.
pub type Finalizer = fn(&mut InstanceTable, InstanceHandle) -> bool;

/// The default finalizer: drop the wrapped instance, at most once.
pub fn finalize_instance(instances: &mut InstanceTable, handle: InstanceHandle) -> bool {
    instances.finalize(handle)
}

/// Class-declaration primitives of the embedded VM.
///
/// The allocation hook is called with a call frame holding the
/// constructor arguments (argument offset 0) and leaves a
/// [`Value::Instance`](scriptbind_core::Value::Instance) in the return
/// slot; the VM keeps that handle in its object and passes it back to the
/// finalizer. Methods are called with the receiver in slot 0.
pub trait HostVm {
    /// The VM's handle for a declared class.
    type Class: Copy + Eq + fmt::Debug;

    /// Declare a class named `name` inside the enclosing `scope` (a class or
    /// module handle), or at top level when `scope` is `None`.
    ///
    /// The scope only qualifies the name. Methods are never looked up
    /// through it.
    fn define_class(&mut self, name: &str, scope: Option<Self::Class>) -> Self::Class;

    /// Install the allocation and finalizer hooks of a class.
    fn set_lifecycle(&mut self, class: Self::Class, allocate: NativeFn, finalize: Finalizer);

    /// Define a method. `required` is the minimum argument count.
    fn define_method(&mut self, class: Self::Class, name: &str, required: usize, entry: NativeFn);

    /// Store `value`, which wraps an instance of `class`, in the instance
    /// variable `name` of `object`.
    fn set_instance_variable(&mut self, object: &Value, name: &str, class: Self::Class, value: Value);

    /// The instance variable `name` of `object`; nil when unset.
    fn instance_variable(&self, object: &Value, name: &str) -> Value;

    /// Script-side name of the setter for `field`.
    fn setter_name(&self, field: &str) -> String {
        format!("{field}=")
    }
}
