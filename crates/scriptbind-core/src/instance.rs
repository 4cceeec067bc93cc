//! Generational arena owning every wrapped native instance.
//!
//! The VM object for a wrapped instance holds only an [`InstanceHandle`].
//! The native value itself lives here until the VM's finalizer hook calls
//! [`InstanceTable::finalize`], which drops it and bumps the slot
//! generation. Any handle still floating around afterwards is stale and
//! every unwrap through it fails with `StaleInstance`.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::native_fn::panic_message;
use crate::{ConversionError, NativeClass, Value};

/// Handle to a wrapped native instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle {
    /// Index into the table's slots
    pub index: u32,
    /// Generation for use-after-finalize detection
    pub generation: u32,
}

impl InstanceHandle {
    /// Create a new instance handle.
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

struct Slot {
    generation: u32,
    value: Option<Box<dyn Any>>,
    type_name: &'static str,
}

/// Owner of all wrapped native instances.
///
/// Not synchronised: a table belongs to one VM instance driven from one
/// thread at a time.
pub struct InstanceTable {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl InstanceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Take ownership of a native instance.
    pub fn insert<T: NativeClass>(&mut self, value: T) -> InstanceHandle {
        self.insert_boxed(Box::new(value), T::type_name())
    }

    fn insert_boxed(&mut self, value: Box<dyn Any>, type_name: &'static str) -> InstanceHandle {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            slot.type_name = type_name;
            InstanceHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
                type_name,
            });
            InstanceHandle::new(index, 0)
        }
    }

    fn live_slot(&self, handle: InstanceHandle) -> Result<&Slot, ConversionError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.value.is_some())
            .ok_or(ConversionError::StaleInstance { index: handle.index })
    }

    /// Borrow the instance as `T`.
    ///
    /// Fails with `StaleInstance` if the handle was finalized and with
    /// `InvalidInstance` if the stored native type is not `T`.
    pub fn get<T: NativeClass>(&self, handle: InstanceHandle) -> Result<&T, ConversionError> {
        let slot = self.live_slot(handle)?;
        slot.value
            .as_ref()
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or(ConversionError::InvalidInstance {
                expected: T::type_name(),
                actual: slot.type_name,
            })
    }

    /// Mutably borrow the instance as `T`.
    pub fn get_mut<T: NativeClass>(&mut self, handle: InstanceHandle) -> Result<&mut T, ConversionError> {
        let actual = self.live_slot(handle)?.type_name;
        self.slots[handle.index as usize]
            .value
            .as_mut()
            .and_then(|value| value.downcast_mut::<T>())
            .ok_or(ConversionError::InvalidInstance {
                expected: T::type_name(),
                actual,
            })
    }

    /// Borrow the instance a VM value refers to.
    pub fn resolve<T: NativeClass>(&self, value: &Value) -> Result<&T, ConversionError> {
        match value {
            Value::Instance(handle) => self.get(*handle),
            Value::Nil => Err(ConversionError::NullInstance {
                target_type: T::type_name(),
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: T::type_name(),
                actual: other.type_name(),
            }),
        }
    }

    /// Script name of the native type stored behind a live handle.
    pub fn type_name_of(&self, handle: InstanceHandle) -> Option<&'static str> {
        self.live_slot(handle).ok().map(|slot| slot.type_name)
    }

    /// Whether the handle still refers to a live instance.
    pub fn is_live(&self, handle: InstanceHandle) -> bool {
        self.live_slot(handle).is_ok()
    }

    /// Drop the instance behind `handle`.
    ///
    /// Idempotent: returns `true` only on the call that actually destroyed
    /// the instance. Stale or foreign handles are ignored. A panic raised
    /// while dropping the instance is logged and swallowed; the slot is
    /// already released by then.
    pub fn finalize(&mut self, handle: InstanceHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if slot.generation != handle.generation {
            return false;
        }
        let Some(value) = slot.value.take() else {
            return false;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.live -= 1;
        let type_name = slot.type_name;
        tracing::trace!(index = handle.index, type_name, "finalized instance");
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| drop(value))) {
            tracing::error!(
                index = handle.index,
                type_name,
                message = %panic_message(payload.as_ref()),
                "instance panicked while being dropped"
            );
        }
        true
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no instance is live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl Default for InstanceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstanceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceTable")
            .field("slot_count", &self.slots.len())
            .field("live", &self.live)
            .finish()
    }
}
