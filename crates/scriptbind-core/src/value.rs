//! Tagged value type exchanged with the host VM.

use std::fmt;

use crate::InstanceHandle;

/// A value as seen at the VM boundary.
///
/// The host VM marshals its own tagged values into this closed set before
/// calling an entry point, and unmarshals the return slot afterwards.
/// Native instances never cross the boundary by pointer: the VM only ever
/// holds an [`InstanceHandle`] into the binding layer's instance table.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// The VM's null/nil value
    Nil,
    /// Boolean value
    Bool(bool),
    /// Integer value (every native integer width is carried as i64)
    Int(i64),
    /// Floating point value (f32 and f64 are carried as f64)
    Float(f64),
    /// Owned text string
    Str(String),
    /// Handle to a wrapped native instance
    Instance(InstanceHandle),
}

/// Runtime tag of a [`Value`], the answer to the VM's "typed tag query".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Instance,
}

impl ValueKind {
    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Instance => "instance",
        }
    }
}

impl Value {
    /// The runtime tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Instance(_) => ValueKind::Instance,
        }
    }

    /// Get a human-readable name for this value's tag.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if this value is nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// The instance handle, if this value wraps a native instance.
    pub fn as_instance(&self) -> Option<InstanceHandle> {
        match self {
            Value::Instance(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Instance(h) => write!(f, "Instance({}:{})", h.index, h.generation),
        }
    }
}
