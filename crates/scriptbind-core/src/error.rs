//! Error types for the binding layer.
//!
//! ```text
//! ConversionError    - a single value failed to convert (codec level)
//! CallError          - an entry point failed at script call time
//! RegistrationError  - a binding was rejected at bind time
//! ```
//!
//! Call-time errors are returned to the host VM as values; the VM raises
//! them as script-level exceptions using [`CallError::kind`] and the
//! display message. Bind-time errors are returned from the builder before
//! the offending entry point ever reaches the VM.

use thiserror::Error;

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors converting between native values and VM values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The value's runtime tag does not match the expected native type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A VM integer does not fit the native integer type.
    #[error("integer overflow: value {value} does not fit in {target_type}")]
    IntegerOverflow { value: i64, target_type: &'static str },

    /// A native unsigned integer does not fit the VM integer.
    #[error("integer overflow: value {value} does not fit in a script integer")]
    UnsignedOverflow { value: u64 },

    /// A finite float is outside the range of the native float type.
    #[error("float conversion error: value {value} cannot be represented as {target_type}")]
    FloatConversion {
        value: f64,
        target_type: &'static str,
    },

    /// A string meant for a null-terminated buffer contains a NUL byte.
    #[error("string contains an interior NUL byte at offset {position}")]
    InteriorNul { position: usize },

    /// A null-terminated byte string is not valid UTF-8.
    #[error("invalid UTF-8 string data")]
    InvalidUtf8,

    /// A string does not hold exactly one character.
    #[error("expected a single character, got a string of {length} characters")]
    NotAChar { length: usize },

    /// The wrapped instance is of a different native type.
    #[error("invalid instance: expected {expected}, got {actual}")]
    InvalidInstance {
        expected: &'static str,
        actual: &'static str,
    },

    /// The wrapped instance has already been finalized.
    #[error("stale instance handle: instance at index {index} has been finalized")]
    StaleInstance { index: u32 },

    /// Nil was given where an instance is required.
    #[error("nil cannot be converted to {target_type}")]
    NullInstance { target_type: &'static str },
}

impl ConversionError {
    /// Whether this failure is about instance identity rather than value shape.
    pub fn is_instance_error(&self) -> bool {
        matches!(
            self,
            ConversionError::InvalidInstance { .. }
                | ConversionError::StaleInstance { .. }
                | ConversionError::NullInstance { .. }
        )
    }
}

// ============================================================================
// Call Errors
// ============================================================================

/// Coarse classification of a call-time error, used by the host VM to pick
/// the script-level exception class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallErrorKind {
    /// Wrong number of arguments.
    ArgumentCount,
    /// A value had the wrong runtime type or was out of range.
    TypeMismatch,
    /// A wrapped instance was of the wrong class or already finalized.
    InvalidInstance,
    /// The native side failed on its own terms.
    Native,
}

/// Errors raised while a bound entry point runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// Fewer arguments than required, or more than declared.
    #[error("wrong number of arguments (given {given}, expected {})", expected_range(.required, .max))]
    ArgumentCount {
        given: usize,
        required: usize,
        max: usize,
    },

    /// Argument `index` failed to convert.
    #[error("argument {index}: {source}")]
    Argument {
        index: usize,
        #[source]
        source: ConversionError,
    },

    /// The receiver could not be unwrapped as the bound class.
    #[error("invalid receiver: {0}")]
    Receiver(#[source] ConversionError),

    /// The native return value could not be encoded.
    #[error("return value: {0}")]
    Return(#[source] ConversionError),

    /// Instantiation was attempted on a class with no constructor.
    #[error("class {class} has no constructor bound")]
    NoConstructor { class: String },

    /// The native function panicked; the panic was contained.
    #[error("native function panicked: {message}")]
    Panic { message: String },

    /// Generic native failure raised from a hand-written binding.
    #[error("{message}")]
    Other { message: String },
}

fn expected_range(required: &usize, max: &usize) -> String {
    if required == max {
        required.to_string()
    } else {
        format!("{required}..{max}")
    }
}

impl CallError {
    /// Create a generic native error.
    pub fn other(message: impl Into<String>) -> Self {
        CallError::Other {
            message: message.into(),
        }
    }

    /// Classify this error for the host VM.
    pub fn kind(&self) -> CallErrorKind {
        match self {
            CallError::ArgumentCount { .. } => CallErrorKind::ArgumentCount,
            CallError::Argument { source, .. } | CallError::Return(source) => {
                if source.is_instance_error() {
                    CallErrorKind::InvalidInstance
                } else {
                    CallErrorKind::TypeMismatch
                }
            }
            CallError::Receiver(_) => CallErrorKind::InvalidInstance,
            CallError::NoConstructor { .. } | CallError::Panic { .. } | CallError::Other { .. } => {
                CallErrorKind::Native
            }
        }
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that reject a binding at bind time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// The native type has not been registered.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// The native type is already registered.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A member with this script name is already bound on the class.
    #[error("duplicate registration: {name} already registered as {kind}")]
    DuplicateRegistration {
        /// The script name that was duplicated.
        name: String,
        /// What was already registered under it (e.g. "method", "constructor").
        kind: String,
    },

    /// The type cannot be bound through the automatic path.
    #[error("unsupported type '{type_name}': {reason}")]
    UnsupportedType { type_name: String, reason: String },

    /// More than one overload matches and no single signature selects one.
    #[error("ambiguous overload for '{member}': {candidates} candidates match")]
    AmbiguousOverload { member: String, candidates: usize },

    /// The explicit signature matches none of the overloads.
    #[error("no overload of '{member}' matches signature {signature}")]
    NoMatchingOverload { member: String, signature: String },

    /// The parameter descriptors do not match the native arity.
    #[error("'{member}' declares {declared} parameter descriptor(s) but takes {expected}")]
    ParameterCount {
        member: String,
        declared: usize,
        expected: usize,
    },

    /// A required parameter follows an optional one.
    #[error("'{member}': required parameter {index} follows an optional parameter")]
    RequiredAfterOptional { member: String, index: usize },

    /// A default value cannot serve its parameter.
    #[error("'{member}': invalid default for parameter {index}: {reason}")]
    InvalidDefault {
        member: String,
        index: usize,
        reason: String,
    },
}
