//! Parameter descriptors and default values.
//!
//! Each bound member carries an [`ArgumentList`]: one [`ArgumentDescriptor`]
//! per native parameter, in declared order. Required parameters come first;
//! optional ones form a suffix and carry the [`Value`] used when a call
//! omits them.
//!
//! ```
//! use scriptbind_core::{DefaultValue, Params};
//!
//! // fn new(kind: i32 = 0)
//! let params = Params::new().optional(0);
//!
//! // fn scale(factor: f64, bias: f64 = 1/3)
//! let params = Params::new().required().optional(DefaultValue::ratio(1, 3));
//! assert_eq!(params.len(), 2);
//! ```

use crate::{CallError, ParamType, RegistrationError, TypeKind, Value};

/// Declared default of an optional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Nil,
    Bool(bool),
    Int(i64),
    /// Unsigned default wider than the script integer; checked at bind time
    Unsigned(u64),
    Char(char),
    Float(f64),
    Str(String),
    /// Float default carried as `numerator / denominator`, evaluated at bind time
    Ratio { numerator: i64, denominator: i64 },
}

impl DefaultValue {
    /// A floating default expressed as a fraction.
    pub fn ratio(numerator: i64, denominator: i64) -> Self {
        DefaultValue::Ratio { numerator, denominator }
    }

    /// Evaluate into the VM value handed to the extractor.
    pub fn to_value(&self) -> Result<Value, String> {
        Ok(match self {
            DefaultValue::Nil => Value::Nil,
            DefaultValue::Bool(v) => Value::Bool(*v),
            DefaultValue::Int(v) => Value::Int(*v),
            DefaultValue::Unsigned(v) => match i64::try_from(*v) {
                Ok(v) => Value::Int(v),
                Err(_) => return Err(format!("{v} exceeds the script integer range")),
            },
            DefaultValue::Char(c) => Value::Str(c.to_string()),
            DefaultValue::Float(v) => Value::Float(*v),
            DefaultValue::Str(s) => Value::Str(s.clone()),
            DefaultValue::Ratio { denominator: 0, .. } => return Err("zero denominator".to_owned()),
            DefaultValue::Ratio { numerator, denominator } => Value::Float(*numerator as f64 / *denominator as f64),
        })
    }
}

macro_rules! impl_default_from {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$ty> for DefaultValue {
                fn from(v: $ty) -> Self {
                    DefaultValue::$variant($conv(v))
                }
            }
        )*
    };
}

impl_default_from! {
    bool => Bool(std::convert::identity),
    i8 => Int(i64::from),
    i16 => Int(i64::from),
    i32 => Int(i64::from),
    i64 => Int(std::convert::identity),
    isize => Int(|v: isize| v as i64),
    u8 => Int(i64::from),
    u16 => Int(i64::from),
    u32 => Int(i64::from),
    u64 => Unsigned(std::convert::identity),
    usize => Unsigned(|v: usize| v as u64),
    char => Char(std::convert::identity),
    f32 => Float(f64::from),
    f64 => Float(std::convert::identity),
    String => Str(std::convert::identity),
    &str => Str(str::to_owned),
}

/// Builder for a member's parameter list.
///
/// One entry per native parameter: [`required`](Self::required) or
/// [`optional`](Self::optional) with a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<Option<DefaultValue>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` required parameters.
    pub fn required_count(count: usize) -> Self {
        Self {
            entries: vec![None; count],
        }
    }

    /// Append a required parameter.
    pub fn required(mut self) -> Self {
        self.entries.push(None);
        self
    }

    /// Append an optional parameter with its default.
    pub fn optional(mut self, default: impl Into<DefaultValue>) -> Self {
        self.entries.push(Some(default.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved parameter: its type and, if optional, its default.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptor {
    pub ty: ParamType,
    pub default: Option<Value>,
}

impl ArgumentDescriptor {
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// The validated parameter list of one bound member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentList {
    descriptors: Vec<ArgumentDescriptor>,
    required: usize,
}

impl ArgumentList {
    /// All parameters required.
    pub fn required_only(types: &[ParamType]) -> Self {
        Self {
            descriptors: types
                .iter()
                .map(|ty| ArgumentDescriptor { ty: *ty, default: None })
                .collect(),
            required: types.len(),
        }
    }

    /// Pair native parameter types with declared params.
    ///
    /// Rejects a declaration whose length differs from the native arity, a
    /// required parameter after an optional one, a default on an
    /// instance-typed parameter, and a default that cannot be evaluated.
    pub fn resolve(member: &str, types: &[ParamType], params: &Params) -> Result<Self, RegistrationError> {
        if params.len() != types.len() {
            return Err(RegistrationError::ParameterCount {
                member: member.to_owned(),
                declared: params.len(),
                expected: types.len(),
            });
        }

        let mut descriptors = Vec::with_capacity(types.len());
        let mut required = 0;
        for (index, (ty, entry)) in types.iter().zip(&params.entries).enumerate() {
            let default = match entry {
                None if required < index => {
                    return Err(RegistrationError::RequiredAfterOptional {
                        member: member.to_owned(),
                        index,
                    });
                }
                None => {
                    required += 1;
                    None
                }
                Some(_) if ty.kind == TypeKind::Instance => {
                    return Err(RegistrationError::UnsupportedType {
                        type_name: ty.name.to_owned(),
                        reason: format!("parameter {index} of '{member}' is class-valued and cannot have a default"),
                    });
                }
                Some(default) => {
                    let value = default.to_value().map_err(|reason| RegistrationError::InvalidDefault {
                        member: member.to_owned(),
                        index,
                        reason,
                    })?;
                    Some(value)
                }
            };
            descriptors.push(ArgumentDescriptor { ty: *ty, default });
        }

        Ok(Self { descriptors, required })
    }

    /// Number of required parameters.
    pub fn required(&self) -> usize {
        self.required
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.descriptors.len()
    }

    pub fn descriptors(&self) -> &[ArgumentDescriptor] {
        &self.descriptors
    }

    /// Default of parameter `index`, if it is optional.
    pub fn default_at(&self, index: usize) -> Option<&Value> {
        self.descriptors.get(index).and_then(|d| d.default.as_ref())
    }

    /// Check a call's argument count against the required floor and the
    /// declared maximum.
    pub fn check_count(&self, given: usize) -> Result<(), CallError> {
        if given < self.required || given > self.arity() {
            return Err(CallError::ArgumentCount {
                given,
                required: self.required,
                max: self.arity(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScriptType, TypeHash};

    fn int() -> ParamType {
        ParamType::of::<i32>()
    }

    fn double() -> ParamType {
        ParamType::of::<f64>()
    }

    fn class() -> ParamType {
        ParamType {
            hash: TypeHash::from_name("Monster"),
            name: "Monster",
            kind: TypeKind::Instance,
        }
    }

    #[test]
    fn ratio_defaults_evaluate() {
        let value = DefaultValue::ratio(1, 3).to_value().unwrap();
        let Value::Float(v) = value else {
            panic!("expected float, got {value:?}");
        };
        assert!((v - 1.0 / 3.0).abs() < 1e-12);

        let value = DefaultValue::ratio(-7, 2).to_value().unwrap();
        assert_eq!(value, Value::Float(-3.5));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let err = ArgumentList::resolve("scale", &[double()], &Params::new().optional(DefaultValue::ratio(1, 0)));
        assert!(matches!(err, Err(RegistrationError::InvalidDefault { index: 0, .. })));
    }

    #[test]
    fn literal_conversions() {
        assert_eq!(DefaultValue::from(3), DefaultValue::Int(3));
        assert_eq!(DefaultValue::from("x"), DefaultValue::Str("x".into()));
        assert_eq!(DefaultValue::from('c').to_value(), Ok(Value::Str("c".into())));
        assert_eq!(DefaultValue::from(0.5f32), DefaultValue::Float(0.5));
    }

    #[test]
    fn integer_widths_convert() {
        assert_eq!(DefaultValue::from(-3i8).to_value(), Ok(Value::Int(-3)));
        assert_eq!(DefaultValue::from(i16::MIN).to_value(), Ok(Value::Int(-32768)));
        assert_eq!(DefaultValue::from(255u8).to_value(), Ok(Value::Int(255)));
        assert_eq!(DefaultValue::from(u16::MAX).to_value(), Ok(Value::Int(65535)));
        assert_eq!(DefaultValue::from(isize::MIN).to_value(), Ok(Value::Int(isize::MIN as i64)));
        assert_eq!(DefaultValue::from(3usize).to_value(), Ok(Value::Int(3)));
        assert_eq!(DefaultValue::from(i64::MAX as u64).to_value(), Ok(Value::Int(i64::MAX)));
    }

    #[test]
    fn wide_unsigned_default_is_rejected() {
        assert!(DefaultValue::from(u64::MAX).to_value().is_err());

        let err = ArgumentList::resolve("take", &[ParamType::of::<u64>()], &Params::new().optional(u64::MAX));
        assert!(matches!(err, Err(RegistrationError::InvalidDefault { index: 0, .. })));

        let list = ArgumentList::resolve("take", &[ParamType::of::<usize>()], &Params::new().optional(7usize)).unwrap();
        assert_eq!(list.default_at(0), Some(&Value::Int(7)));
    }

    #[test]
    fn empty_list_has_no_parameters() {
        let list = ArgumentList::default();
        assert_eq!(list.arity(), 0);
        assert_eq!(list.required(), 0);
        assert_eq!(list.default_at(0), None);
        assert!(list.check_count(0).is_ok());
        assert!(list.check_count(1).is_err());
    }

    #[test]
    fn resolve_counts_required_prefix() {
        let list = ArgumentList::resolve("hit", &[int(), int(), double()], &Params::new().required().optional(1).optional(2.0))
            .unwrap();
        assert_eq!(list.required(), 1);
        assert_eq!(list.arity(), 3);
        assert_eq!(list.default_at(0), None);
        assert_eq!(list.default_at(1), Some(&Value::Int(1)));
        assert!(list.descriptors()[2].is_optional());
        assert_eq!(list.descriptors()[2].ty.name, f64::type_name());
    }

    #[test]
    fn resolve_rejects_length_mismatch() {
        let err = ArgumentList::resolve("hit", &[int()], &Params::new());
        assert_eq!(
            err,
            Err(RegistrationError::ParameterCount {
                member: "hit".into(),
                declared: 0,
                expected: 1
            })
        );
    }

    #[test]
    fn resolve_rejects_required_after_optional() {
        let err = ArgumentList::resolve("hit", &[int(), int()], &Params::new().optional(0).required());
        assert_eq!(
            err,
            Err(RegistrationError::RequiredAfterOptional {
                member: "hit".into(),
                index: 1
            })
        );
    }

    #[test]
    fn resolve_rejects_class_defaults() {
        let err = ArgumentList::resolve("attack", &[class()], &Params::new().optional(DefaultValue::Nil));
        assert!(matches!(err, Err(RegistrationError::UnsupportedType { .. })));
    }

    #[test]
    fn check_count_bounds() {
        let list = ArgumentList::resolve("new", &[int(), int()], &Params::new().required().optional(0)).unwrap();
        assert!(list.check_count(0).is_err());
        assert!(list.check_count(1).is_ok());
        assert!(list.check_count(2).is_ok());
        assert_eq!(
            list.check_count(3),
            Err(CallError::ArgumentCount {
                given: 3,
                required: 1,
                max: 2
            })
        );
    }

    #[test]
    fn required_only_list() {
        let list = ArgumentList::required_only(&[int(), double()]);
        assert_eq!(list.required(), 2);
        assert_eq!(list, ArgumentList::resolve("f", &[int(), double()], &Params::required_count(2)).unwrap());
    }
}
