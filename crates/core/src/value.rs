//! Runtime values produced by argument handlers
//!
//! This module defines:
//! - Value: one variant per concrete [`ValueType`](crate::ValueType)
//! - Argument: a reified slot, `Present(value)` or `Absent`
//! - Arguments: the positional argument list handed to a command body
//! - FromValue: typed extraction used by [`Arguments::get`]
//!
//! ## Equality
//!
//! Different variants are never equal (`Int(1) != Long(1)`). Floats use
//! IEEE-754 equality. `Opaque` values compare by identity.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use thiserror::Error;

/// A typed value.
#[derive(Clone)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Single character
    Char(char),
    /// 8-bit integer
    Byte(i8),
    /// 16-bit integer
    Short(i16),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Arbitrary precision integer
    BigInteger(BigInt),
    /// Arbitrary precision decimal
    BigDecimal(BigDecimal),
    /// UTF-8 string
    String(String),
    /// A variant of a declared enum
    Enum {
        /// Enum type name
        type_name: String,
        /// Canonical variant name
        variant: String,
    },
    /// Fixed sequence
    Array(Vec<Value>),
    /// Ordered sequence
    List(Vec<Value>),
    /// Ordered by first occurrence, without duplicates
    Set(Vec<Value>),
    /// Ordered key/value pairs with unique keys
    Map(Vec<(Value, Value)>),
    /// Present-or-absent value
    Optional(Option<Box<Value>>),
    /// Host object injected through an implicit supplier
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::BigInteger(a), Value::BigInteger(b)) => a == b,
            (Value::BigDecimal(a), Value::BigDecimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::Enum {
                    type_name: ta,
                    variant: va,
                },
                Value::Enum {
                    type_name: tb,
                    variant: vb,
                },
            ) => ta == tb && va == vb,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|v| b.contains(v))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.iter().any(|(bk, bv)| bk == k && bv == v))
            }
            (Value::Optional(a), Value::Optional(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "Bool({:?})", v),
            Value::Char(v) => write!(f, "Char({:?})", v),
            Value::Byte(v) => write!(f, "Byte({})", v),
            Value::Short(v) => write!(f, "Short({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Long(v) => write!(f, "Long({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Double(v) => write!(f, "Double({})", v),
            Value::BigInteger(v) => write!(f, "BigInteger({})", v),
            Value::BigDecimal(v) => write!(f, "BigDecimal({})", v),
            Value::String(v) => write!(f, "String({:?})", v),
            Value::Enum { type_name, variant } => write!(f, "Enum({}::{})", type_name, variant),
            Value::Array(v) => f.debug_tuple("Array").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Set(v) => f.debug_tuple("Set").field(v).finish(),
            Value::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Value::Optional(v) => f.debug_tuple("Optional").field(v).finish(),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

/// Renders values the way a user would type them; strings are not quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::BigInteger(v) => write!(f, "{}", v),
            Value::BigDecimal(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Enum { variant, .. } => f.write_str(variant),
            Value::Array(v) | Value::List(v) | Value::Set(v) => write_seq(f, v.iter()),
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Optional(Some(v)) => write!(f, "{}", v),
            Value::Optional(None) => f.write_str("null"),
            Value::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

impl Value {
    /// Wrap a host object.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    /// Build a set, keeping the first occurrence of each element.
    pub fn set_of(items: Vec<Value>) -> Self {
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Build a map; a repeated key replaces the earlier value in place.
    pub fn map_of(entries: Vec<(Value, Value)>) -> Self {
        let mut merged: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match merged.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => merged.push((key, value)),
            }
        }
        Value::Map(merged)
    }

    /// Variant name, used in mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::BigInteger(_) => "biginteger",
            Value::BigDecimal(_) => "bigdecimal",
            Value::String(_) => "string",
            Value::Enum { .. } => "enum",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Optional(_) => "optional",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Borrow an opaque host object as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Number of elements or entries of a composite value.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(v) | Value::List(v) | Value::Set(v) => Some(v.len()),
            Value::Map(v) => Some(v.len()),
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

// =============================================================================
// Reified arguments
// =============================================================================

/// One reified parameter slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A value was supplied, injected or defaulted
    Present(Value),
    /// An optional parameter or flag without a value
    Absent,
}

impl Argument {
    /// Whether a value is present.
    pub fn is_present(&self) -> bool {
        matches!(self, Argument::Present(_))
    }

    /// Borrow the value, if present.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Argument::Present(v) => Some(v),
            Argument::Absent => None,
        }
    }

    /// Take the value, if present.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Argument::Present(v) => Some(v),
            Argument::Absent => None,
        }
    }
}

/// Failure extracting a typed value from [`Arguments`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The slot does not exist or holds no value
    #[error("argument {index} is absent")]
    Missing {
        /// Slot index
        index: usize,
    },

    /// The value has a different type
    #[error("expected {expected}, found {actual}")]
    Mismatch {
        /// Requested type
        expected: &'static str,
        /// Stored value type
        actual: &'static str,
    },
}

/// The positional argument list of one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    slots: Vec<Argument>,
}

impl Arguments {
    /// Wrap reified slots.
    pub fn new(slots: Vec<Argument>) -> Self {
        Arguments { slots }
    }

    /// Number of slots (one per declared parameter).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrow the slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&Argument> {
        self.slots.get(index)
    }

    /// Iterate slots in parameter order.
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.slots.iter()
    }

    /// Whether the slot at `index` holds a value.
    pub fn is_present(&self, index: usize) -> bool {
        self.slot(index).is_some_and(Argument::is_present)
    }

    /// Borrow the raw value at `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.slot(index).and_then(Argument::value)
    }

    /// Extract a required value.
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, ValueError> {
        let value = self.value(index).ok_or(ValueError::Missing { index })?;
        T::from_value(value)
    }

    /// Extract an optional value; absent slots yield `None`.
    pub fn optional<T: FromValue>(&self, index: usize) -> Result<Option<T>, ValueError> {
        self.value(index).map(T::from_value).transpose()
    }

    /// Borrow an injected host object.
    pub fn opaque<T: Any>(&self, index: usize) -> Result<&T, ValueError> {
        let value = self.value(index).ok_or(ValueError::Missing { index })?;
        value.downcast_ref::<T>().ok_or(ValueError::Mismatch {
            expected: std::any::type_name::<T>(),
            actual: value.type_name(),
        })
    }

    /// Consume into the underlying slots.
    pub fn into_inner(self) -> Vec<Argument> {
        self.slots
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

// =============================================================================
// FromValue
// =============================================================================

/// Conversion from a [`Value`] to a Rust type.
pub trait FromValue: Sized {
    /// Convert, failing on a type mismatch.
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T, ValueError> {
    Err(ValueError::Mismatch {
        expected,
        actual: value.type_name(),
    })
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(v) => Ok(*v),
            other => mismatch("bool", other),
        }
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Char(v) => Ok(*v),
            other => mismatch("char", other),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(v) => Ok(v.clone()),
            Value::Enum { variant, .. } => Ok(variant.clone()),
            other => mismatch("string", other),
        }
    }
}

macro_rules! integer_from_value {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ValueError> {
                    value
                        .as_integer()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .map_or_else(|| mismatch($name, value), Ok)
                }
            }
        )*
    };
}

integer_from_value!(i8 => "byte", i16 => "short", i32 => "int", i64 => "long");

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(*v),
            other => mismatch("float", other),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(*v as f64),
            other => mismatch("double", other),
        }
    }
}

impl FromValue for BigInt {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::BigInteger(v) => Ok(v.clone()),
            other => match other.as_integer() {
                Some(v) => Ok(BigInt::from(v)),
                None => mismatch("biginteger", other),
            },
        }
    }
}

impl FromValue for BigDecimal {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::BigDecimal(v) => Ok(v.clone()),
            Value::BigInteger(v) => Ok(BigDecimal::new(v.clone(), 0)),
            other => mismatch("bigdecimal", other),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Array(items) | Value::List(items) | Value::Set(items) => {
                items.iter().map(T::from_value).collect()
            }
            other => mismatch("sequence", other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Optional(inner) => inner.as_deref().map(T::from_value).transpose(),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => mismatch("map", other),
        }
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => mismatch("map", other),
        }
    }
}
