//! Type model for command parameters
//!
//! This module defines:
//! - ValueType: the type tag handlers are registered under
//! - EnumType / CustomType: host-declared types
//! - TypeSignature: a type plus its generic arguments (`map<string, int>`)
//!
//! ## Hierarchy
//!
//! Every type except [`ValueType::Any`] has a parent. Handler lookup walks
//! this chain nearest-first when no handler is registered for the exact
//! type, so a handler registered for `number` serves `int`, `long`, etc.
//!
//! ```text
//! any
//! ├── number ── byte short int long float double biginteger bigdecimal
//! ├── enum ──── <declared enums>
//! ├── collection ── list set
//! ├── bool char string array map optional
//! └── <custom types> (parent configurable)
//! ```

use std::fmt;
use std::sync::Arc;

/// A host-declared enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: String,
    variants: Vec<String>,
}

impl EnumType {
    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared variants, in declaration order.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }
}

/// A host-declared opaque type, typically supplied implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomType {
    name: String,
    parent: Option<ValueType>,
}

impl CustomType {
    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parent, if any. `None` means the parent is `any`.
    pub fn parent(&self) -> Option<&ValueType> {
        self.parent.as_ref()
    }
}

/// Type tag for parameters, values and handler registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Root of the hierarchy
    Any,
    /// Abstract parent of every numeric type
    Number,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Arbitrary precision integer
    BigInteger,
    /// Arbitrary precision decimal
    BigDecimal,
    /// Boolean
    Bool,
    /// Single character
    Char,
    /// UTF-8 string
    String,
    /// Abstract parent of every declared enum
    AnyEnum,
    /// A declared enum
    Enum(Arc<EnumType>),
    /// Abstract parent of list and set
    Collection,
    /// Ordered, duplicates allowed
    List,
    /// Ordered by first occurrence, no duplicates
    Set,
    /// Fixed sequence
    Array,
    /// Key/value pairs
    Map,
    /// Present-or-absent value
    Optional,
    /// A host-declared type
    Custom(Arc<CustomType>),
}

impl ValueType {
    /// Declare an enum type.
    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Enum(Arc::new(EnumType {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }))
    }

    /// Declare a custom type, optionally below an existing type.
    pub fn custom(name: impl Into<String>, parent: Option<ValueType>) -> Self {
        ValueType::Custom(Arc::new(CustomType {
            name: name.into(),
            parent,
        }))
    }

    /// Immediate parent in the hierarchy. `Any` has none.
    pub fn parent(&self) -> Option<ValueType> {
        match self {
            ValueType::Any => None,
            ValueType::Byte
            | ValueType::Short
            | ValueType::Int
            | ValueType::Long
            | ValueType::Float
            | ValueType::Double
            | ValueType::BigInteger
            | ValueType::BigDecimal => Some(ValueType::Number),
            ValueType::Enum(_) => Some(ValueType::AnyEnum),
            ValueType::List | ValueType::Set => Some(ValueType::Collection),
            ValueType::Custom(custom) => {
                Some(custom.parent.clone().unwrap_or(ValueType::Any))
            }
            _ => Some(ValueType::Any),
        }
    }

    /// Iterate the ancestors of this type, nearest first, ending at `Any`.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Whether a value of this type can be used where `other` is expected.
    pub fn is_assignable_to(&self, other: &ValueType) -> bool {
        self == other || self.ancestors().any(|a| &a == other)
    }

    /// Whether this type only exists as a registration key.
    pub fn is_abstract(&self) -> bool {
        matches!(
            self,
            ValueType::Any | ValueType::Number | ValueType::AnyEnum | ValueType::Collection
        )
    }

    /// Number of generic arguments a composite type requires.
    pub fn arity(&self) -> usize {
        match self {
            ValueType::Array | ValueType::List | ValueType::Set | ValueType::Optional => 1,
            ValueType::Map => 2,
            _ => 0,
        }
    }

    /// Human-readable type name.
    pub fn name(&self) -> &str {
        match self {
            ValueType::Any => "any",
            ValueType::Number => "number",
            ValueType::Byte => "byte",
            ValueType::Short => "short",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::BigInteger => "biginteger",
            ValueType::BigDecimal => "bigdecimal",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::String => "string",
            ValueType::AnyEnum => "enum",
            ValueType::Enum(e) => e.name(),
            ValueType::Collection => "collection",
            ValueType::List => "list",
            ValueType::Set => "set",
            ValueType::Array => "array",
            ValueType::Map => "map",
            ValueType::Optional => "optional",
            ValueType::Custom(c) => c.name(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Iterator over a type's ancestor chain.
pub struct Ancestors {
    next: Option<ValueType>,
}

impl Iterator for Ancestors {
    type Item = ValueType;

    fn next(&mut self) -> Option<ValueType> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

/// A type with its generic arguments.
///
/// Implicit suppliers are keyed by the full signature, so
/// `list<string>` and `list<int>` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSignature {
    ty: ValueType,
    args: Vec<TypeSignature>,
}

impl TypeSignature {
    /// A signature without generic arguments.
    pub fn of(ty: ValueType) -> Self {
        TypeSignature { ty, args: Vec::new() }
    }

    /// A signature with generic arguments.
    pub fn generic(ty: ValueType, args: Vec<TypeSignature>) -> Self {
        TypeSignature { ty, args }
    }

    /// The outer type.
    pub fn ty(&self) -> &ValueType {
        &self.ty
    }

    /// All generic arguments.
    pub fn args(&self) -> &[TypeSignature] {
        &self.args
    }

    /// The generic argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&TypeSignature> {
        self.args.get(index)
    }

    /// `string`
    pub fn string() -> Self {
        Self::of(ValueType::String)
    }

    /// `bool`
    pub fn bool() -> Self {
        Self::of(ValueType::Bool)
    }

    /// `int`
    pub fn int() -> Self {
        Self::of(ValueType::Int)
    }

    /// `long`
    pub fn long() -> Self {
        Self::of(ValueType::Long)
    }

    /// `double`
    pub fn double() -> Self {
        Self::of(ValueType::Double)
    }

    /// `array<element>`
    pub fn array(element: TypeSignature) -> Self {
        Self::generic(ValueType::Array, vec![element])
    }

    /// `list<element>`
    pub fn list(element: TypeSignature) -> Self {
        Self::generic(ValueType::List, vec![element])
    }

    /// `set<element>`
    pub fn set(element: TypeSignature) -> Self {
        Self::generic(ValueType::Set, vec![element])
    }

    /// `map<key, value>`
    pub fn map(key: TypeSignature, value: TypeSignature) -> Self {
        Self::generic(ValueType::Map, vec![key, value])
    }

    /// `optional<inner>`
    pub fn optional(inner: TypeSignature) -> Self {
        Self::generic(ValueType::Optional, vec![inner])
    }
}

impl From<ValueType> for TypeSignature {
    fn from(ty: ValueType) -> Self {
        TypeSignature::of(ty)
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}
