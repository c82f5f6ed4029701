//! Attribute values, composite keys and element-type descriptors.
//!
//! A [`CompositeKey`] wraps the primary-key attribute values of a tuple. Keys
//! are immutable, ordered lexicographically, and hash deterministically from
//! their components, so the same key type works for the ordered index and for
//! both hash indexes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use paste::paste;

use crate::error::{IndexError, IndexResult};

/// A tuple: the ordered attribute values of one row.
pub type Tuple = Vec<Value>;

// ============================================================================
// DOMAIN
// ============================================================================

/// Element-type descriptor for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Character,
    Str,
    Bool,
}

impl Domain {
    /// Name used by the relational layer's schema strings.
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Byte => "Byte",
            Domain::Short => "Short",
            Domain::Integer => "Integer",
            Domain::Long => "Long",
            Domain::Float => "Float",
            Domain::Double => "Double",
            Domain::Character => "Character",
            Domain::Str => "String",
            Domain::Bool => "Boolean",
        }
    }

    /// Parse a whitespace separated list such as `"Integer String String"`.
    pub fn parse_list(names: &str) -> IndexResult<Vec<Domain>> {
        names.split_whitespace().map(str::parse).collect()
    }
}

impl FromStr for Domain {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [Domain; 9] = [
            Domain::Byte,
            Domain::Short,
            Domain::Integer,
            Domain::Long,
            Domain::Float,
            Domain::Double,
            Domain::Character,
            Domain::Str,
            Domain::Bool,
        ];
        ALL.iter()
            .copied()
            .find(|domain| domain.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| IndexError::UnknownDomain(s.to_string()))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// One attribute value.
///
/// Values are totally ordered: first by domain, then by content. Floating
/// point content is compared with `total_cmp`, so equality, ordering and
/// hashing agree for every value including NaN.
#[derive(Debug, Clone)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Character(char),
    Str(String),
    Bool(bool),
}

impl Value {
    /// The domain this value belongs to.
    pub fn domain(&self) -> Domain {
        match self {
            Value::Byte(_) => Domain::Byte,
            Value::Short(_) => Domain::Short,
            Value::Integer(_) => Domain::Integer,
            Value::Long(_) => Domain::Long,
            Value::Float(_) => Domain::Float,
            Value::Double(_) => Domain::Double,
            Value::Character(_) => Domain::Character,
            Value::Str(_) => Domain::Str,
            Value::Bool(_) => Domain::Bool,
        }
    }
}

macro_rules! value_conversions {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        paste! {
            impl Value {
                $(
                    #[doc = concat!(
                        "Returns the payload if this is a `", stringify!($variant), "`."
                    )]
                    pub fn [<as_ $variant:snake>](&self) -> Option<&$ty> {
                        match self {
                            Value::$variant(v) => Some(v),
                            _ => None,
                        }
                    }
                )*
            }

            $(
                impl From<$ty> for Value {
                    fn from(v: $ty) -> Self {
                        Value::$variant(v)
                    }
                }
            )*
        }
    };
}

value_conversions!(
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Character(char),
    Str(String),
    Bool(bool),
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::Short(a), Value::Short(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Character(a), Value::Character(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => self.domain().cmp(&other.domain()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain().hash(state);
        match self {
            Value::Byte(v) => v.hash(state),
            Value::Short(v) => v.hash(state),
            Value::Integer(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Character(v) => v.hash(state),
            Value::Str(v) => v.hash(state),
            Value::Bool(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Character(v) => write!(f, "{}", v),
            Value::Str(v) => f.write_str(v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}

// ============================================================================
// COMPOSITE KEY
// ============================================================================

/// Immutable ordered tuple of values used to address one tuple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeKey {
    components: Vec<Value>,
}

impl CompositeKey {
    pub fn new(components: Vec<Value>) -> Self {
        Self { components }
    }

    /// Build a key by extracting the given attribute positions from a tuple.
    ///
    /// Returns `None` if a position is out of range.
    pub fn project(tuple: &[Value], positions: &[usize]) -> Option<Self> {
        positions
            .iter()
            .map(|&pos| tuple.get(pos).cloned())
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    pub fn components(&self) -> &[Value] {
        &self.components
    }

    pub fn arity(&self) -> usize {
        self.components.len()
    }

    /// Domains of the components, in order.
    pub fn domains(&self) -> Vec<Domain> {
        self.components.iter().map(Value::domain).collect()
    }

    /// Compare two keys, refusing keys whose shapes differ.
    ///
    /// The derived `Ord` is total across domains; this is the checked variant
    /// for callers that treat incompatible keys as an error.
    pub fn try_cmp(&self, other: &Self) -> IndexResult<Ordering> {
        check_conformance(&other.domains(), &self.components)?;
        Ok(self.cmp(other))
    }
}

impl From<Vec<Value>> for CompositeKey {
    fn from(components: Vec<Value>) -> Self {
        Self::new(components)
    }
}

impl From<Value> for CompositeKey {
    fn from(component: Value) -> Self {
        Self::new(vec![component])
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", component)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// ELEMENT TYPES
// ============================================================================

/// Declared element types of an index: key components and tuple attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTypes {
    key: Vec<Domain>,
    tuple: Vec<Domain>,
}

impl ElementTypes {
    pub fn new(key: Vec<Domain>, tuple: Vec<Domain>) -> IndexResult<Self> {
        if key.is_empty() {
            return Err(IndexError::EmptyDescriptor("key"));
        }
        if tuple.is_empty() {
            return Err(IndexError::EmptyDescriptor("tuple"));
        }
        Ok(Self { key, tuple })
    }

    /// Parse schema strings, e.g. `parse("Integer", "Integer String String")`.
    pub fn parse(key: &str, tuple: &str) -> IndexResult<Self> {
        Self::new(Domain::parse_list(key)?, Domain::parse_list(tuple)?)
    }

    pub fn key(&self) -> &[Domain] {
        &self.key
    }

    pub fn tuple(&self) -> &[Domain] {
        &self.tuple
    }

    pub fn check_key(&self, key: &CompositeKey) -> IndexResult<()> {
        check_conformance(&self.key, key.components())
    }

    pub fn check_tuple(&self, tuple: &[Value]) -> IndexResult<()> {
        check_conformance(&self.tuple, tuple)
    }
}

fn check_conformance(expected: &[Domain], values: &[Value]) -> IndexResult<()> {
    if expected.len() != values.len() {
        return Err(IndexError::ArityMismatch {
            expected: expected.len(),
            found: values.len(),
        });
    }
    for (position, (domain, value)) in expected.iter().zip(values).enumerate() {
        if value.domain() != *domain {
            return Err(IndexError::TypeMismatch {
                position,
                expected: *domain,
                found: value.domain(),
            });
        }
    }
    Ok(())
}
