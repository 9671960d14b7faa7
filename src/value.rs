//! Plain nested structure produced by a spec before JSON encoding.
//!
//! `PlainValue` mirrors JSON (null, booleans, numbers, strings, sequences and
//! string-keyed maps) with one extra variant, [`PlainValue::Foreign`], which
//! carries a scalar from a numeric library that JSON does not know about.
//! Foreign scalars are reduced to primitives by the encoder's adapter
//! registry (see [`crate::encode::ScalarAdapters`]).

use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::fmt;

/// Ordered string-keyed map of plain values
pub type PlainMap = IndexMap<String, PlainValue>;

/// A JSON-like value tree with support for foreign scalars
#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Seq(Vec<PlainValue>),
    Map(PlainMap),
    /// A scalar from an external numeric type, converted at encode time
    Foreign(ForeignScalar),
}

impl PlainValue {
    /// Wrap any `'static` scalar as a foreign value.
    pub fn foreign<T>(value: T) -> Self
    where
        T: Any + Clone + Send + Sync + fmt::Debug + PartialEq,
    {
        PlainValue::Foreign(ForeignScalar::new(value))
    }

    /// Borrow the map if this value is one.
    pub fn as_map(&self) -> Option<&PlainMap> {
        match self {
            PlainValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PlainValue::Null)
    }
}

impl From<serde_json::Value> for PlainValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => PlainValue::Null,
            Value::Bool(b) => PlainValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PlainValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    PlainValue::UInt(u)
                } else {
                    // serde_json without arbitrary_precision always has an f64 here
                    PlainValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => PlainValue::String(s),
            Value::Array(items) => PlainValue::Seq(items.into_iter().map(PlainValue::from).collect()),
            Value::Object(map) => PlainValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, PlainValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for PlainValue {
    fn from(b: bool) -> Self {
        PlainValue::Bool(b)
    }
}

impl From<i64> for PlainValue {
    fn from(i: i64) -> Self {
        PlainValue::Int(i)
    }
}

impl From<u64> for PlainValue {
    fn from(u: u64) -> Self {
        PlainValue::UInt(u)
    }
}

impl From<u32> for PlainValue {
    fn from(u: u32) -> Self {
        PlainValue::UInt(u64::from(u))
    }
}

impl From<f64> for PlainValue {
    fn from(f: f64) -> Self {
        PlainValue::Float(f)
    }
}

impl From<&str> for PlainValue {
    fn from(s: &str) -> Self {
        PlainValue::String(s.to_string())
    }
}

impl From<String> for PlainValue {
    fn from(s: String) -> Self {
        PlainValue::String(s)
    }
}

impl From<Vec<PlainValue>> for PlainValue {
    fn from(items: Vec<PlainValue>) -> Self {
        PlainValue::Seq(items)
    }
}

impl From<PlainMap> for PlainValue {
    fn from(map: PlainMap) -> Self {
        PlainValue::Map(map)
    }
}

/// Object-safe view of a foreign scalar.
trait ScalarObject: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn ScalarObject>;
    fn eq_dyn(&self, other: &dyn ScalarObject) -> bool;
    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> ScalarObject for T
where
    T: Any + Clone + Send + Sync + fmt::Debug + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn ScalarObject> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn ScalarObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|o| o == self)
    }

    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A type-erased scalar value plus the name of its concrete type.
///
/// The type name is kept for error messages when no adapter is registered.
pub struct ForeignScalar {
    type_id: TypeId,
    type_name: &'static str,
    inner: Box<dyn ScalarObject>,
}

impl ForeignScalar {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + Send + Sync + fmt::Debug + PartialEq,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            inner: Box::new(value),
        }
    }

    /// Rust type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `TypeId` of the wrapped value, used for adapter lookup
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Borrow the wrapped value as `&dyn Any`.
    pub fn as_any(&self) -> &dyn Any {
        self.inner.as_any()
    }

    /// Downcast to the concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }
}

impl Clone for ForeignScalar {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for ForeignScalar {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.inner.eq_dyn(other.inner.as_ref())
    }
}

impl fmt::Debug for ForeignScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Foreign<{}>(", self.type_name)?;
        self.inner.fmt_dyn(f)?;
        write!(f, ")")
    }
}
