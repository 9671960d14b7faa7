//! JSON encoding of [`PlainValue`] trees.
//!
//! Native variants follow standard JSON rules. [`PlainValue::Foreign`]
//! scalars are looked up by `TypeId` in a [`ScalarAdapters`] registry and
//! replaced by the primitive the adapter returns. A foreign type with no
//! adapter, or a non-finite float, is a serialization error.

use crate::value::{ForeignScalar, PlainValue};
use crate::{Error, Result};

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts a type-erased scalar into a native JSON primitive.
///
/// Returning `None` means the value could not be represented.
pub type ScalarAdapter = Arc<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;

/// Registry of foreign scalar converters keyed by the scalar's concrete type.
#[derive(Clone)]
pub struct ScalarAdapters {
    adapters: HashMap<TypeId, ScalarAdapter>,
}

impl ScalarAdapters {
    /// An empty registry: every foreign scalar fails to encode.
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register (or replace) the converter for `T`.
    pub fn register<T, F>(&mut self, convert: F)
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.register_fallible::<T, _>(move |v| Some(convert(v)));
    }

    /// Register a converter that may reject individual values.
    pub fn register_fallible<T, F>(&mut self, convert: F)
    where
        T: Any,
        F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
    {
        let adapter: ScalarAdapter =
            Arc::new(move |any: &dyn Any| any.downcast_ref::<T>().and_then(&convert));
        self.adapters.insert(TypeId::of::<T>(), adapter);
    }

    /// Builder form of [`ScalarAdapters::register`].
    pub fn with<T, F>(mut self, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.register::<T, F>(convert);
        self
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.adapters.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Reduce a foreign scalar to a JSON primitive.
    pub fn convert(&self, scalar: &ForeignScalar) -> Result<Value> {
        let adapter = self.adapters.get(&scalar.type_id()).ok_or_else(|| {
            Error::SerializationError(format!(
                "Object of type {} is not JSON serializable",
                scalar.type_name()
            ))
        })?;
        let value = adapter(scalar.as_any()).ok_or_else(|| {
            Error::SerializationError(format!("{:?} has no JSON representation", scalar))
        })?;
        match value {
            Value::Array(_) | Value::Object(_) => Err(Error::SerializationError(format!(
                "adapter for {} must produce a primitive, got {}",
                scalar.type_name(),
                value
            ))),
            primitive => Ok(primitive),
        }
    }
}

macro_rules! register_int {
    ($reg:expr, $($t:ty),*) => {
        $( $reg.register::<$t, _>(|v| Value::from(*v)); )*
    };
}

impl Default for ScalarAdapters {
    /// Adapters for every primitive integer and float type, `bool` and `char`.
    fn default() -> Self {
        let mut reg = Self::empty();
        register_int!(reg, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
        // 128-bit values only fit when they are in the 64-bit range
        reg.register_fallible::<i128, _>(|v| {
            i64::try_from(*v)
                .map(Value::from)
                .or_else(|_| u64::try_from(*v).map(Value::from))
                .ok()
        });
        reg.register_fallible::<u128, _>(|v| u64::try_from(*v).map(Value::from).ok());
        reg.register_fallible::<f32, _>(|v| float_value(f64::from(*v)));
        reg.register_fallible::<f64, _>(|v| float_value(*v));
        reg.register::<bool, _>(|v| Value::Bool(*v));
        reg.register::<char, _>(|v| Value::String(v.to_string()));
        reg
    }
}

impl fmt::Debug for ScalarAdapters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarAdapters")
            .field("registered", &self.adapters.len())
            .finish()
    }
}

// NaN and infinities have no JSON number form
fn float_value(f: f64) -> Option<Value> {
    serde_json::Number::from_f64(f).map(Value::Number)
}

/// Serialize adapter pairing a value tree with the registry used for its
/// foreign scalars.
pub struct Encoded<'a> {
    value: &'a PlainValue,
    adapters: &'a ScalarAdapters,
}

impl<'a> Encoded<'a> {
    pub fn new(value: &'a PlainValue, adapters: &'a ScalarAdapters) -> Self {
        Self { value, adapters }
    }

    fn child(&self, value: &'a PlainValue) -> Self {
        Self {
            value,
            adapters: self.adapters,
        }
    }
}

impl Serialize for Encoded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value {
            PlainValue::Null => serializer.serialize_unit(),
            PlainValue::Bool(b) => serializer.serialize_bool(*b),
            PlainValue::Int(i) => serializer.serialize_i64(*i),
            PlainValue::UInt(u) => serializer.serialize_u64(*u),
            PlainValue::Float(f) => {
                if !f.is_finite() {
                    return Err(S::Error::custom(format!(
                        "Out of range float value is not JSON compliant: {}",
                        f
                    )));
                }
                serializer.serialize_f64(*f)
            }
            PlainValue::String(s) => serializer.serialize_str(s),
            PlainValue::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            PlainValue::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, &self.child(v))?;
                }
                out.end()
            }
            PlainValue::Foreign(scalar) => {
                let value = self
                    .adapters
                    .convert(scalar)
                    .map_err(|e| S::Error::custom(error_message(e)))?;
                value.serialize(serializer)
            }
        }
    }
}

fn error_message(err: Error) -> String {
    match err {
        Error::SerializationError(msg) => msg,
        other => other.to_string(),
    }
}

/// Encode a value tree to compact JSON text.
pub fn to_json(value: &PlainValue, adapters: &ScalarAdapters) -> Result<String> {
    Ok(serde_json::to_string(&Encoded::new(value, adapters))?)
}

/// Encode a value tree to a `serde_json::Value`, reducing foreign scalars.
pub fn to_value(value: &PlainValue, adapters: &ScalarAdapters) -> Result<Value> {
    Ok(serde_json::to_value(Encoded::new(value, adapters))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PlainMap;

    #[derive(Debug, Clone, PartialEq)]
    struct Meters(f32);

    #[derive(Debug, Clone, PartialEq)]
    struct Opaque;

    fn map(entries: Vec<(&str, PlainValue)>) -> PlainValue {
        PlainValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<PlainMap>(),
        )
    }

    #[test]
    fn native_values_encode_as_standard_json() {
        let v = map(vec![
            ("mark", "bar".into()),
            ("n", PlainValue::Int(-3)),
            ("big", PlainValue::UInt(u64::MAX)),
            ("x", PlainValue::Float(0.25)),
            ("ok", true.into()),
            ("none", PlainValue::Null),
            ("list", vec![PlainValue::Int(1), PlainValue::Int(2)].into()),
        ]);
        let json = to_json(&v, &ScalarAdapters::default()).unwrap();
        assert_eq!(
            json,
            r#"{"mark":"bar","n":-3,"big":18446744073709551615,"x":0.25,"ok":true,"none":null,"list":[1,2]}"#
        );
    }

    #[test]
    fn default_adapters_reduce_primitive_scalars() {
        let v = vec![
            PlainValue::foreign(7u8),
            PlainValue::foreign(-12i16),
            PlainValue::foreign(1.5f32),
            PlainValue::foreign(true),
            PlainValue::foreign('x'),
            PlainValue::foreign(42u128),
        ]
        .into();
        let json = to_json(&v, &ScalarAdapters::default()).unwrap();
        assert_eq!(json, r#"[7,-12,1.5,true,"x",42]"#);
    }

    #[test]
    fn default_registry_covers_every_primitive() {
        // ten fixed-width and pointer-sized ints, two 128-bit ints, two floats, bool, char
        let adapters = ScalarAdapters::default();
        assert_eq!(adapters.len(), 16);
        assert!(adapters.contains::<isize>());
        assert!(adapters.contains::<char>());
        assert!(!adapters.contains::<String>());
    }

    #[test]
    fn unregistered_foreign_type_is_an_error() {
        let v = map(vec![("x", PlainValue::foreign(Opaque))]);
        let err = to_json(&v, &ScalarAdapters::default()).unwrap_err();
        match err {
            Error::SerializationError(msg) => {
                assert!(msg.contains("Opaque"), "{}", msg);
                assert!(msg.contains("not JSON serializable"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn custom_adapter_is_used() {
        let adapters = ScalarAdapters::default().with::<Meters, _>(|m| Value::from(f64::from(m.0)));
        assert!(adapters.contains::<Meters>());
        assert_eq!(adapters.len(), ScalarAdapters::default().len() + 1);
        let v = vec![PlainValue::foreign(Meters(2.5))].into();
        assert_eq!(to_json(&v, &adapters).unwrap(), "[2.5]");
    }

    #[test]
    fn empty_registry_rejects_even_primitives() {
        let adapters = ScalarAdapters::empty();
        assert!(adapters.is_empty());
        assert_eq!(adapters.len(), 0);
        let v = PlainValue::foreign(1u8);
        assert!(matches!(
            to_json(&v, &adapters),
            Err(Error::SerializationError(_))
        ));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let adapters = ScalarAdapters::default();
        assert!(to_json(&PlainValue::Float(f64::NAN), &adapters).is_err());
        assert!(to_json(&PlainValue::Float(f64::INFINITY), &adapters).is_err());
        assert!(to_json(&PlainValue::foreign(f32::NAN), &adapters).is_err());
    }

    #[test]
    fn out_of_range_u128_is_rejected() {
        let v = PlainValue::foreign(u128::MAX);
        assert!(to_json(&v, &ScalarAdapters::default()).is_err());
    }

    #[test]
    fn adapters_must_return_primitives() {
        let adapters = ScalarAdapters::empty().with::<Meters, _>(|m| serde_json::json!([m.0]));
        let err = adapters.convert(&ForeignScalar::new(Meters(1.0))).unwrap_err();
        assert!(err.to_string().contains("primitive"), "{}", err);
    }

    #[test]
    fn to_value_matches_to_json() {
        let v = map(vec![("w", PlainValue::foreign(3i32)), ("s", "a<b".into())]);
        let adapters = ScalarAdapters::default();
        let value = to_value(&v, &adapters).unwrap();
        let parsed: Value = serde_json::from_str(&to_json(&v, &adapters).unwrap()).unwrap();
        assert_eq!(value, parsed);
        assert_eq!(value, serde_json::json!({"w": 3, "s": "a<b"}));
    }
}
