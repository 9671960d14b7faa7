//! Visualization specs: the trait the renderer consumes and a JSON-backed chart.

use crate::value::{PlainMap, PlainValue};
use crate::{Error, Result};

/// Chart dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

/// A spec the renderer can size and serialize.
///
/// Implementors own a mutable [`Viewport`] and can produce a plain value
/// tree. Rendering with explicit dimensions writes them back through
/// [`VisualizationSpec::viewport_mut`].
pub trait VisualizationSpec {
    /// Stored dimensions
    fn viewport(&self) -> Viewport;

    /// Mutable access to the stored dimensions
    fn viewport_mut(&mut self) -> &mut Viewport;

    /// Produce the plain nested structure that gets JSON-encoded
    fn to_plain(&self) -> Result<PlainValue>;

    fn width(&self) -> u32 {
        self.viewport().width
    }

    fn height(&self) -> u32 {
        self.viewport().height
    }

    fn set_width(&mut self, width: u32) {
        self.viewport_mut().width = width;
    }

    fn set_height(&mut self, height: u32) {
        self.viewport_mut().height = height;
    }
}

/// A Vega-Lite style chart held as an ordered map.
///
/// Numeric top-level `width` and `height` live in the [`Viewport`]; everything
/// else stays in `body`. The plain form re-inserts the viewport so the
/// embedded JSON agrees with the rendered dimensions. A non-numeric
/// dimension (`"container"`, `{"step": 40}`) is emitted from `body` until an
/// override replaces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSpec {
    pub viewport: Viewport,
    pub body: PlainMap,
}

impl ChartSpec {
    pub fn new(body: PlainMap) -> Self {
        Self {
            viewport: Viewport::default(),
            body,
        }
    }

    /// Builder: set the stored dimensions.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    /// Insert a top-level field.
    ///
    /// A `width`/`height` that is a whole pixel count (including integral
    /// floats such as `400.0`) goes to the viewport. Any other value, such as
    /// `"container"` or `{"step": 40}`, is kept in `body` and emitted as-is
    /// until a dimension override replaces it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PlainValue>) {
        let key = key.into();
        let value = value.into();
        match (key.as_str(), dimension(&value)) {
            ("width", Some(px)) => self.set_width(px),
            ("height", Some(px)) => self.set_height(px),
            _ => {
                self.body.insert(key, value);
            }
        }
    }

    /// Build a chart from a JSON value; the root must be an object.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(Error::InvalidSpec(format!(
                "spec root must be a JSON object, got {}",
                json_kind(&value)
            )));
        };

        let mut spec = ChartSpec::default();
        for (key, value) in map {
            spec.insert(key, PlainValue::from(value));
        }
        Ok(spec)
    }

    /// Parse a chart from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| Error::InvalidSpec(format!("malformed JSON: {}", e)))?;
        Self::from_value(value)
    }
}

impl VisualizationSpec for ChartSpec {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    fn set_width(&mut self, width: u32) {
        self.viewport.width = width;
        self.body.shift_remove("width");
    }

    fn set_height(&mut self, height: u32) {
        self.viewport.height = height;
        self.body.shift_remove("height");
    }

    fn to_plain(&self) -> Result<PlainValue> {
        let mut out = PlainMap::with_capacity(self.body.len() + 2);
        // A leading $schema stays first so the output reads like a hand-written spec
        if let Some(schema) = self.body.get("$schema") {
            out.insert("$schema".to_string(), schema.clone());
        }
        let width = self
            .body
            .get("width")
            .cloned()
            .unwrap_or_else(|| PlainValue::from(self.viewport.width));
        let height = self
            .body
            .get("height")
            .cloned()
            .unwrap_or_else(|| PlainValue::from(self.viewport.height));
        out.insert("width".to_string(), width);
        out.insert("height".to_string(), height);
        for (k, v) in &self.body {
            if !matches!(k.as_str(), "$schema" | "width" | "height") {
                out.insert(k.clone(), v.clone());
            }
        }
        Ok(PlainValue::Map(out))
    }
}

fn dimension(value: &PlainValue) -> Option<u32> {
    match value {
        PlainValue::Int(i) => u32::try_from(*i).ok(),
        PlainValue::UInt(u) => u32::try_from(*u).ok(),
        PlainValue::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f) => {
            Some(*f as u32)
        }
        _ => None,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
