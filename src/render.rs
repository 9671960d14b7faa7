//! Spec → standalone HTML document.

use crate::encode::{self, ScalarAdapters};
use crate::spec::VisualizationSpec;
use crate::template::{self, Fields, TemplateSource};
use crate::Result;

use log::debug;
use serde_json::Value;
use std::any::Any;
use std::path::{Path, PathBuf};

/// Renders specs into HTML and saves them to disk.
///
/// The renderer holds configuration only (template source and scalar
/// adapters); every call loads the template afresh.
///
/// # Examples
///
/// ```
/// use vega_html::{ChartSpec, HtmlRenderer, VisualizationSpec};
///
/// let mut spec = ChartSpec::from_json(r#"{"mark": "bar", "width": 200, "height": 100}"#)?;
/// let html = HtmlRenderer::new().render(&mut spec, Some(640), None)?;
/// assert!(html.contains("640"));
/// assert_eq!(spec.width(), 640);
/// assert_eq!(spec.height(), 100);
/// # Ok::<(), vega_html::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    template: TemplateSource,
    adapters: ScalarAdapters,
}

impl HtmlRenderer {
    /// Bundled template and the default scalar adapters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: TemplateSource) -> Self {
        self.template = template;
        self
    }

    /// Read the template from `path` on every render.
    pub fn with_template_path(self, path: impl Into<PathBuf>) -> Self {
        self.with_template(TemplateSource::Path(path.into()))
    }

    /// Replace the whole adapter registry.
    pub fn with_adapters(mut self, adapters: ScalarAdapters) -> Self {
        self.adapters = adapters;
        self
    }

    /// Add (or replace) the converter for foreign scalars of type `T`.
    pub fn with_adapter<T, F>(mut self, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.adapters.register::<T, F>(convert);
        self
    }

    pub fn template(&self) -> &TemplateSource {
        &self.template
    }

    pub fn adapters(&self) -> &ScalarAdapters {
        &self.adapters
    }

    /// Render `spec` to an HTML string.
    ///
    /// A given `width`/`height` is written into the spec before it is
    /// serialized, so the spec keeps the override afterwards. Without an
    /// override the stored value is used and left untouched.
    pub fn render<S>(&self, spec: &mut S, width: Option<u32>, height: Option<u32>) -> Result<String>
    where
        S: VisualizationSpec + ?Sized,
    {
        let width = match width {
            Some(w) => {
                spec.set_width(w);
                w
            }
            None => spec.width(),
        };
        let height = match height {
            Some(h) => {
                spec.set_height(h);
                h
            }
            None => spec.height(),
        };

        let plain = spec.to_plain()?;
        let json = encode::to_json(&plain, &self.adapters)?;
        let escaped = escape_json(&json);

        let source = self.template.load()?;
        let name = self.template.name();
        debug!(
            "rendering {}x{} spec ({} bytes of JSON) with template {}",
            width,
            height,
            json.len(),
            name
        );

        let html = template::substitute(
            &name,
            &source,
            Fields {
                spec: &escaped,
                width,
                height,
            },
        )?;
        debug!("rendered {} bytes of HTML", html.len());
        Ok(html)
    }

    /// Render `spec` and write it to `path` (see [`crate::save`]).
    pub fn save<S>(
        &self,
        spec: &mut S,
        path: impl AsRef<Path>,
        overwrite: bool,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<PathBuf>
    where
        S: VisualizationSpec + ?Sized,
    {
        crate::save::save_with(self, spec, path.as_ref(), overwrite, width, height)
    }
}

/// HTML-entity-escape JSON text for embedding in an attribute or script body.
///
/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_json(json: &str) -> String {
    htmlize::escape_all_quotes(json).into_owned()
}
