//! vega-html
//!
//! Render Vega-Lite visualization specs into standalone HTML documents.
//! The spec is serialized to JSON, HTML-escaped and embedded into a template
//! that loads the Vega runtime from a CDN, together with the chart's width
//! and height.
//!
//! # Features
//!
//! - **Dimension overrides**: explicit width/height are written back into the spec
//! - **Foreign scalars**: numeric types outside JSON are reduced through a
//!   pluggable adapter registry before encoding
//! - **Templates**: the bundled template or any Jinja template on disk
//! - **Safe saving**: `.html` suffixing and an explicit overwrite switch
//!
//! # Example
//!
//! ```no_run
//! use vega_html::ChartSpec;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut spec = ChartSpec::from_json(r#"{
//!     "mark": "bar",
//!     "data": {"values": [{"a": "A", "b": 28}, {"a": "B", "b": 55}]},
//!     "encoding": {
//!         "x": {"field": "a", "type": "nominal"},
//!         "y": {"field": "b", "type": "quantitative"}
//!     }
//! }"#)?;
//!
//! let html = vega_html::render(&mut spec, Some(640), Some(480))?;
//! println!("{} bytes", html.len());
//!
//! let written = vega_html::save(&mut spec, "chart", false, None, None)?;
//! assert!(written.ends_with("chart.html"));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result};

pub mod encode;
pub mod render;
pub mod save;
pub mod spec;
pub mod template;
pub mod value;

pub use encode::{ScalarAdapter, ScalarAdapters};
pub use render::HtmlRenderer;
pub use spec::{ChartSpec, Viewport, VisualizationSpec};
pub use template::TemplateSource;
pub use value::{ForeignScalar, PlainMap, PlainValue};

/// Render a spec to HTML with the bundled template and default adapters.
///
/// Given dimensions are written into the spec (see [`HtmlRenderer::render`]).
pub fn render<S>(spec: &mut S, width: Option<u32>, height: Option<u32>) -> Result<String>
where
    S: VisualizationSpec + ?Sized,
{
    HtmlRenderer::new().render(spec, width, height)
}

/// Render a spec and write it to `path`.
///
/// `.html` is appended unless already present. An existing file is an
/// [`Error::FileExistsError`] unless `overwrite` is set, in which case it is
/// removed before the new document is written. Returns the path written.
pub fn save<S>(
    spec: &mut S,
    path: impl AsRef<Path>,
    overwrite: bool,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<PathBuf>
where
    S: VisualizationSpec + ?Sized,
{
    HtmlRenderer::new().save(spec, path, overwrite, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renderer() {
        let renderer = HtmlRenderer::default();
        assert_eq!(renderer.template(), &TemplateSource::Bundled);
        assert!(renderer.adapters().contains::<f32>());
        assert!(renderer.adapters().contains::<u128>());
    }

    #[test]
    fn test_render_accepts_trait_objects() {
        let mut chart = ChartSpec::default().with_viewport(12, 34);
        let spec: &mut dyn VisualizationSpec = &mut chart;
        let html = render(spec, None, Some(56)).unwrap();
        assert!(html.contains("width: 12px; height: 56px;"));
        assert_eq!(chart.viewport, Viewport { width: 12, height: 56 });
    }
}
