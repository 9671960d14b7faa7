//! HTML template loading and named-placeholder substitution.
//!
//! Templates use Jinja syntax and expose three values: `spec` (the escaped
//! JSON text), `width` and `height`. The template text is loaded on every
//! render; nothing is cached between calls.

use crate::{Error, Result};

use minijinja::{context, Environment, UndefinedBehavior, Value};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Name under which the bundled template is registered
pub const BUNDLED_TEMPLATE_NAME: &str = "template.html";

/// Template shipped with the crate
pub const BUNDLED_TEMPLATE: &str = include_str!("../templates/template.html");

/// Where the renderer gets its template text from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// The template compiled into the crate
    #[default]
    Bundled,
    /// A template file read from disk on every render
    Path(PathBuf),
}

impl TemplateSource {
    /// Load the template text.
    pub fn load(&self) -> Result<Cow<'static, str>> {
        match self {
            TemplateSource::Bundled => Ok(Cow::Borrowed(BUNDLED_TEMPLATE)),
            TemplateSource::Path(path) => match fs::read_to_string(path) {
                Ok(text) => Ok(Cow::Owned(text)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    Err(Error::TemplateNotFoundError(path.clone()))
                }
                Err(e) => Err(Error::io(path, e)),
            },
        }
    }

    /// Template name used for error messages and auto-escape selection.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            TemplateSource::Bundled => Cow::Borrowed(BUNDLED_TEMPLATE_NAME),
            TemplateSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or(Cow::Borrowed(BUNDLED_TEMPLATE_NAME)),
        }
    }
}

/// Values substituted into the template
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    /// JSON text that is already HTML-escaped
    pub spec: &'a str,
    pub width: u32,
    pub height: u32,
}

/// Render `source` with the three named fields.
///
/// `spec` is passed as a safe string so HTML auto-escaping does not apply a
/// second time. Referencing any other variable is an error.
pub fn substitute(name: &str, source: &str, fields: Fields<'_>) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    let template = env.template_from_named_str(name, source)?;
    let html = template.render(context! {
        spec => Value::from_safe_string(fields.spec.to_string()),
        width => fields.width,
        height => fields.height,
    })?;
    Ok(html)
}
