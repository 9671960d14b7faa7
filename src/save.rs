//! Writing rendered documents to disk with an overwrite guard.

use crate::render::HtmlRenderer;
use crate::spec::VisualizationSpec;
use crate::{Error, Result};

use log::{debug, info};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append `.html` unless the path's extension already is exactly `html`.
///
/// The suffix is appended to the whole file name, so `chart.txt` becomes
/// `chart.txt.html`.
pub fn html_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "html") {
        return path.to_path_buf();
    }
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".html");
    PathBuf::from(name)
}

pub(crate) fn save_with<S>(
    renderer: &HtmlRenderer,
    spec: &mut S,
    path: &Path,
    overwrite: bool,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<PathBuf>
where
    S: VisualizationSpec + ?Sized,
{
    let path = html_path(path);

    if path.exists() {
        if !overwrite {
            return Err(Error::FileExistsError(path));
        }
        // Not atomic: a failure past this point leaves no file behind
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        debug!("removed existing {}", path.display());
    }

    let html = renderer.render(spec, width, height)?;

    let mut file = File::create(&path).map_err(|e| Error::io(&path, e))?;
    file.write_all(html.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| Error::io(&path, e))?;

    info!("wrote {} ({} bytes)", path.display(), html.len());
    Ok(path)
}
