use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use vega_html::{ChartSpec, HtmlRenderer};

#[derive(Parser)]
#[command(name = "vega-html")]
#[command(about = "Render a Vega-Lite JSON spec into a standalone HTML page", long_about = None)]
struct Cli {
    /// Vega-Lite spec (JSON file)
    spec: PathBuf,

    /// Write to this file (".html" is appended if missing) instead of stdout
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Replace an existing output file
    #[arg(long)]
    overwrite: bool,

    /// Chart width in pixels (overrides the spec)
    #[arg(long)]
    width: Option<u32>,

    /// Chart height in pixels (overrides the spec)
    #[arg(long)]
    height: Option<u32>,

    /// Jinja template to use instead of the bundled one
    #[arg(long)]
    template: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.spec)
        .with_context(|| format!("read spec {}", cli.spec.display()))?;
    let mut spec = ChartSpec::from_json(&text)
        .with_context(|| format!("parse spec {}", cli.spec.display()))?;

    let mut renderer = HtmlRenderer::new();
    if let Some(template) = cli.template {
        renderer = renderer.with_template_path(template);
    }

    match cli.out {
        Some(out) => {
            let written = renderer
                .save(&mut spec, &out, cli.overwrite, cli.width, cli.height)
                .with_context(|| format!("save {}", out.display()))?;
            eprintln!("Wrote {}", written.display());
        }
        None => {
            let html = renderer
                .render(&mut spec, cli.width, cli.height)
                .context("render spec")?;
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(html.as_bytes())?;
            lock.flush()?;
        }
    }

    Ok(())
}
