//! Command line front end: compile a style snapshot file to CSS.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cascade_css::{generate_css, CssConfig};

/// Compile a JSON or YAML style snapshot into CSS.
#[derive(Debug, Parser)]
#[command(name = "cascade-css", version, about)]
struct Args {
    /// Snapshot file (.json, .yaml or .yml).
    input: PathBuf,

    /// Emit one content-addressed class per declaration.
    #[arg(long)]
    atomic: bool,

    /// Write CSS here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the instance class map as JSON.
    #[arg(long)]
    classes: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = CssConfig::from_path(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    config.atomic |= args.atomic;

    let generated = generate_css(&config);
    info!(
        "compiled {} bytes of CSS for {} instances",
        generated.css_text.len(),
        generated.classes.len()
    );

    match &args.output {
        Some(path) => fs::write(path, &generated.css_text)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", generated.css_text),
    }

    if let Some(path) = &args.classes {
        let json = serde_json::to_string_pretty(&generated.classes)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
