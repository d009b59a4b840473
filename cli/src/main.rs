use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use inkmark_shared::config::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};
use inkmark_shared::{AnnotationSurface, ExportFormat, LoadOutcome, SurfaceConfig};

mod logging;
mod script;

use crate::script::{parse_stroke_script, replay};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Jpeg,
}

/// Mark up an image with freehand strokes and write the flattened result.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image to annotate (PNG, JPEG, GIF, BMP or WebP).
    image: PathBuf,
    /// JSON stroke script in display coordinates.
    #[arg(long)]
    strokes: Option<PathBuf>,
    /// Where to write the encoded composite.
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
    max_width: u32,
    #[arg(long, default_value_t = DEFAULT_MAX_HEIGHT)]
    max_height: u32,
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,
    /// JPEG quality, 1-100.
    #[arg(long, default_value_t = 90)]
    quality: u8,
    /// Print a data URI to stdout instead of writing a file.
    #[arg(long)]
    data_uri: bool,
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn export_format(&self) -> ExportFormat {
        match self.format {
            Format::Png => ExportFormat::Png,
            Format::Jpeg => ExportFormat::Jpeg {
                quality: self.quality,
            },
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| annotated_path(&self.image, self.format))
    }
}

fn annotated_path(image: &Path, format: Format) -> PathBuf {
    let extension = match format {
        Format::Png => "annotated.png",
        Format::Jpeg => "annotated.jpg",
    };
    image.with_extension(extension)
}

async fn run(args: &Args) -> Result<Option<PathBuf>> {
    let mut surface =
        AnnotationSurface::new(SurfaceConfig::with_bounds(args.max_width, args.max_height))?;
    surface.on_selection_changed(|exists| info!(exists, "selection changed"));

    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("cannot read {}", args.image.display()))?;
    let Some(request) = surface.request_load(Some(bytes)) else {
        bail!("no image source");
    };
    let completion = tokio::task::spawn_blocking(move || request.decode()).await?;
    let outcome = surface
        .finish_load(completion)
        .with_context(|| format!("cannot decode {}", args.image.display()))?;
    if let LoadOutcome::Loaded {
        natural,
        display: shown,
        scale,
    } = outcome
    {
        info!(
            natural_width = natural.width,
            natural_height = natural.height,
            display_width = shown.width,
            display_height = shown.height,
            scale,
            "image loaded"
        );
    }

    if let Some(path) = &args.strokes {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let strokes = parse_stroke_script(&text)?;
        let summary = replay(&mut surface, &strokes);
        info!(
            committed = summary.committed,
            discarded = summary.discarded,
            "strokes replayed"
        );
    }

    let exported = surface
        .export_as(args.export_format())?
        .context("nothing to export")?;
    if args.data_uri {
        println!("{}", exported.to_data_uri());
        return Ok(None);
    }
    let path = args.output_path();
    tokio::fs::write(&path, exported.bytes())
        .await
        .with_context(|| format!("cannot write {}", path.display()))?;
    info!(
        path = %path.display(),
        width = exported.width,
        height = exported.height,
        "composite written"
    );
    Ok(Some(path))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbose);
    if let Err(error) = run(&args).await {
        eprintln!("inkmark: {error:#}");
        std::process::exit(1);
    }
}
