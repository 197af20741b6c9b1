//! micrography CLI - Redraw an image with the characters of a text

use clap::Parser;
use log::{error, info};
use micrography::{Config, HttpAcquirer, Micrographer, MicrographyError, OutputFormat, SourceImage};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "micrography", about = "Redraw an image with the characters of a text")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// Text source: quran, sefaria or custom
    #[arg(short, long, default_value = "custom")]
    source: String,
    /// Scripture reference, e.g. '2:255' or 'Genesis 1'
    #[arg(short, long, default_value = "")]
    reference: String,
    /// Custom text (required with --source custom)
    #[arg(short, long)]
    text: Option<String>,
    /// Pixel stride between sampled grid points
    #[arg(short, long, default_value = "5", allow_negative_numbers = true)]
    density: i64,
    /// Script of the text: he or ar
    #[arg(short, long, default_value = "he")]
    language: String,
    /// Font name registered for the language
    #[arg(short, long)]
    font: String,
    /// Draw glyphs at half opacity
    #[arg(long)]
    transparent: bool,
    /// Write PNG instead of JPEG
    #[arg(long)]
    png: bool,
    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u8>,
    /// Output file (default: micrography.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also print the image as a data URI
    #[arg(long)]
    data_uri: bool,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding the stock fonts
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), MicrographyError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = args.fonts_dir {
        config.fonts.dir = dir;
    }
    let format = if args.png {
        OutputFormat::Png
    } else {
        match args.quality {
            Some(quality) => OutputFormat::Jpeg { quality },
            None => config.output.format(),
        }
    };

    let micrographer = Micrographer::new(config.font_registry()?, HttpAcquirer::new(&config.providers))
        .with_format(format);

    let image = SourceImage::open(&args.input)?;
    info!("loaded {} ({}x{})", args.input.display(), image.width(), image.height());

    let artifact = micrography::generate(
        &micrographer,
        &args.source,
        &args.reference,
        &image,
        args.density,
        &args.language,
        &args.font,
        args.transparent,
        args.text.as_deref(),
    )?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("micrography.{}", artifact.format.extension())));
    std::fs::write(&output, &artifact.bytes)?;
    info!("wrote {} bytes to {}", artifact.bytes.len(), output.display());

    println!("Text used in the micrography: {}", artifact.text);
    if args.data_uri {
        println!("{}", artifact.data_uri());
    }
    Ok(())
}
