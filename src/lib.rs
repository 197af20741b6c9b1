//! Image to micrography converter: redraws a picture with the characters of a text.

#[cfg(not(target_arch = "wasm32"))]
pub mod acquire;
pub mod config;
pub mod encode;
pub mod fonts;
pub mod normalize;
pub mod render;
pub mod shaping;
pub mod text;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub use acquire::HttpAcquirer;
pub use config::Config;
pub use encode::{OutputArtifact, OutputFormat};
pub use fonts::FontRegistry;
pub use normalize::{normalize_image, SourceImage};
pub use render::{Canvas, GlyphSink, GridWalk};
pub use text::{normalize_text, Language, NormalizedText, Provider, TextSource};

use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MicrographyError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("Text is empty after normalization")]
    EmptyText,
    #[error("Render error: {0}")]
    Render(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MicrographyError>;

/// Resolves a text source descriptor to raw text.
///
/// Implementations may block; the pipeline adds no timeout or retry around the call.
pub trait TextAcquirer {
    fn fetch(&self, source: &TextSource) -> Result<String>;
}

/// Everything one invocation needs besides the image.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub source: TextSource,
    pub sample_density: u32,
    pub language: Language,
    pub font: String,
    pub transparent_text: bool,
}

/// Main generator: owns the font registry and the text acquirer, both immutable.
pub struct Micrographer<A> {
    fonts: FontRegistry,
    acquirer: A,
    format: OutputFormat,
}

impl<A: TextAcquirer> Micrographer<A> {
    pub fn new(fonts: FontRegistry, acquirer: A) -> Self {
        Self { fonts, acquirer, format: OutputFormat::default() }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn acquirer(&self) -> &A {
        &self.acquirer
    }

    /// Run the whole pipeline. Any stage failure aborts it.
    pub fn generate(&self, request: &GenerateRequest, source: &SourceImage) -> Result<OutputArtifact> {
        if request.sample_density == 0 {
            return Err(MicrographyError::Validation(
                "sample density must be greater than zero".into(),
            ));
        }
        // Resolve before any fetch so an unknown font never costs a network call
        let font_path = self.fonts.resolve(request.language, &request.font)?;

        let image = normalize_image(source)?;
        debug!("normalized image to {}x{}", image.width(), image.height());

        let raw = self.acquirer.fetch(&request.source)?;
        let text = normalize_text(&raw, &request.source, request.language)?;
        debug!("normalized text has {} chars", text.len());

        let font = fonts::load_font(font_path)?;
        let mut canvas = Canvas::new(
            image.width(),
            image.height(),
            request.sample_density,
            &font,
            request.transparent_text,
        );
        let drawn = render::render_into(&mut canvas, &image, &text, request.sample_density);
        info!(
            "rendered {} glyphs on a {}x{} canvas",
            drawn,
            canvas.image().width(),
            canvas.image().height()
        );

        encode::encode(canvas.image(), self.format, text.as_string())
    }
}

/// String-typed entry point for callers that collect raw form values.
#[allow(clippy::too_many_arguments)]
pub fn generate<A: TextAcquirer>(
    micrographer: &Micrographer<A>,
    source_kind: &str,
    reference: &str,
    image: &SourceImage,
    sample_density: i64,
    language: &str,
    font: &str,
    transparent_text: bool,
    custom_text: Option<&str>,
) -> Result<OutputArtifact> {
    let sample_density = u32::try_from(sample_density)
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| {
            MicrographyError::Validation(format!(
                "sample density must be a positive integer, got {sample_density}"
            ))
        })?;
    let request = GenerateRequest {
        source: TextSource::from_parts(source_kind, reference, custom_text)?,
        sample_density,
        language: language.parse()?,
        font: font.to_string(),
        transparent_text,
    };
    micrographer.generate(&request, image)
}
