//! WebAssembly bindings for micrography

use crate::text::{Language, TextSource};
use crate::{encode, fonts, normalize, render, text, OutputFormat, SourceImage};
use fontdue::Font;
use wasm_bindgen::prelude::*;

fn js_err(e: crate::MicrographyError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmMicrographer {
    font: Font,
    language: Language,
    png: bool,
}

#[wasm_bindgen]
impl WasmMicrographer {
    /// Create a generator from the bytes of a font file
    ///
    /// # Arguments
    /// * `font_data` - Contents of a TrueType/OpenType font
    /// * `language` - `he` or `ar`, selects how custom text is normalized
    #[wasm_bindgen(constructor)]
    pub fn new(font_data: Vec<u8>, language: &str) -> Result<WasmMicrographer, JsValue> {
        let language = language.parse().map_err(js_err)?;
        let font = fonts::font_from_bytes(font_data).map_err(js_err)?;
        Ok(WasmMicrographer { font, language, png: false })
    }

    #[wasm_bindgen]
    pub fn set_png(&mut self, enabled: bool) {
        self.png = enabled;
    }

    /// Render RGBA canvas pixels with `text`.
    /// Returns `{ dataUri, text }` where `text` is the normalized text drawn.
    #[wasm_bindgen]
    pub fn generate(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
        custom_text: &str,
        density: u32,
        transparent: bool,
    ) -> Result<js_sys::Object, JsValue> {
        if density == 0 {
            return Err(JsValue::from_str("Sample density must be greater than zero"));
        }
        let source = SourceImage::from_rgba(image_data.to_vec(), width, height).map_err(js_err)?;
        let image = normalize::normalize_image(&source).map_err(js_err)?;

        let text_source = TextSource::Custom(custom_text.to_string());
        let text = text::normalize_text(custom_text, &text_source, self.language).map_err(js_err)?;

        let mut canvas = render::Canvas::new(image.width(), image.height(), density, &self.font, transparent);
        render::render_into(&mut canvas, &image, &text, density);

        let format = if self.png { OutputFormat::Png } else { OutputFormat::default() };
        let artifact = encode::encode(canvas.image(), format, text.as_string()).map_err(js_err)?;

        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"dataUri".into(), &artifact.data_uri().into())?;
        js_sys::Reflect::set(&result, &"text".into(), &artifact.text.into())?;
        Ok(result)
    }
}
