//! Font registry: which font files each language may be drawn with.

use crate::text::Language;
use crate::{MicrographyError, Result};
use fontdue::{Font, FontSettings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Size glyphs are rasterized at, in pixels.
pub const GLYPH_DRAW_SIZE: f32 = 18.0;

/// Immutable `language -> font name -> asset path` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRegistry {
    fonts: BTreeMap<Language, BTreeMap<String, PathBuf>>,
}

impl FontRegistry {
    /// Build a registry, requiring at least one font per supported language.
    pub fn new(fonts: BTreeMap<Language, BTreeMap<String, PathBuf>>) -> Result<Self> {
        for lang in Language::ALL {
            if fonts.get(&lang).map_or(true, BTreeMap::is_empty) {
                return Err(MicrographyError::Config(format!(
                    "no font registered for language '{lang}'"
                )));
            }
        }
        Ok(Self { fonts })
    }

    /// The stock fonts, expected as `<name>.ttf` under `dir`.
    pub fn builtin(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let table = |names: &[&str]| -> BTreeMap<String, PathBuf> {
            names
                .iter()
                .map(|name| (name.to_string(), dir.join(format!("{name}.ttf"))))
                .collect()
        };
        let mut fonts = BTreeMap::new();
        fonts.insert(
            Language::He,
            table(&["Horev", "MiriamMonoCLM-Book", "VarelaRound-Regular"]),
        );
        fonts.insert(Language::Ar, table(&["Majeed"]));
        Self { fonts }
    }

    pub fn resolve(&self, language: Language, name: &str) -> Result<&Path> {
        self.fonts
            .get(&language)
            .and_then(|by_name| by_name.get(name))
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                let available: Vec<&str> = self.names(language).collect();
                MicrographyError::Validation(format!(
                    "font '{name}' is not available for language '{language}' (available: {})",
                    available.join(", ")
                ))
            })
    }

    /// Font names registered for `language`, sorted.
    pub fn names(&self, language: Language) -> impl Iterator<Item = &str> {
        self.fonts
            .get(&language)
            .into_iter()
            .flat_map(|by_name| by_name.keys().map(String::as_str))
    }
}

/// Load and parse a font file.
pub fn load_font(path: &Path) -> Result<Font> {
    let data = std::fs::read(path)
        .map_err(|e| MicrographyError::Render(format!("cannot read font {}: {e}", path.display())))?;
    font_from_bytes(data)
}

pub fn font_from_bytes(data: Vec<u8>) -> Result<Font> {
    let settings = FontSettings { scale: GLYPH_DRAW_SIZE, ..FontSettings::default() };
    Font::from_bytes(data, settings).map_err(|e| MicrographyError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_table_resolves_known_fonts() {
        let reg = FontRegistry::builtin("assets/fonts");
        assert_eq!(
            reg.resolve(Language::He, "Horev").unwrap(),
            Path::new("assets/fonts/Horev.ttf")
        );
        assert_eq!(
            reg.resolve(Language::Ar, "Majeed").unwrap(),
            Path::new("assets/fonts/Majeed.ttf")
        );
        let he: Vec<&str> = reg.names(Language::He).collect();
        assert_eq!(he, ["Horev", "MiriamMonoCLM-Book", "VarelaRound-Regular"]);
    }

    #[test]
    fn font_of_another_language_is_rejected() {
        let reg = FontRegistry::builtin("assets/fonts");
        assert!(matches!(reg.resolve(Language::He, "Majeed"), Err(MicrographyError::Validation(_))));
        assert!(matches!(reg.resolve(Language::He, "Foo"), Err(MicrographyError::Validation(_))));
    }

    #[test]
    fn registry_needs_every_language() {
        let mut fonts = BTreeMap::new();
        fonts.insert(
            Language::He,
            BTreeMap::from([("Horev".to_string(), PathBuf::from("Horev.ttf"))]),
        );
        assert!(matches!(FontRegistry::new(fonts), Err(MicrographyError::Config(_))));
    }

    #[test]
    fn missing_font_file_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_font(&dir.path().join("absent.ttf")).unwrap_err();
        assert!(matches!(err, MicrographyError::Render(_)));
    }

    #[test]
    fn corrupt_font_file_is_a_render_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();
        assert!(matches!(load_font(file.path()), Err(MicrographyError::Render(_))));
    }
}
