//! Text sources and per-script normalization into display-ordered characters.

use crate::{shaping, MicrographyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_bidi::BidiInfo;

/// Script of the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    He,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::He, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::He => "he",
            Language::Ar => "ar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MicrographyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "he" => Ok(Language::He),
            "ar" => Ok(Language::Ar),
            other => Err(MicrographyError::Validation(format!("unknown language '{other}'"))),
        }
    }
}

/// Remote scripture providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// alquran.cloud, one ayah per reference (e.g. `2:255`)
    Quran,
    /// sefaria.org, Hebrew text of a reference (e.g. `Genesis 1`)
    Sefaria,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::Quran => "quran",
            Provider::Sefaria => "sefaria",
        }
    }
}

/// Where the text of a micrography comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Scripture { provider: Provider, reference: String },
    Custom(String),
}

impl TextSource {
    /// Build a source from loosely typed parts, as submitted by a form or CLI.
    ///
    /// `kind` is one of `quran`, `sefaria` or `custom`. A custom source needs
    /// `custom` to be present, although it may be empty.
    pub fn from_parts(kind: &str, reference: &str, custom: Option<&str>) -> Result<Self> {
        let provider = match kind {
            "quran" => Provider::Quran,
            "sefaria" => Provider::Sefaria,
            "custom" => {
                return custom
                    .map(|text| TextSource::Custom(text.to_string()))
                    .ok_or_else(|| {
                        MicrographyError::Validation("custom source requires custom text".into())
                    });
            }
            other => {
                return Err(MicrographyError::Validation(format!("unknown text source '{other}'")))
            }
        };
        Ok(TextSource::Scripture { provider, reference: reference.to_string() })
    }
}

/// Non-empty sequence of characters in final display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(Vec<char>);

impl NormalizedText {
    pub fn new(chars: Vec<char>) -> Result<Self> {
        if chars.is_empty() {
            return Err(MicrographyError::EmptyText);
        }
        Ok(Self(chars))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Character for the `index`-th grid point, cycling through the text.
    pub fn cyclic(&self, index: usize) -> char {
        self.0[index % self.0.len()]
    }

    pub fn as_string(&self) -> String {
        self.0.iter().collect()
    }
}

/// Normalize raw text for rendering.
///
/// Sefaria text goes through the Hebrew stripping path. Arabic-language text,
/// custom or fetched, is reversed, shaped and bidi-reordered. Anything else
/// passes through untouched.
pub fn normalize_text(raw: &str, source: &TextSource, language: Language) -> Result<NormalizedText> {
    let stripped;
    let text = match source {
        TextSource::Scripture { provider: Provider::Sefaria, .. } => {
            stripped = strip_hebrew(raw);
            stripped.as_str()
        }
        _ => raw,
    };
    let chars: Vec<char> = match language {
        Language::Ar => arabic_display(text).chars().collect(),
        Language::He => text.chars().collect(),
    };
    NormalizedText::new(chars)
}

/// Hebrew consonants, final forms and the Yiddish ligatures/geresh marks.
///
/// Points and cantillation (U+0591..=U+05C7) fall outside.
pub fn is_hebrew_letter(c: char) -> bool {
    matches!(c, '\u{05D0}'..='\u{05EA}' | '\u{05EF}'..='\u{05F4}')
}

/// Strip markup, punctuation, vowel points and cantillation from Hebrew text.
///
/// Idempotent: stripping already stripped text changes nothing.
pub fn strip_hebrew(raw: &str) -> String {
    remove_markup(raw)
        .chars()
        .map(|c| match c {
            // maqaf and zero-width no-break space separate words
            '\u{05BE}' | '\u{FEFF}' => ' ',
            c => c,
        })
        .filter(|&c| !c.is_ascii_punctuation() && c != '\n')
        .filter(|&c| c.is_whitespace() || is_hebrew_letter(c))
        .collect()
}

/// Drop `<...>` tags. A `<` with no `>` after it is kept as text.
fn remove_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Reverse, shape and reorder Arabic text into visual order.
///
/// Shaping runs on the reversed sequence, before the bidi pass.
pub fn arabic_display(text: &str) -> String {
    let reversed: String = text.chars().rev().collect();
    let shaped = shaping::reshape(&reversed);
    bidi_visual(&shaped)
}

fn bidi_visual(text: &str) -> String {
    let info = BidiInfo::new(text, None);
    info.paragraphs
        .iter()
        .map(|para| info.reorder_line(para, para.range.clone()).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sefaria() -> TextSource {
        TextSource::Scripture { provider: Provider::Sefaria, reference: "Genesis 1".into() }
    }

    #[test]
    fn parses_languages() {
        assert_eq!("he".parse::<Language>().unwrap(), Language::He);
        assert_eq!("ar".parse::<Language>().unwrap(), Language::Ar);
        assert!(matches!("fr".parse::<Language>(), Err(MicrographyError::Validation(_))));
    }

    #[test]
    fn source_from_parts() {
        assert_eq!(
            TextSource::from_parts("quran", "2:255", None).unwrap(),
            TextSource::Scripture { provider: Provider::Quran, reference: "2:255".into() }
        );
        assert_eq!(
            TextSource::from_parts("custom", "", Some("")).unwrap(),
            TextSource::Custom(String::new())
        );
        assert!(matches!(
            TextSource::from_parts("custom", "", None),
            Err(MicrographyError::Validation(_))
        ));
        assert!(matches!(
            TextSource::from_parts("bible", "John 3", None),
            Err(MicrographyError::Validation(_))
        ));
    }

    #[test]
    fn strips_points_and_cantillation() {
        // bereshit with vowels and a cantillation mark
        let pointed = "בְּרֵאשִׁ֖ית";
        assert_eq!(strip_hebrew(pointed), "בראשית");
    }

    #[test]
    fn maqaf_and_bom_become_spaces() {
        assert_eq!(strip_hebrew("אֶת־הַשָּׁמַיִם"), "את השמים");
        assert_eq!(strip_hebrew("א\u{FEFF}ב"), "א ב");
    }

    #[test]
    fn removes_markup_punctuation_and_newlines() {
        let raw = "<b>וַיֹּאמֶר</b>, אֱלֹהִים:\n<span class=\"mam-spi-pe\">{פ}</span>";
        assert_eq!(strip_hebrew(raw), "ויאמר אלהיםפ");
    }

    #[test]
    fn unclosed_angle_bracket_keeps_the_rest_of_the_verse() {
        assert_eq!(strip_hebrew("אֵת < הַשָּׁמַיִם וְאֵת"), "את  השמים ואת");
        assert_eq!(strip_hebrew("<i>א</i> < ב"), "א  ב");
    }

    #[test]
    fn arabic_harakat_are_dropped() {
        let quran = TextSource::Scripture { provider: Provider::Quran, reference: "1:1".into() };
        // bismi, fully vocalized
        let text = normalize_text("\u{0628}\u{0650}\u{0633}\u{0652}\u{0645}\u{0650}", &quran, Language::Ar)
            .unwrap();
        assert_eq!(text.len(), 3);
        assert!(!text.as_string().chars().any(shaping::is_transparent));
        assert_eq!(text.as_string(), "\u{FE90}\u{FEB4}\u{FEE3}");
    }

    #[test]
    fn keeps_geresh_and_gershayim() {
        assert!(is_hebrew_letter('\u{05F3}'));
        assert!(is_hebrew_letter('\u{05F4}'));
        assert!(!is_hebrew_letter('\u{05C3}'));
        assert!(!is_hebrew_letter('\u{05EB}'));
    }

    #[test]
    fn hebrew_stripping_is_idempotent() {
        let once = strip_hebrew("בְּרֵאשִׁ֖ית בָּרָ֣א אֱלֹהִ֑ים\tאֵ֥ת הַשָּׁמַ֖יִם");
        assert_eq!(strip_hebrew(&once), once);
    }

    #[test]
    fn custom_hebrew_passes_through() {
        let text = normalize_text("Hello, world!", &TextSource::Custom("x".into()), Language::He)
            .unwrap();
        assert_eq!(text.as_string(), "Hello, world!");
    }

    #[test]
    fn empty_after_stripping_is_an_error() {
        assert!(matches!(
            normalize_text("<p>1:1,(2)</p>", &sefaria(), Language::He),
            Err(MicrographyError::EmptyText)
        ));
        assert!(matches!(
            normalize_text("", &TextSource::Custom(String::new()), Language::Ar),
            Err(MicrographyError::EmptyText)
        ));
    }

    #[test]
    fn cyclic_wraps_around() {
        let text = NormalizedText::new(vec!['A', 'B', 'C']).unwrap();
        let got: String = (0..7).map(|i| text.cyclic(i)).collect();
        assert_eq!(got, "ABCABCA");
    }

    #[test]
    fn arabic_text_is_shaped_into_presentation_forms() {
        let out = arabic_display("بب");
        let chars: Vec<char> = out.chars().collect();
        assert_eq!(chars.len(), 2);
        assert!(chars.iter().all(|c| ('\u{FE70}'..='\u{FEFF}').contains(c)));
    }

    #[test]
    fn latin_in_arabic_mode_keeps_all_chars() {
        let out = arabic_display("abc");
        let mut sorted: Vec<char> = out.chars().collect();
        sorted.sort_unstable();
        assert_eq!(sorted, vec!['a', 'b', 'c']);
    }
}
