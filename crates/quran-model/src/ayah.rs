use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One normalized verse, joined from the per-chapter endpoints by position.
///
/// Identity and index fields come from the primary word-language response.
/// `words` and `translations` are keyed by language tag (e.g., "en", "id").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ayah {
    /// Globally unique verse id (1..=6236 for the canonical text).
    pub id: u32,
    pub verse_number: u32,
    /// Composite "chapter:verse" key (e.g., "2:255").
    pub verse_key: String,
    pub juz_number: u32,
    pub hizb_number: u32,
    pub rub_el_hizb_number: u32,
    pub manzil_number: u32,
    pub ruku_number: u32,
    pub page_number: u32,
    /// Set on verses carrying a prostration point.
    pub sajdah_number: Option<u32>,
    pub text_uthmani: String,
    pub text_imlaei: String,
    /// Uthmani text with embedded tajweed markup.
    pub text_uthmani_tajweed: String,
    pub words: BTreeMap<String, Vec<WordSegment>>,
    pub translations: BTreeMap<String, String>,
}

/// A single word token of a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSegment {
    /// 1-based position within the verse.
    pub position: u32,
    /// Arabic source text.
    pub text: String,
    /// Relative recitation audio path, when the API provides one.
    pub audio_url: Option<String>,
    pub translation: WordTranslation,
    pub transliteration: String,
}

/// A word's gloss and the language it is actually in.
///
/// The tag reflects what the API returned, which can differ from the
/// language that was requested when a gloss is missing upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTranslation {
    pub text: String,
    pub language: String,
}

impl Ayah {
    /// Word list for a language tag, empty when the tag is unknown.
    pub fn words_for(&self, language: &str) -> &[WordSegment] {
        self.words.get(language).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Full translation for a language tag, empty when the tag is unknown.
    pub fn translation_for(&self, language: &str) -> &str {
        self.translations.get(language).map(String::as_str).unwrap_or("")
    }
}

/// The canonical "chapter:verse" key.
pub fn verse_key(chapter_id: u32, verse_number: u32) -> String {
    format!("{chapter_id}:{verse_number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_key() {
        assert_eq!(verse_key(2, 255), "2:255");
    }

    #[test]
    fn test_lookup_missing_language() {
        let ayah = Ayah {
            id: 1,
            verse_number: 1,
            verse_key: "1:1".into(),
            juz_number: 1,
            hizb_number: 1,
            rub_el_hizb_number: 1,
            manzil_number: 1,
            ruku_number: 1,
            page_number: 1,
            sajdah_number: None,
            text_uthmani: String::new(),
            text_imlaei: String::new(),
            text_uthmani_tajweed: String::new(),
            words: BTreeMap::new(),
            translations: BTreeMap::from([("en".to_string(), "In the name of Allah".to_string())]),
        };
        assert!(ayah.words_for("en").is_empty());
        assert_eq!(ayah.translation_for("en"), "In the name of Allah");
        assert_eq!(ayah.translation_for("fr"), "");
    }
}
