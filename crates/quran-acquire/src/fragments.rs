// Response shapes of the five per-chapter endpoints.
//
// Every field defaults so a sparse or partially shifted response still
// deserializes; the join decides what an absent value means.

use serde::Deserialize;

/// The three Arabic renderings, each served by its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Uthmani,
    Imlaei,
    Tajweed,
}

impl Script {
    pub const ALL: [Script; 3] = [Script::Uthmani, Script::Imlaei, Script::Tajweed];

    pub fn path(self) -> &'static str {
        match self {
            Script::Uthmani => "/quran/verses/uthmani",
            Script::Imlaei => "/quran/verses/imlaei",
            Script::Tajweed => "/quran/verses/uthmani_tajweed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Script::Uthmani => "uthmani",
            Script::Imlaei => "imlaei",
            Script::Tajweed => "tajweed",
        }
    }
}

/// One verse from a script endpoint. The text field name differs per
/// endpoint, so all three are accepted.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptVerse {
    pub id: u32,
    pub verse_key: String,
    #[serde(alias = "text_uthmani", alias = "text_imlaei", alias = "text_uthmani_tajweed")]
    pub text: String,
}

/// One verse from `/verses/by_chapter` with words and translations embedded.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WordVerse {
    pub id: u32,
    pub verse_number: u32,
    pub verse_key: String,
    pub juz_number: u32,
    pub hizb_number: u32,
    pub rub_el_hizb_number: u32,
    pub manzil_number: u32,
    pub ruku_number: u32,
    pub page_number: u32,
    pub sajdah_number: Option<u32>,
    pub words: Vec<RawWord>,
    pub translations: Vec<RawTranslation>,
}

/// A token of a verse: a word, or an end-of-verse / pause marker.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawWord {
    pub position: u32,
    /// "word", "end", "pause", ...
    pub char_type_name: String,
    pub text_uthmani: Option<String>,
    pub text: Option<String>,
    pub audio_url: Option<String>,
    pub translation: Option<RawGloss>,
    pub transliteration: Option<RawGloss>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawGloss {
    pub text: Option<String>,
    pub language_name: Option<String>,
}

/// A full verse translation from one translation resource.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawTranslation {
    pub resource_id: u32,
    pub text: String,
}

impl RawWord {
    pub fn is_word(&self) -> bool {
        self.char_type_name == "word"
    }
}

/// The five verse arrays fetched for one chapter.
#[derive(Debug, Clone, Default)]
pub struct ChapterFragments {
    pub uthmani: Vec<ScriptVerse>,
    pub imlaei: Vec<ScriptVerse>,
    pub tajweed: Vec<ScriptVerse>,
    /// Word-enriched verses in the primary word language; drives the join.
    pub primary: Vec<WordVerse>,
    pub secondary: Vec<WordVerse>,
}

impl ChapterFragments {
    pub fn script(&self, script: Script) -> &[ScriptVerse] {
        match script {
            Script::Uthmani => &self.uthmani,
            Script::Imlaei => &self.imlaei,
            Script::Tajweed => &self.tajweed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_verse_accepts_each_text_field() {
        for field in ["text_uthmani", "text_imlaei", "text_uthmani_tajweed"] {
            let verse: ScriptVerse =
                serde_json::from_value(json!({"id": 1, "verse_key": "1:1", field: "بِسْمِ"})).unwrap();
            assert_eq!(verse.text, "بِسْمِ", "field {field}");
        }
    }

    #[test]
    fn test_word_verse_tolerates_nulls_and_gaps() {
        let verse: WordVerse = serde_json::from_value(json!({
            "id": 7,
            "verse_key": "1:7",
            "sajdah_number": null,
            "words": [
                {"position": 1, "char_type_name": "word", "text_uthmani": "صِرَٰطَ",
                 "translation": {"text": "(The) path", "language_name": "english"},
                 "transliteration": {"text": "ṣirāṭa", "language_name": "english"}},
                {"position": 2, "char_type_name": "end", "audio_url": null,
                 "translation": {"text": "(7)", "language_name": "english"},
                 "transliteration": {"text": null, "language_name": "english"}}
            ]
        }))
        .unwrap();
        assert_eq!(verse.verse_number, 0);
        assert!(verse.sajdah_number.is_none());
        assert!(verse.translations.is_empty());
        assert!(verse.words[0].is_word());
        assert!(!verse.words[1].is_word());
        assert!(verse.words[1].transliteration.as_ref().unwrap().text.is_none());
    }
}
