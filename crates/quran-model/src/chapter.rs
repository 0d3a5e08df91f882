use serde::{Deserialize, Serialize};

/// A surah as described by the `/chapters` listing.
///
/// Field names follow the API verbatim so a chapter embedded in a written
/// document reads back into the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1..=114 for the canonical listing.
    pub id: u32,
    pub revelation_place: RevelationPlace,
    /// Position in the traditional chronological order of revelation.
    pub revelation_order: u32,
    /// Whether the bismillah is recited before the first verse.
    pub bismillah_pre: bool,
    /// ASCII transliterated name (e.g., "Al-Fatihah"). Drives the output filename.
    pub name_simple: String,
    /// Transliteration with diacritics (e.g., "Al-Fātiĥah").
    pub name_complex: String,
    pub name_arabic: String,
    pub verses_count: u32,
    /// First and last mushaf page, inclusive.
    pub pages: Vec<u32>,
    pub translated_name: TranslatedName,
}

/// A name rendered in some language, as returned alongside chapters and translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedName {
    pub language_name: String,
    pub name: String,
}

/// Where a surah was revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevelationPlace {
    Makkah,
    Madinah,
}

impl Chapter {
    /// Number of mushaf pages the chapter spans.
    pub fn page_count(&self) -> u32 {
        match self.pages.as_slice() {
            [first, last] if last >= first => last - first + 1,
            [_] => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for RevelationPlace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevelationPlace::Makkah => f.pad("makkah"),
            RevelationPlace::Madinah => f.pad("madinah"),
        }
    }
}
