// Positional join of the five per-chapter verse arrays into ayahs.
//
// All five endpoints list a chapter's verses in canonical order, so row i
// of each array describes the same verse. The primary word-language array
// fixes the row count; shorter arrays degrade per field instead of failing.
// A verse missing without a gap shifts every later row of that array.

use std::collections::BTreeMap;

use quran_model::{verse_key, Ayah, WordSegment, WordTranslation};

use crate::config::{AcquireConfig, WordLanguage, WordLanguagePair};
use crate::fragments::{ChapterFragments, RawTranslation, RawWord, Script, ScriptVerse, WordVerse};

/// Where a joined row's value for one field came from.
#[derive(Debug, PartialEq, Eq)]
pub enum Slot<'a, T> {
    /// The field's own array had a row at this index.
    Present(&'a T),
    /// The array was short; another array's row stands in.
    Substituted(&'a T),
    /// The array was short and nothing stands in.
    Absent,
}

impl<T> Clone for Slot<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<'_, T> {}

impl<'a, T> Slot<'a, T> {
    pub fn value(&self) -> Option<&'a T> {
        match *self {
            Slot::Present(v) | Slot::Substituted(v) => Some(v),
            Slot::Absent => None,
        }
    }
}

/// The five fragments for one verse position.
#[derive(Debug, Clone)]
pub struct JoinedRow<'a> {
    pub index: usize,
    pub primary: &'a WordVerse,
    /// Falls back to the primary verse when the secondary array is short.
    pub secondary: Slot<'a, WordVerse>,
    pub uthmani: Slot<'a, ScriptVerse>,
    pub imlaei: Slot<'a, ScriptVerse>,
    pub tajweed: Slot<'a, ScriptVerse>,
}

/// How many rows each field filled from its own array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub rows: usize,
    /// Rows whose secondary word data is a copy of the primary's.
    pub secondary_substituted: usize,
    pub uthmani_absent: usize,
    pub imlaei_absent: usize,
    pub tajweed_absent: usize,
}

impl JoinReport {
    pub fn is_degraded(&self) -> bool {
        self.secondary_substituted > 0
            || self.uthmani_absent > 0
            || self.imlaei_absent > 0
            || self.tajweed_absent > 0
    }

    pub fn absent(&self, script: Script) -> usize {
        match script {
            Script::Uthmani => self.uthmani_absent,
            Script::Imlaei => self.imlaei_absent,
            Script::Tajweed => self.tajweed_absent,
        }
    }
}

/// Align the five arrays row by row over the primary array's length.
pub fn join_rows(fragments: &ChapterFragments) -> Vec<JoinedRow<'_>> {
    fragments
        .primary
        .iter()
        .enumerate()
        .map(|(index, primary)| JoinedRow {
            index,
            primary,
            secondary: match fragments.secondary.get(index) {
                Some(verse) => Slot::Present(verse),
                None => Slot::Substituted(primary),
            },
            uthmani: script_slot(&fragments.uthmani, index),
            imlaei: script_slot(&fragments.imlaei, index),
            tajweed: script_slot(&fragments.tajweed, index),
        })
        .collect()
}

fn script_slot(verses: &[ScriptVerse], index: usize) -> Slot<'_, ScriptVerse> {
    verses.get(index).map_or(Slot::Absent, Slot::Present)
}

/// Tally substituted and absent fields across joined rows.
pub fn report(rows: &[JoinedRow<'_>]) -> JoinReport {
    let mut report = JoinReport {
        rows: rows.len(),
        ..JoinReport::default()
    };
    for row in rows {
        if matches!(row.secondary, Slot::Substituted(_)) {
            report.secondary_substituted += 1;
        }
        if matches!(row.uthmani, Slot::Absent) {
            report.uthmani_absent += 1;
        }
        if matches!(row.imlaei, Slot::Absent) {
            report.imlaei_absent += 1;
        }
        if matches!(row.tajweed, Slot::Absent) {
            report.tajweed_absent += 1;
        }
    }
    report
}

/// Join a chapter's fragments into ayahs, one per primary verse, in order.
pub fn merge_fragments(
    chapter_id: u32,
    fragments: &ChapterFragments,
    config: &AcquireConfig,
) -> (Vec<Ayah>, JoinReport) {
    let rows = join_rows(fragments);
    let report = report(&rows);
    let ayahs = rows
        .iter()
        .map(|row| merge_row(chapter_id, row, config))
        .collect();
    (ayahs, report)
}

/// Build one ayah from a joined row.
pub fn merge_row(chapter_id: u32, row: &JoinedRow<'_>, config: &AcquireConfig) -> Ayah {
    let primary = row.primary;
    let languages = &config.word_languages;
    let sources = &config.translations;

    let verse_number = if primary.verse_number == 0 {
        row.index as u32 + 1
    } else {
        primary.verse_number
    };
    let key = if primary.verse_key.is_empty() {
        verse_key(chapter_id, verse_number)
    } else {
        primary.verse_key.clone()
    };

    let mut words = BTreeMap::new();
    words.insert(
        languages.primary.code.clone(),
        map_words(&primary.words, |_| languages.primary.code.clone()),
    );
    let secondary_words = row
        .secondary
        .value()
        .map(|verse| map_words(&verse.words, |word| gloss_language(word, languages)))
        .unwrap_or_default();
    words.insert(languages.secondary.code.clone(), secondary_words);

    let mut translations = BTreeMap::new();
    translations.insert(
        sources.primary.language.clone(),
        translation_text(&primary.translations, sources.primary.resource_id),
    );
    translations.insert(
        sources.secondary.language.clone(),
        translation_text(&primary.translations, sources.secondary.resource_id),
    );

    Ayah {
        id: primary.id,
        verse_number,
        verse_key: key,
        juz_number: primary.juz_number,
        hizb_number: primary.hizb_number,
        rub_el_hizb_number: primary.rub_el_hizb_number,
        manzil_number: primary.manzil_number,
        ruku_number: primary.ruku_number,
        page_number: primary.page_number,
        sajdah_number: primary.sajdah_number,
        text_uthmani: script_text(row.uthmani),
        text_imlaei: script_text(row.imlaei),
        text_uthmani_tajweed: script_text(row.tajweed),
        words,
        translations,
    }
}

fn script_text(slot: Slot<'_, ScriptVerse>) -> String {
    slot.value().map(|v| v.text.clone()).unwrap_or_default()
}

/// Keep actual words (dropping verse-end and pause markers), in order.
pub fn map_words(raw: &[RawWord], language_of: impl Fn(&RawWord) -> String) -> Vec<WordSegment> {
    raw.iter()
        .filter(|w| w.is_word())
        .map(|w| WordSegment {
            position: w.position,
            text: w
                .text_uthmani
                .clone()
                .or_else(|| w.text.clone())
                .unwrap_or_default(),
            audio_url: w.audio_url.clone(),
            translation: WordTranslation {
                text: w
                    .translation
                    .as_ref()
                    .and_then(|g| g.text.clone())
                    .unwrap_or_default(),
                language: language_of(w),
            },
            transliteration: w
                .transliteration
                .as_ref()
                .and_then(|g| g.text.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Tag a secondary-language gloss with the secondary code only when the API
/// says it is in that language; it falls back to primary-language glosses
/// for words it has no translation for.
fn gloss_language(word: &RawWord, languages: &WordLanguagePair) -> String {
    let named = |lang: &WordLanguage| {
        word.translation
            .as_ref()
            .and_then(|g| g.language_name.as_deref())
            .is_some_and(|name| name.eq_ignore_ascii_case(&lang.name))
    };
    if named(&languages.secondary) {
        languages.secondary.code.clone()
    } else {
        languages.primary.code.clone()
    }
}

/// Text of the first translation from `resource_id`, empty if none.
pub fn translation_text(translations: &[RawTranslation], resource_id: u32) -> String {
    translations
        .iter()
        .find(|t| t.resource_id == resource_id)
        .map(|t| t.text.clone())
        .unwrap_or_default()
}
