use std::collections::HashSet;

use anyhow::Result;
use quran_model::{verse_key, SurahDocument, SurahStats};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("ayah {index}: verse key '{found}' should be '{expected}'")]
    VerseKeyMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("ayah {index}: verse number {found} should be {expected}")]
    VerseNumberOutOfOrder { index: usize, expected: u32, found: u32 },

    #[error("duplicate verse id: {0}")]
    DuplicateVerseId(u32),

    #[error("surah {chapter} lists {expected} verses but the document has {actual}")]
    VerseCountMismatch {
        chapter: u32,
        expected: u32,
        actual: usize,
    },

    #[error("stats do not match ayahs: stored {stored:?}, recomputed {recomputed:?}")]
    StatsMismatch {
        stored: SurahStats,
        recomputed: SurahStats,
    },

    #[error("ayah {verse_key}: no {kind} for language '{language}'")]
    MissingLanguage {
        verse_key: String,
        kind: &'static str,
        language: String,
    },

    #[error(
        "ayah {verse_key}: word {position} is tagged '{language}', \
         not one of the document's word languages"
    )]
    UnknownWordLanguage {
        verse_key: String,
        position: u32,
        language: String,
    },
}

/// An ayah that was written with some text fields defaulted to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedAyah {
    pub verse_key: String,
    pub empty_fields: Vec<&'static str>,
}

/// Validate a written surah JSON file.
///
/// Logs every finding; fails if there are any.
pub fn validate(file_path: &str) -> Result<()> {
    let contents = std::fs::read_to_string(file_path)?;
    let document: SurahDocument = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("{file_path} is not a surah document: {e}"))?;

    let errors = validate_document(&document);
    let degraded = degraded_ayahs(&document);
    for d in &degraded {
        tracing::warn!(verse_key = %d.verse_key, fields = ?d.empty_fields, "Degraded ayah");
    }
    tracing::info!(
        surah = document.surah.id,
        ayahs = document.ayahs.len(),
        degraded = degraded.len(),
        errors = errors.len(),
        "Validated surah document"
    );

    if !errors.is_empty() {
        anyhow::bail!("{} validation errors in {file_path}", errors.len());
    }
    tracing::info!("Surah document is valid");
    Ok(())
}

/// Check a document for internal consistency.
pub fn validate_document(document: &SurahDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let chapter = document.surah.id;

    // Provenance
    if document.meta.source.is_empty() {
        errors.push(ValidationError::MissingField("meta.source".into()));
    }
    if document.meta.base_url.is_empty() {
        errors.push(ValidationError::MissingField("meta.base_url".into()));
    }
    if document.meta.fetched_at.is_empty() {
        errors.push(ValidationError::MissingField("meta.fetched_at".into()));
    }
    if document.surah.name_simple.is_empty() {
        errors.push(ValidationError::MissingField("surah.name_simple".into()));
    }

    // Identity: keys "{chapter}:{n}" for n = 1..=count, ids unique
    let mut seen_ids = HashSet::new();
    for (index, ayah) in document.ayahs.iter().enumerate() {
        let expected_number = index as u32 + 1;
        if ayah.verse_number != expected_number {
            errors.push(ValidationError::VerseNumberOutOfOrder {
                index,
                expected: expected_number,
                found: ayah.verse_number,
            });
        }
        let expected_key = verse_key(chapter, expected_number);
        if ayah.verse_key != expected_key {
            errors.push(ValidationError::VerseKeyMismatch {
                index,
                expected: expected_key,
                found: ayah.verse_key.clone(),
            });
        }
        if !seen_ids.insert(ayah.id) {
            errors.push(ValidationError::DuplicateVerseId(ayah.id));
        }
    }

    if document.ayahs.len() != document.surah.verses_count as usize {
        errors.push(ValidationError::VerseCountMismatch {
            chapter,
            expected: document.surah.verses_count,
            actual: document.ayahs.len(),
        });
    }

    let recomputed = SurahStats::from_ayahs(&document.ayahs);
    if recomputed != document.stats {
        errors.push(ValidationError::StatsMismatch {
            stored: document.stats.clone(),
            recomputed,
        });
    }

    // Every ayah carries every configured language
    let word_languages: HashSet<&str> =
        document.meta.word_languages.iter().map(String::as_str).collect();
    for ayah in &document.ayahs {
        for language in &document.meta.word_languages {
            if !ayah.words.contains_key(language) {
                errors.push(ValidationError::MissingLanguage {
                    verse_key: ayah.verse_key.clone(),
                    kind: "word list",
                    language: language.clone(),
                });
            }
        }
        for language in document.meta.translations.keys() {
            if !ayah.translations.contains_key(language) {
                errors.push(ValidationError::MissingLanguage {
                    verse_key: ayah.verse_key.clone(),
                    kind: "translation",
                    language: language.clone(),
                });
            }
        }
        for word in ayah.words.values().flatten() {
            if !word_languages.contains(word.translation.language.as_str()) {
                errors.push(ValidationError::UnknownWordLanguage {
                    verse_key: ayah.verse_key.clone(),
                    position: word.position,
                    language: word.translation.language.clone(),
                });
            }
        }
    }

    for e in &errors {
        tracing::warn!("{e}");
    }

    errors
}

/// Ayahs whose Arabic text variants were left empty by a short fragment.
pub fn degraded_ayahs(document: &SurahDocument) -> Vec<DegradedAyah> {
    document
        .ayahs
        .iter()
        .filter_map(|ayah| {
            let empty_fields: Vec<&'static str> = [
                ("text_uthmani", &ayah.text_uthmani),
                ("text_imlaei", &ayah.text_imlaei),
                ("text_uthmani_tajweed", &ayah.text_uthmani_tajweed),
            ]
            .into_iter()
            .filter(|(_, text)| text.is_empty())
            .map(|(name, _)| name)
            .collect();
            (!empty_fields.is_empty()).then(|| DegradedAyah {
                verse_key: ayah.verse_key.clone(),
                empty_fields,
            })
        })
        .collect()
}
