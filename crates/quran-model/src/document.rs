use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ayah::Ayah;
use crate::chapter::Chapter;

/// The unit of persistence: one surah with all of its joined verses.
///
/// Built once per chapter per download; `stats` is always derived from
/// `ayahs` by [`SurahDocument::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurahDocument {
    pub meta: DocumentMeta,
    pub surah: Chapter,
    /// Ascending verse order, as returned by the API.
    pub ayahs: Vec<Ayah>,
    pub stats: SurahStats,
}

/// Provenance for a downloaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Human label for the data source (e.g., "quran.com API v4").
    pub source: String,
    pub base_url: String,
    /// RFC 3339 UTC timestamp of the download.
    pub fetched_at: String,
    /// Language tag → translation resource id used for `Ayah::translations`.
    pub translations: BTreeMap<String, u32>,
    /// Word-by-word languages in request order, primary first.
    pub word_languages: Vec<String>,
}

/// Counts derived from a document's ayahs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurahStats {
    pub total_ayahs: usize,
    /// Language tag → number of words across all ayahs.
    pub total_words: BTreeMap<String, usize>,
}

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

impl SurahDocument {
    pub fn new(meta: DocumentMeta, surah: Chapter, ayahs: Vec<Ayah>) -> Self {
        let stats = SurahStats::from_ayahs(&ayahs);
        Self {
            meta,
            surah,
            ayahs,
            stats,
        }
    }

    /// Output filename: zero-padded chapter id plus a slug of the simple name.
    ///
    /// `001-al-fatihah.json`, `114-an-nas.json`.
    pub fn file_name(&self) -> String {
        chapter_file_name(&self.surah)
    }
}

impl SurahStats {
    pub fn from_ayahs(ayahs: &[Ayah]) -> Self {
        let mut total_words: BTreeMap<String, usize> = BTreeMap::new();
        for ayah in ayahs {
            for (language, words) in &ayah.words {
                *total_words.entry(language.clone()).or_default() += words.len();
            }
        }
        Self {
            total_ayahs: ayahs.len(),
            total_words,
        }
    }

    /// Word count for one language, zero when the language is absent.
    pub fn words(&self, language: &str) -> usize {
        self.total_words.get(language).copied().unwrap_or(0)
    }
}

/// Filename a chapter's document is written to.
pub fn chapter_file_name(chapter: &Chapter) -> String {
    format!("{:03}-{}.json", chapter.id, slugify(&chapter.name_simple))
}

/// Lower-case, collapse every run of non-alphanumerics to one hyphen, trim hyphens.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}
