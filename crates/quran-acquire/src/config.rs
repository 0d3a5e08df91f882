use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AcquireError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.quran.com/api/v4";

/// Everything the acquisition pipeline needs to know about the remote API.
///
/// All fields have defaults, so a TOML file only needs the keys it changes:
///
/// ```toml
/// base_url = "https://api.quran.com/api/v4"
///
/// [translations.secondary]
/// language = "id"
/// resource_id = 134
///
/// [throttle]
/// chapter_delay_ms = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    pub base_url: String,
    /// Written to `meta.source` of every document.
    pub source_label: String,
    pub user_agent: String,
    pub translations: TranslationPair,
    pub word_languages: WordLanguagePair,
    pub throttle: ThrottlePolicy,
    /// `per_page` for `/verses/by_chapter`; the longest surah has 286 verses.
    pub per_page: u32,
}

/// The two full translations attached to each ayah.
///
/// Keys left out of a `[translations.*]` table keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PartialTranslationPair")]
pub struct TranslationPair {
    pub primary: TranslationSource,
    pub secondary: TranslationSource,
}

/// A translation resource and the language tag its text is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSource {
    pub language: String,
    pub resource_id: u32,
}

/// The two word-by-word languages requested per chapter.
///
/// The primary language's response is authoritative for verse identity
/// and index fields. Keys left out of a `[word_languages.*]` table keep
/// their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PartialWordLanguagePair")]
pub struct WordLanguagePair {
    pub primary: WordLanguage,
    pub secondary: WordLanguage,
}

/// A word-by-word language: the tag sent as `language=` and the
/// `language_name` the API reports on glosses actually in that language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordLanguage {
    pub code: String,
    pub name: String,
}

/// Fixed pauses between sequential requests.
///
/// The API publishes no rate limit; these delays keep the request rate
/// polite. A zero delay never sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottlePolicy {
    /// Pause between the per-chapter endpoint calls.
    pub request_delay_ms: u64,
    /// Pause between chapters in a batch.
    pub chapter_delay_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialTranslationPair {
    primary: PartialTranslationSource,
    secondary: PartialTranslationSource,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialTranslationSource {
    language: Option<String>,
    resource_id: Option<u32>,
}

impl PartialTranslationSource {
    fn merge_into(self, base: &mut TranslationSource) {
        if let Some(language) = self.language {
            base.language = language;
        }
        if let Some(resource_id) = self.resource_id {
            base.resource_id = resource_id;
        }
    }
}

impl From<PartialTranslationPair> for TranslationPair {
    fn from(partial: PartialTranslationPair) -> Self {
        let mut pair = Self::default();
        partial.primary.merge_into(&mut pair.primary);
        partial.secondary.merge_into(&mut pair.secondary);
        pair
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialWordLanguagePair {
    primary: PartialWordLanguage,
    secondary: PartialWordLanguage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialWordLanguage {
    code: Option<String>,
    name: Option<String>,
}

impl PartialWordLanguage {
    fn merge_into(self, base: &mut WordLanguage) {
        if let Some(code) = self.code {
            base.code = code;
        }
        if let Some(name) = self.name {
            base.name = name;
        }
    }
}

impl From<PartialWordLanguagePair> for WordLanguagePair {
    fn from(partial: PartialWordLanguagePair) -> Self {
        let mut pair = Self::default();
        partial.primary.merge_into(&mut pair.primary);
        partial.secondary.merge_into(&mut pair.secondary);
        pair
    }
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            source_label: "quran.com API v4".to_string(),
            user_agent: concat!("quran-acquire/", env!("CARGO_PKG_VERSION")).to_string(),
            translations: TranslationPair::default(),
            word_languages: WordLanguagePair::default(),
            throttle: ThrottlePolicy::default(),
            per_page: 300,
        }
    }
}

impl Default for TranslationPair {
    fn default() -> Self {
        Self {
            primary: TranslationSource {
                language: "en".to_string(),
                resource_id: 20,
            },
            secondary: TranslationSource {
                language: "id".to_string(),
                resource_id: 33,
            },
        }
    }
}

impl Default for WordLanguagePair {
    fn default() -> Self {
        Self {
            primary: WordLanguage {
                code: "en".to_string(),
                name: "english".to_string(),
            },
            secondary: WordLanguage {
                code: "id".to_string(),
                name: "indonesian".to_string(),
            },
        }
    }
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            request_delay_ms: 100,
            chapter_delay_ms: 500,
        }
    }
}

impl AcquireConfig {
    /// Load a TOML config file; missing keys take their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AcquireError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| AcquireError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(AcquireError::Config("base_url is empty".into()));
        }
        if self.translations.primary.language == self.translations.secondary.language {
            return Err(AcquireError::Config(format!(
                "primary and secondary translations share language tag '{}'",
                self.translations.primary.language
            )));
        }
        if self.word_languages.primary.code == self.word_languages.secondary.code {
            return Err(AcquireError::Config(format!(
                "primary and secondary word languages share code '{}'",
                self.word_languages.primary.code
            )));
        }
        if self.per_page == 0 {
            return Err(AcquireError::Config("per_page must be positive".into()));
        }
        Ok(())
    }

    /// Comma-separated resource ids for the `translations` query parameter.
    pub fn translation_ids(&self) -> String {
        format!(
            "{},{}",
            self.translations.primary.resource_id, self.translations.secondary.resource_id
        )
    }
}

impl ThrottlePolicy {
    /// No pauses at all.
    pub fn none() -> Self {
        Self {
            request_delay_ms: 0,
            chapter_delay_ms: 0,
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn chapter_delay(&self) -> Duration {
        Duration::from_millis(self.chapter_delay_ms)
    }

    pub async fn between_requests(&self) {
        pause(self.request_delay()).await;
    }

    pub async fn between_chapters(&self) {
        pause(self.chapter_delay()).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
