use std::collections::BTreeMap;

use quran_model::{Chapter, DocumentMeta, SurahDocument};

use crate::client::ApiClient;
use crate::config::{AcquireConfig, WordLanguage};
use crate::error::Result;
use crate::fragments::{ChapterFragments, Script, ScriptVerse, WordVerse};
use crate::join::{self, JoinReport};

/// A built document plus how cleanly its fragments lined up.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub document: SurahDocument,
    pub report: JoinReport,
}

/// Fetch the five per-chapter fragments and join them into a document.
///
/// Requests run one after another with the configured pause between them.
/// Any failed request aborts the chapter; nothing is retried.
pub async fn aggregate(
    client: &ApiClient,
    chapter: &Chapter,
    config: &AcquireConfig,
) -> Result<Aggregation> {
    tracing::info!(chapter = chapter.id, name = %chapter.name_simple, "Aggregating chapter");

    let fragments = fetch_fragments(client, chapter.id, config).await?;
    let (ayahs, report) = join::merge_fragments(chapter.id, &fragments, config);
    log_degradation(chapter, &report);

    if ayahs.len() != chapter.verses_count as usize {
        tracing::warn!(
            chapter = chapter.id,
            expected = chapter.verses_count,
            actual = ayahs.len(),
            "Verse count differs from chapter listing"
        );
    }

    let document = SurahDocument::new(document_meta(client, config), chapter.clone(), ayahs);
    Ok(Aggregation { document, report })
}

/// Issue the five requests in order: the three scripts, then the primary
/// and secondary word-language verses.
pub async fn fetch_fragments(
    client: &ApiClient,
    chapter_id: u32,
    config: &AcquireConfig,
) -> Result<ChapterFragments> {
    let throttle = config.throttle;

    let uthmani = fetch_script(client, Script::Uthmani, chapter_id).await?;
    throttle.between_requests().await;
    let imlaei = fetch_script(client, Script::Imlaei, chapter_id).await?;
    throttle.between_requests().await;
    let tajweed = fetch_script(client, Script::Tajweed, chapter_id).await?;
    throttle.between_requests().await;
    let languages = &config.word_languages;
    let primary = fetch_word_verses(client, chapter_id, &languages.primary, config).await?;
    throttle.between_requests().await;
    let secondary = fetch_word_verses(client, chapter_id, &languages.secondary, config).await?;

    Ok(ChapterFragments {
        uthmani,
        imlaei,
        tajweed,
        primary,
        secondary,
    })
}

async fn fetch_script(
    client: &ApiClient,
    script: Script,
    chapter_id: u32,
) -> Result<Vec<ScriptVerse>> {
    let params = [("chapter_number", chapter_id.to_string())];
    let verses: Vec<ScriptVerse> = client.get_array(script.path(), &params, "verses").await?;
    tracing::debug!(
        chapter = chapter_id,
        script = script.label(),
        verses = verses.len(),
        "Fetched script text"
    );
    Ok(verses)
}

async fn fetch_word_verses(
    client: &ApiClient,
    chapter_id: u32,
    language: &WordLanguage,
    config: &AcquireConfig,
) -> Result<Vec<WordVerse>> {
    let params = [
        ("language", language.code.clone()),
        ("words", "true".to_string()),
        ("word_fields", "text_uthmani".to_string()),
        ("translations", config.translation_ids()),
        ("per_page", config.per_page.to_string()),
    ];
    let path = format!("/verses/by_chapter/{chapter_id}");
    let verses: Vec<WordVerse> = client.get_array(&path, &params, "verses").await?;
    tracing::debug!(
        chapter = chapter_id,
        language = %language.code,
        verses = verses.len(),
        "Fetched word-by-word verses"
    );
    Ok(verses)
}

fn document_meta(client: &ApiClient, config: &AcquireConfig) -> DocumentMeta {
    let sources = &config.translations;
    DocumentMeta {
        source: config.source_label.clone(),
        base_url: client.base_url().to_string(),
        fetched_at: chrono::Utc::now().to_rfc3339(),
        translations: BTreeMap::from([
            (sources.primary.language.clone(), sources.primary.resource_id),
            (sources.secondary.language.clone(), sources.secondary.resource_id),
        ]),
        word_languages: vec![
            config.word_languages.primary.code.clone(),
            config.word_languages.secondary.code.clone(),
        ],
    }
}

fn log_degradation(chapter: &Chapter, report: &JoinReport) {
    if !report.is_degraded() {
        return;
    }
    for script in Script::ALL {
        let absent = report.absent(script);
        if absent > 0 {
            tracing::warn!(
                chapter = chapter.id,
                script = script.label(),
                absent,
                rows = report.rows,
                "Script text missing for some verses; left empty"
            );
        }
    }
    if report.secondary_substituted > 0 {
        tracing::warn!(
            chapter = chapter.id,
            substituted = report.secondary_substituted,
            rows = report.rows,
            "Secondary word-language verses missing; copied primary word data"
        );
    }
}
