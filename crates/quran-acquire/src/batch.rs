use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quran_model::Chapter;

use crate::aggregate::aggregate;
use crate::chapters::ChapterResolver;
use crate::client::ApiClient;
use crate::config::AcquireConfig;
use crate::error::Result;
use crate::output;

/// Which chapters a download covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterSelection {
    /// A single chapter; its failure is the caller's error.
    One(u32),
    /// Chapters with ids in `from..=to`; failures are isolated per chapter.
    Range { from: u32, to: u32 },
    /// Every chapter in the listing; failures are isolated per chapter.
    All,
}

/// What was written for one chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSummary {
    pub chapter_id: u32,
    pub name: String,
    pub path: PathBuf,
    pub ayahs: usize,
    /// Language tag → word count.
    pub words: BTreeMap<String, usize>,
    /// Some fragment arrays were short, so some fields were defaulted.
    pub degraded: bool,
}

/// A chapter that could not be downloaded in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFailure {
    pub chapter_id: u32,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub written: Vec<ChapterSummary>,
    pub failed: Vec<ChapterFailure>,
}

impl BatchReport {
    pub fn total_ayahs(&self) -> usize {
        self.written.iter().map(|s| s.ayahs).sum()
    }
}

/// Drives resolve → aggregate → write for one or many chapters.
///
/// Everything runs sequentially; batches pause between chapters
/// according to the configured throttle.
#[derive(Debug)]
pub struct Downloader {
    resolver: ChapterResolver,
    config: AcquireConfig,
    output_dir: PathBuf,
}

impl Downloader {
    pub fn new(config: AcquireConfig, output_dir: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::from_config(&config)?;
        Ok(Self {
            resolver: ChapterResolver::new(client),
            config,
            output_dir: output_dir.into(),
        })
    }

    pub fn resolver(&self) -> &ChapterResolver {
        &self.resolver
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn download(&self, selection: ChapterSelection) -> Result<BatchReport> {
        match selection {
            ChapterSelection::One(id) => {
                let summary = self.download_one(id).await?;
                Ok(BatchReport {
                    written: vec![summary],
                    failed: Vec::new(),
                })
            }
            ChapterSelection::Range { from, to } => self.download_range(from, to).await,
            ChapterSelection::All => {
                let mut chapters = self.resolver.list_chapters().await?.to_vec();
                chapters.sort_by_key(|c| c.id);
                Ok(self.download_chapters(&chapters).await)
            }
        }
    }

    /// Download a single chapter. Errors propagate to the caller.
    pub async fn download_one(&self, chapter_id: u32) -> Result<ChapterSummary> {
        let chapter = self.resolver.resolve_chapter(chapter_id).await?;
        self.download_chapter(&chapter).await
    }

    /// Download chapters `from..=to` in ascending id order.
    ///
    /// Only a failure to load the chapter listing is returned as an error;
    /// a chapter that fails is logged, recorded in the report, and skipped.
    pub async fn download_range(&self, from: u32, to: u32) -> Result<BatchReport> {
        let mut chapters = self.resolver.chapters_in_range(from, to).await?;
        chapters.sort_by_key(|c| c.id);
        if chapters.is_empty() {
            tracing::warn!(from, to, "No chapters in requested range");
        }
        Ok(self.download_chapters(&chapters).await)
    }

    async fn download_chapters(&self, chapters: &[Chapter]) -> BatchReport {
        let mut report = BatchReport::default();
        tracing::info!(chapters = chapters.len(), "Starting batch download");

        for (i, chapter) in chapters.iter().enumerate() {
            if i > 0 {
                self.config.throttle.between_chapters().await;
            }
            match self.download_chapter(chapter).await {
                Ok(summary) => report.written.push(summary),
                Err(e) => {
                    tracing::error!(
                        chapter = chapter.id,
                        name = %chapter.name_simple,
                        error = %e,
                        "Chapter failed; continuing"
                    );
                    report.failed.push(ChapterFailure {
                        chapter_id: chapter.id,
                        name: chapter.name_simple.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            written = report.written.len(),
            failed = report.failed.len(),
            ayahs = report.total_ayahs(),
            "Batch download finished"
        );
        report
    }

    async fn download_chapter(&self, chapter: &Chapter) -> Result<ChapterSummary> {
        let aggregation = aggregate(self.resolver.client(), chapter, &self.config).await?;
        let document = aggregation.document;
        let path = output::write_document(&document, &self.output_dir)?;

        let summary = ChapterSummary {
            chapter_id: chapter.id,
            name: chapter.name_simple.clone(),
            path,
            ayahs: document.stats.total_ayahs,
            words: document.stats.total_words.clone(),
            degraded: aggregation.report.is_degraded(),
        };
        tracing::info!(
            chapter = summary.chapter_id,
            name = %summary.name,
            ayahs = summary.ayahs,
            words = ?summary.words,
            "Downloaded chapter"
        );
        Ok(summary)
    }
}
