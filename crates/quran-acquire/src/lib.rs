pub mod aggregate;
pub mod batch;
pub mod chapters;
pub mod client;
pub mod config;
pub mod error;
pub mod fragments;
pub mod join;
pub mod output;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{aggregate, Aggregation};
pub use batch::{BatchReport, ChapterFailure, ChapterSelection, ChapterSummary, Downloader};
pub use chapters::ChapterResolver;
pub use client::ApiClient;
pub use config::{
    AcquireConfig, ThrottlePolicy, TranslationPair, TranslationSource, WordLanguage,
    WordLanguagePair,
};
pub use error::{AcquireError, Result};
