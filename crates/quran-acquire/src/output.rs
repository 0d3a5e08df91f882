use std::fs;
use std::path::{Path, PathBuf};

use quran_model::{Chapter, SurahDocument};

use crate::error::{AcquireError, Result};

/// Write a document as pretty JSON to `<output_dir>/<NNN>-<slug>.json`.
///
/// Creates the directory if needed and replaces any existing file at that path.
pub fn write_document(document: &SurahDocument, output_dir: &Path) -> Result<PathBuf> {
    create_dir(output_dir)?;
    let path = output_dir.join(document.file_name());
    let json = serde_json::to_string_pretty(document)?;
    fs::write(&path, &json).map_err(|source| io_error(&path, source))?;
    tracing::info!(
        path = %path.display(),
        ayahs = document.stats.total_ayahs,
        bytes = json.len(),
        "Wrote surah JSON"
    );
    Ok(path)
}

/// Read back a document written by [`write_document`].
pub fn read_document(path: &Path) -> Result<SurahDocument> {
    let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    serde_json::from_str(&text).map_err(|source| AcquireError::Parse {
        url: path.display().to_string(),
        source,
    })
}

/// Write the chapter listing as a standalone JSON index.
pub fn write_chapter_index(chapters: &[Chapter], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(chapters)?;
    fs::write(path, &json).map_err(|source| io_error(path, source))?;
    tracing::info!(path = %path.display(), chapters = chapters.len(), "Wrote chapter index");
    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))
}

fn io_error(path: &Path, source: std::io::Error) -> AcquireError {
    AcquireError::Io {
        path: path.to_path_buf(),
        source,
    }
}
