use crate::config::Config;
use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Lower-case extensions without the dot.
    pub extensions: Vec<String>,
    pub recursive: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { extensions: vec!["txt".to_string()], recursive: false }
    }
}

impl From<&Config> for IngestOptions {
    fn from(config: &Config) -> Self {
        Self { extensions: config.extensions.clone(), recursive: config.recursive }
    }
}

impl IngestOptions {
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub indexed: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

/// Create `dir` if it is missing. Any failure here aborts startup.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| IndexError::Init { path: dir.to_path_buf(), source })?;
    fs::read_dir(dir).map_err(|source| IndexError::Init { path: dir.to_path_buf(), source })?;
    Ok(())
}

/// Accepted files under `dir`, sorted by path. Symlinks are followed.
pub fn collect_files(dir: &Path, options: &IngestOptions) -> Result<Vec<PathBuf>> {
    fs::read_dir(dir).map_err(|source| IndexError::Init { path: dir.to_path_buf(), source })?;
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() && options.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Index every accepted file in `dir`. Files that cannot be read or decoded are
/// reported to telemetry and listed in the report; they never abort the scan.
pub fn ingest_dir(index: &InvertedIndex, dir: &Path, options: &IngestOptions) -> Result<IngestReport> {
    let files = collect_files(dir, options)?;
    let mut report = IngestReport::default();

    for path in files {
        match index.add_file(&path) {
            Ok(_) => report.indexed.push(path.to_string_lossy().into_owned()),
            Err(err) => {
                index.telemetry().document_skipped(&path, &err);
                report.skipped.push(SkippedFile { path, reason: err.to_string() });
            }
        }
    }

    tracing::info!(
        dir = %dir.display(),
        indexed = report.indexed.len(),
        skipped = report.skipped.len(),
        "ingested directory"
    );
    Ok(report)
}

/// Copy `src` into `dir` (unless it already lives there) and index the copy.
/// `src` is decoded before anything is written, so a rejected file leaves the data
/// directory untouched. Returns the id the document was indexed under.
pub fn import_file(index: &InvertedIndex, src: &Path, dir: &Path, options: &IngestOptions) -> Result<String> {
    if !options.accepts(src) {
        return Err(IndexError::UnsupportedFile { path: src.to_path_buf() });
    }
    let file_name = src.file_name().ok_or_else(|| IndexError::Read {
        path: src.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dest = dir.join(file_name);

    let bytes = fs::read(src).map_err(|source| IndexError::Read { path: src.to_path_buf(), source })?;
    let content = String::from_utf8(bytes).map_err(|_| IndexError::Decode { path: src.to_path_buf() })?;

    let same_file = match (src.canonicalize(), dest.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same_file {
        fs::write(&dest, &content).map_err(|source| IndexError::Read { path: dest.clone(), source })?;
    }

    let id = dest.to_string_lossy().into_owned();
    index.add_document(id.clone(), content);
    tracing::info!(src = %src.display(), id = %id, "imported document");
    Ok(id)
}
