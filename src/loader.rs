//! Document loading: directory scan and per-page text extraction

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use tracing::warn;
use walkdir::WalkDir;

use crate::errors::DocRagError;
use crate::errors::Result;
use crate::models::Document;

/// Turns one file into the text of each of its pages, in page order
pub trait PageExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// PDF text extraction backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PageExtractor for PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let document = lopdf::Document::load(path)?;
        let pages = document.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        // get_pages is keyed by 1-based page number, already in order
        for page_number in pages.keys() {
            let text = match document.extract_text(&[*page_number]) {
                Ok(text) => text,
                Err(e) => {
                    // Pages without a decodable text layer (scans, images) still count as pages
                    warn!(
                        "No extractable text on page {} of {}: {}",
                        page_number,
                        path.display(),
                        e
                    );
                    String::new()
                }
            };
            texts.push(text);
        }

        Ok(texts)
    }
}

/// Loads every matching file under a directory into paged documents
pub struct DocumentLoader {
    directory: PathBuf,
    extension: String,
    extractor: Box<dyn PageExtractor>,
}

impl DocumentLoader {
    /// Create a PDF loader for a directory
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_extractor(directory, "pdf", Box::new(PdfExtractor))
    }

    /// Create a loader with a custom file extension and extractor
    pub fn with_extractor(
        directory: impl Into<PathBuf>,
        extension: impl Into<String>,
        extractor: Box<dyn PageExtractor>,
    ) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
            extractor,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Recursively list matching files, sorted by path
    ///
    /// # Errors
    /// - `ConfigError` if the directory does not exist or holds no matching files
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.directory.is_dir() {
            return Err(DocRagError::ConfigError(format!(
                "Document directory does not exist: {}",
                self.directory.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.directory).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        if files.is_empty() {
            return Err(DocRagError::ConfigError(format!(
                "No .{} files found in {}",
                self.extension,
                self.directory.display()
            )));
        }

        debug!("Discovered {} files in {}", files.len(), self.directory.display());
        Ok(files)
    }

    /// Load every page of every matching file as one document, in path then page order
    ///
    /// # Errors
    /// - `ConfigError` for a missing or empty directory
    /// - `ProcessingError` when a file cannot be parsed
    pub fn load(&self) -> Result<Vec<Document>> {
        let files = self.discover_files()?;
        let mut documents = Vec::new();

        for path in &files {
            let pages = self.extractor.extract_pages(path).map_err(|e| {
                DocRagError::ProcessingError(format!("Failed to read {}: {e}", path.display()))
            })?;
            let source = path.display().to_string();
            debug!("{}: {} pages", source, pages.len());

            documents.extend(
                pages
                    .into_iter()
                    .enumerate()
                    .map(|(page, text)| Document::new(text, source.clone(), page as u32)),
            );
        }

        info!("Loaded {} documents from {} files", documents.len(), files.len());
        Ok(documents)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}
