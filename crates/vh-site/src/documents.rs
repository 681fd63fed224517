//! Loading a directory of help documents.

use std::fs;
use std::path::Path;

use vh_renderer::{RenderMode, TAGS_FILE, TagIndex};

use crate::builder::BuildError;

/// Extension of help documents.
const HELP_EXTENSION: &str = "txt";

/// One help document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Filename relative to the source directory, e.g. `motion.txt`.
    pub name: String,
    pub text: String,
}

/// Documents and the optional `tags` table from one source directory.
#[derive(Debug, Default)]
pub struct DocumentSet {
    /// Documents sorted by name.
    pub documents: Vec<Document>,
    /// Contents of the `tags` file, if present.
    pub tags: Option<String>,
    /// Files that could not be read.
    pub warnings: Vec<String>,
}

impl DocumentSet {
    /// Load every `*.txt` file directly inside `source_dir`, plus `tags`.
    ///
    /// Unreadable files are skipped and reported in [`warnings`](Self::warnings).
    /// Files that are not valid UTF-8 are decoded lossily.
    pub fn load(source_dir: &Path) -> Result<Self, BuildError> {
        if !source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(source_dir.to_path_buf()));
        }
        let io_error = |source| BuildError::Io {
            path: source_dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(source_dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != HELP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();

        let mut set = Self::default();
        for name in names {
            if let Some(text) = set.read(source_dir, &name) {
                set.documents.push(Document { name, text });
            }
        }
        if source_dir.join(TAGS_FILE).is_file() {
            set.tags = set.read(source_dir, TAGS_FILE);
        }

        tracing::debug!(
            documents = set.documents.len(),
            has_tags = set.tags.is_some(),
            skipped = set.warnings.len(),
            "Loaded help documents"
        );
        Ok(set)
    }

    /// Build the tag index for this set.
    ///
    /// The `tags` table is ingested first. Documents are scanned when
    /// `scan_tags` is set or there is no table, so definitions found in the
    /// documents take precedence over table entries.
    #[must_use]
    pub fn build_index(&self, mode: RenderMode, scan_tags: bool) -> TagIndex {
        let mut index = TagIndex::new(mode);
        if let Some(tags) = &self.tags {
            index.ingest_index_table(tags);
        }
        if scan_tags || self.tags.is_none() {
            for doc in &self.documents {
                index.scan_document(&doc.name, &doc.text);
            }
        }
        index
    }

    fn read(&mut self, dir: &Path, name: &str) -> Option<String> {
        let path = dir.join(name);
        match fs::read(&path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read help file");
                self.warnings.push(format!("{}: {e}", path.display()));
                None
            }
        }
    }
}
