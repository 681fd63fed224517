//! Static site builder for a help document set.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use vh_renderer::{ConverterOptions, HELP_FILE, HelpRenderer, RenderError, RenderMode, TagIndex};

use crate::documents::{Document, DocumentSet};
use crate::sitemap::{render_sitemap, render_tags_json};
use crate::template::{PageData, STYLESHEET, render_page};

const STYLESHEET_CONTENT: &str = include_str!("../assets/vimhelp.css");

/// Configuration for a site build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding `*.txt` help files and the optional `tags` table.
    pub source_dir: PathBuf,
    /// Directory receiving rendered pages.
    pub output_dir: PathBuf,
    pub options: ConverterOptions,
    /// Scan documents for tag definitions even when a `tags` table exists.
    pub scan_tags: bool,
    /// Write `sitemap.xml` and `tags.json`.
    pub sitemap: bool,
    /// Absolute URL prefix for sitemap entries.
    pub base_url: String,
}

/// Error returned by the site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to render {file}: {source}")]
    Render {
        file: String,
        #[source]
        source: RenderError,
    },
    #[error("Sitemap generation failed: {0}")]
    Sitemap(String),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summary of a finished build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of pages written.
    pub pages: usize,
    /// Number of tags in the index.
    pub tags: usize,
    /// Non-fatal problems, such as unreadable files.
    pub warnings: Vec<String>,
}

struct RenderedPage<'a> {
    name: &'a str,
    html: String,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Builds a static help site from a source directory.
pub struct SiteBuilder {
    config: BuildConfig,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Load documents and build the tag index without rendering anything.
    pub fn load_index(&self) -> Result<(DocumentSet, TagIndex), BuildError> {
        let start = Instant::now();
        let set = DocumentSet::load(&self.config.source_dir)?;
        let index = set.build_index(self.config.options.mode, self.config.scan_tags);
        tracing::info!(
            documents = set.documents.len(),
            tags = index.len(),
            elapsed_ms = elapsed_ms(start),
            "Tag index built"
        );
        Ok((set, index))
    }

    /// Render every document and write the site to the output directory.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let (set, index) = self.load_index()?;

        let render_start = Instant::now();
        let pages = set
            .documents
            .par_iter()
            .map(|doc| self.render_document(&index, doc))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            pages = pages.len(),
            elapsed_ms = elapsed_ms(render_start),
            "Documents rendered"
        );

        let output_dir = &self.config.output_dir;
        create_dir(output_dir)?;
        for page in &pages {
            write_file(&output_dir.join(format!("{}.html", page.name)), &page.html)?;
            if self.config.options.mode == RenderMode::Online && page.name == HELP_FILE {
                write_file(&output_dir.join("index.html"), &page.html)?;
            }
        }
        write_file(&output_dir.join(STYLESHEET), STYLESHEET_CONTENT)?;

        if self.config.sitemap {
            self.write_indexes(&set, &index)?;
        }

        tracing::info!(
            pages = pages.len(),
            tags = index.len(),
            output = %output_dir.display(),
            elapsed_ms = elapsed_ms(start),
            "Site built"
        );
        Ok(BuildReport {
            pages: pages.len(),
            tags: index.len(),
            warnings: set.warnings,
        })
    }

    fn render_document<'d>(
        &self,
        index: &TagIndex,
        doc: &'d Document,
    ) -> Result<RenderedPage<'d>, BuildError> {
        let options = &self.config.options;
        let result = HelpRenderer::from_options(index, options)
            .to_html(&doc.name, &doc.text)
            .map_err(|source| BuildError::Render {
                file: doc.name.clone(),
                source,
            })?;
        let html = render_page(&PageData {
            filename: &doc.name,
            project: options.project,
            mode: options.mode,
            version: options.version.as_deref(),
            content: &result.html,
            sidebar: &result.sidebar,
        });
        Ok(RenderedPage {
            name: &doc.name,
            html,
        })
    }

    /// Write `tags.json`, plus `sitemap.xml` for online sites.
    fn write_indexes(&self, set: &DocumentSet, index: &TagIndex) -> Result<(), BuildError> {
        let output_dir = &self.config.output_dir;
        write_file(&output_dir.join("tags.json"), render_tags_json(index)?)?;
        if self.config.options.mode == RenderMode::Online {
            let names = set.documents.iter().map(|doc| doc.name.as_str());
            let xml = render_sitemap(&self.config.base_url, names)?;
            write_file(&output_dir.join("sitemap.xml"), xml)?;
        }
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
