//! Vim help-file markup to HTML converter.
//!
//! This crate turns plain-text help documents into HTML fragments, resolving
//! cross references through a [`TagIndex`] built from the whole document set.
//!
//! # Architecture
//!
//! Conversion happens in two phases:
//! - **Index**: a single writer fills a [`TagIndex`] from a `tags` table
//!   ([`TagIndex::ingest_index_table`]) and/or by scanning documents for
//!   `*tag*` definitions ([`TagIndex::scan_document`]).
//! - **Render**: [`HelpRenderer`] walks each document line by line, tracking
//!   literal blocks, section labels and chapter headings, and hands the rest
//!   of every line to the [`Tokenizer`]. The index is only read, so documents
//!   can be rendered in parallel.
//!
//! The crate does no I/O. Page templates, file loading and sitemaps live in
//! `vh-site`.
//!
//! # Example
//!
//! ```
//! use vh_renderer::{HelpRenderer, RenderMode, TagIndex};
//!
//! let mut index = TagIndex::new(RenderMode::Online);
//! index.scan_document("intro.txt", "Welcome *intro*\n");
//!
//! let result = HelpRenderer::new(&index)
//!     .to_html("help.txt", "Start with |intro|.")
//!     .unwrap();
//! assert!(result.html.contains(r#"href="intro.txt.html#intro""#));
//! ```

mod anchor;
mod link;
mod options;
mod patterns;
mod renderer;
mod tag_index;
mod tokenizer;
mod util;

pub use anchor::MAX_SUFFIX_ATTEMPTS;
pub use link::{CssClass, HELP_TAGS, Link, TAGS_FILE};
pub use options::{ConverterOptions, HELP_FILE, Project, RenderMode};
pub use renderer::{FAQ_LINE, HelpRenderer, RenderError, RenderResult, SidebarHeading};
pub use tag_index::TagIndex;
pub use tokenizer::{Span, Tokenizer};
pub use util::{escape_html, quote_plus};
