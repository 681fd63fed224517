//! Static site generation for Vim help documents.
//!
//! Loads a directory of help files, builds one [`TagIndex`](vh_renderer::TagIndex)
//! for the whole set, renders every document in parallel and writes the pages
//! together with a stylesheet, `sitemap.xml` and `tags.json`.

mod builder;
mod documents;
mod sitemap;
mod template;

pub use builder::{BuildConfig, BuildError, BuildReport, SiteBuilder};
pub use documents::{Document, DocumentSet};
pub use template::{PageData, STYLESHEET, render_page};
