//! `sitemap.xml` and `tags.json` generation.

use std::fmt::Display;
use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;
use vh_renderer::{HELP_FILE, TagIndex};

use crate::builder::BuildError;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Public URL of `filename` under `base_url` when served online.
pub(crate) fn page_url(base_url: &str, filename: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if filename == HELP_FILE {
        format!("{base}/")
    } else {
        format!("{base}/{filename}.html")
    }
}

/// Render a sitemap listing `filenames` under `base_url`.
pub(crate) fn render_sitemap<'a>(
    base_url: &str,
    filenames: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<u8>, BuildError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(sitemap_error)?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer
        .write_event(Event::Start(urlset))
        .map_err(sitemap_error)?;
    for filename in filenames {
        let loc = page_url(base_url, filename);
        for event in [
            Event::Start(BytesStart::new("url")),
            Event::Start(BytesStart::new("loc")),
            Event::Text(BytesText::new(&loc)),
            Event::End(BytesEnd::new("loc")),
            Event::End(BytesEnd::new("url")),
        ] {
            writer.write_event(event).map_err(sitemap_error)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(sitemap_error)?;

    let mut xml = writer.into_inner().into_inner();
    xml.push(b'\n');
    Ok(xml)
}

fn sitemap_error(e: impl Display) -> BuildError {
    BuildError::Sitemap(e.to_string())
}

#[derive(Serialize)]
struct TagEntry<'a> {
    tag: &'a str,
    href: &'a str,
}

/// Serialize every index entry as `[{"tag": ..., "href": ...}]`.
pub(crate) fn render_tags_json(index: &TagIndex) -> Result<Vec<u8>, BuildError> {
    let entries: Vec<_> = index
        .all_entries_sorted()
        .into_iter()
        .map(|(tag, href)| TagEntry { tag, href })
        .collect();
    let mut json = serde_json::to_vec_pretty(&entries)?;
    json.push(b'\n');
    Ok(json)
}
