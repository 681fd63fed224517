//! Tag name to [`Link`] mapping for one document set.
//!
//! The index has two phases. While it is being built it is owned by a single
//! writer that ingests the `tags` table and scans documents. Once built it is
//! shared by reference with any number of renderers; lookups take `&self`
//! and the per-link memo cells are thread-safe.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::link::{CssClass, HELP_TAGS, Link, TAGS_FILE};
use crate::options::RenderMode;
use crate::patterns::{EXAMPLE_END, EXAMPLE_START, NEWLINE, STAR_TAG, TAG_LINE};
use crate::util::escape_html;

/// Global tag index.
#[derive(Debug, Clone)]
pub struct TagIndex {
    mode: RenderMode,
    links: HashMap<String, Link>,
}

impl TagIndex {
    /// Create an index holding only the whole-document tag.
    #[must_use]
    pub fn new(mode: RenderMode) -> Self {
        let mut index = Self {
            mode,
            links: HashMap::new(),
        };
        index.install_help_tags();
        index
    }

    /// Addressing mode used for destinations.
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Insert or overwrite the definition of `tag` in `filename`.
    pub fn add(&mut self, filename: &str, tag: &str) {
        let link = Link::new(filename, self.mode.html_destination(filename), tag);
        if let Some(previous) = self.links.insert(tag.to_owned(), link)
            && previous.filename() != filename
        {
            tracing::debug!(
                tag,
                previous = previous.filename(),
                file = filename,
                "Tag definition shadowed"
            );
        }
    }

    /// Ingest a `tags` table of `tag<ws>file[<ws>...]` records.
    ///
    /// Returns the number of records added. Lines without two fields are
    /// skipped. The whole-document tag is reinstalled afterwards so a table
    /// entry of the same name never replaces it.
    pub fn ingest_index_table(&mut self, text: &str) -> usize {
        let mut added = 0;
        let mut skipped = 0;
        for line in NEWLINE.split(text) {
            match TAG_LINE.captures(line) {
                Some(caps) => {
                    self.add(&caps[2], &caps[1]);
                    added += 1;
                }
                None if line.is_empty() => {}
                None => skipped += 1,
            }
        }
        self.install_help_tags();
        tracing::debug!(tags = added, skipped, "Ingested tag table");
        added
    }

    /// Add every `*tag*` defined in `text` outside literal blocks.
    ///
    /// Returns the number of definitions found.
    pub fn scan_document(&mut self, filename: &str, text: &str) -> usize {
        let mut in_example = false;
        let mut found = 0;
        for line in NEWLINE.split(text) {
            if in_example {
                if EXAMPLE_END.is_match(line) {
                    in_example = false;
                } else {
                    continue;
                }
            }
            for caps in STAR_TAG.captures_iter(line) {
                self.add(filename, &caps[1]);
                found += 1;
            }
            if EXAMPLE_START.is_match(line) {
                in_example = true;
            }
        }
        tracing::debug!(file = filename, tags = found, "Scanned document");
        found
    }

    /// Render a reference to `tag` from inside `current`.
    ///
    /// `style` is the class hinted by the reference syntax. Unknown tags are
    /// wrapped in a span of that class, or escaped as plain text without one.
    pub fn resolve<'a>(
        &'a self,
        tag: &'a str,
        current: &str,
        style: Option<CssClass>,
    ) -> Cow<'a, str> {
        if let Some(link) = self.links.get(tag) {
            let is_pipe = style == Some(CssClass::Pipe);
            let is_same_doc = link.filename() == current;
            return Cow::Borrowed(link.html(is_pipe, is_same_doc));
        }
        match style {
            Some(class) => Cow::Owned(format!(
                r#"<span class="{}">{}</span>"#,
                class.as_str(),
                escape_html(tag)
            )),
            None => escape_html(tag),
        }
    }

    /// Every `(tag, href)` pair, ordered by tag name.
    #[must_use]
    pub fn all_entries_sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .links
            .iter()
            .map(|(tag, link)| (tag.as_str(), link.href(false)))
            .collect();
        entries.sort_unstable();
        entries
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Link> {
        self.links.get(tag)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.links.contains_key(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn install_help_tags(&mut self) {
        let destination = format!("{TAGS_FILE}.html");
        self.links.insert(
            HELP_TAGS.to_owned(),
            Link::new(TAGS_FILE, destination, HELP_TAGS),
        );
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn index(mode: RenderMode) -> TagIndex {
        let mut index = TagIndex::new(mode);
        index.ingest_index_table("w\tmotion.txt\t/*w*\nhelp\thelp.txt\t/*help*\n");
        index
    }

    #[test]
    fn test_new_has_help_tags() {
        let index = TagIndex::new(RenderMode::Online);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(HELP_TAGS).unwrap().href(false), "tags.html");
    }

    #[test]
    fn test_ingest_counts_and_skips_malformed() {
        let mut index = TagIndex::new(RenderMode::Offline);
        let added = index.ingest_index_table("a\tx.txt\nmalformed\n\n b \nc y.txt extra\r\n");
        assert_eq!(added, 2);
        assert!(index.contains("a"));
        assert!(index.contains("c"));
        assert!(!index.contains("malformed"));
    }

    #[test]
    fn test_table_cannot_replace_help_tags() {
        let mut index = TagIndex::new(RenderMode::Online);
        index.ingest_index_table("help-tags\thelp.txt\n");
        assert_eq!(index.get(HELP_TAGS).unwrap().filename(), TAGS_FILE);
    }

    #[test]
    fn test_online_help_txt_destination() {
        let index = index(RenderMode::Online);
        assert_eq!(index.get("help").unwrap().destination(), "/");
        assert_eq!(index.get("w").unwrap().destination(), "motion.txt.html");
    }

    #[test]
    fn test_later_definition_wins() {
        let mut index = TagIndex::new(RenderMode::Offline);
        index.add("a.txt", "dup");
        index.add("b.txt", "dup");
        assert_eq!(index.get("dup").unwrap().filename(), "b.txt");
    }

    #[test]
    fn test_scan_document_skips_literal_blocks() {
        let mut index = TagIndex::new(RenderMode::Offline);
        let text = "Intro *real*\nExample: >\n\t*fake*\n  *also-fake*\nBack *after*\n";
        let found = index.scan_document("x.txt", text);
        assert_eq!(found, 2);
        assert!(index.contains("real"));
        assert!(index.contains("after"));
        assert!(!index.contains("fake"));
        assert!(!index.contains("also-fake"));
    }

    #[test]
    fn test_scan_document_block_end_line_is_scanned() {
        let mut index = TagIndex::new(RenderMode::Offline);
        index.scan_document("x.txt", "code: >\n\tfoo\n*closer*\n");
        assert!(index.contains("closer"));
    }

    #[test]
    fn test_scan_document_requires_boundary() {
        let mut index = TagIndex::new(RenderMode::Offline);
        index.scan_document("x.txt", "a*b*c and *\"q\"* and *ok*");
        assert!(index.contains("ok"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_resolve_cross_and_same_document() {
        let index = index(RenderMode::Offline);
        assert_eq!(
            index.resolve("w", "usr_03.txt", Some(CssClass::Pipe)),
            r#"<a href="motion.txt.html#w" class="l">w</a>"#
        );
        assert_eq!(
            index.resolve("w", "motion.txt", Some(CssClass::Pipe)),
            r##"<a href="#w" class="l">w</a>"##
        );
    }

    #[test]
    fn test_resolve_word_uses_definition_class() {
        let index = index(RenderMode::Offline);
        assert_eq!(
            index.resolve("w", "usr_03.txt", None),
            r#"<a href="motion.txt.html#w" class="d">w</a>"#
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let index = TagIndex::new(RenderMode::Offline);
        assert_eq!(
            index.resolve("<nope>", "x.txt", Some(CssClass::Placeholder)),
            r#"<span class="s">&lt;nope&gt;</span>"#
        );
        assert_eq!(index.resolve("a&b", "x.txt", None), "a&amp;b");
    }

    #[test]
    fn test_all_entries_sorted() {
        let index = index(RenderMode::Online);
        assert_eq!(
            index.all_entries_sorted(),
            [
                ("help", "/#help"),
                ("help-tags", "tags.html"),
                ("w", "motion.txt.html#w"),
            ]
        );
    }
}
