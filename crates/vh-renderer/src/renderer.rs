//! Line-oriented conversion of one help document to an HTML fragment.

use std::collections::HashSet;
use std::fmt::Write;

use crate::anchor::synthesize_tag;
use crate::link::CssClass;
use crate::options::{ConverterOptions, HELP_FILE, Project};
use crate::patterns::{
    EXAMPLE_END, EXAMPLE_START, HRULE, HRULE_DOUBLE, LOCAL_ADDITIONS, NEWLINE, STAR_TAG,
    chapter_heading, section_label,
};
use crate::tag_index::TagIndex;
use crate::tokenizer::{Span, Tokenizer};
use crate::util::{escape_html, expand_tabs, quote_plus};

/// Extra `help.txt` entry pointing at the FAQ, emitted after the local
/// additions marker.
pub const FAQ_LINE: &str = "<a href=\"vim_faq.txt.html#vim_faq.txt\" class=\"l\">vim_faq.txt</a>   Frequently Asked Questions\n";

/// Errors raised while converting a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Every disambiguated form of a synthesized heading tag is taken.
    #[error("No free anchor for heading tag {base:?} after {attempts} attempts")]
    AnchorExhausted { base: String, attempts: usize },
}

/// Chapter heading listed in the page sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SidebarHeading {
    /// Percent-encoded fragment, without the `#`.
    pub anchor: String,
    /// Heading text, unescaped.
    pub text: String,
}

/// Result of converting one document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// HTML body fragment, one output line per input line.
    pub html: String,
    /// Chapter headings in document order.
    pub sidebar: Vec<SidebarHeading>,
}

/// The last two raw lines seen, used to spot headings under a double rule.
#[derive(Default)]
struct LineWindow<'a> {
    prev: Option<&'a str>,
    prev2: Option<&'a str>,
}

impl<'a> LineWindow<'a> {
    fn push(&mut self, line: &'a str) {
        self.prev2 = self.prev.replace(line);
    }

    /// Whether the previous line, or the one before a blank previous line,
    /// is a double rule.
    fn follows_double_rule(&self) -> bool {
        let candidate = match self.prev {
            Some("") => self.prev2.unwrap_or_default(),
            Some(line) => line,
            None => "",
        };
        HRULE_DOUBLE.is_match(candidate)
    }
}

/// Converts help documents against a built [`TagIndex`].
///
/// The renderer only reads the index, so one index can back any number of
/// renderers running on different threads.
///
/// # Examples
///
/// ```
/// use vh_renderer::{HelpRenderer, RenderMode, TagIndex};
///
/// let mut index = TagIndex::new(RenderMode::Offline);
/// index.add("motion.txt", "w");
///
/// let result = HelpRenderer::new(&index).to_html("usr_03.txt", "Press |w|").unwrap();
/// assert_eq!(
///     result.html,
///     "Press <a href=\"motion.txt.html#w\" class=\"l\">w</a>\n"
/// );
/// ```
pub struct HelpRenderer<'i> {
    index: &'i TagIndex,
    project: Project,
}

impl<'i> HelpRenderer<'i> {
    #[must_use]
    pub fn new(index: &'i TagIndex) -> Self {
        Self {
            index,
            project: Project::default(),
        }
    }

    /// Create a renderer configured from converter options.
    ///
    /// The addressing mode is taken from the index, which fixed every
    /// destination when it was built. A different `options.mode` is logged.
    #[must_use]
    pub fn from_options(index: &'i TagIndex, options: &ConverterOptions) -> Self {
        if index.mode() != options.mode {
            tracing::warn!(
                index_mode = ?index.mode(),
                requested_mode = ?options.mode,
                "Tag index was built for a different mode; links follow the index"
            );
        }
        Self::new(index).with_project(options.project)
    }

    #[must_use]
    pub fn with_project(mut self, project: Project) -> Self {
        self.project = project;
        self
    }

    /// Convert `contents` of the document `filename`.
    pub fn to_html(&self, filename: &str, contents: &str) -> Result<RenderResult, RenderError> {
        let is_help_txt = filename == HELP_FILE;
        let mut out = String::with_capacity(contents.len() * 2);
        let mut sidebar = Vec::new();
        let mut synthesized = HashSet::new();
        let mut window = LineWindow::default();
        let mut in_example = false;

        for raw in NEWLINE.split(contents) {
            let expanded = expand_tabs(raw);
            let mut line: &str = &expanded;

            if in_example {
                if EXAMPLE_END.is_match(line) {
                    in_example = false;
                    line = line.strip_prefix('<').unwrap_or(line);
                } else {
                    let _ = writeln!(out, r#"<span class="e">{}</span>"#, escape_html(line));
                    window.push(raw);
                    continue;
                }
            }
            if HRULE.is_match(raw) {
                let _ = writeln!(out, r#"<span class="h">{}</span>"#, escape_html(line));
                window.push(raw);
                continue;
            }
            if EXAMPLE_START.is_match(raw) {
                in_example = true;
                line = line.strip_suffix('>').unwrap_or(line);
            }

            let mut span_opened = false;
            if let Some((label, rest)) = section_label(raw).and_then(|end| line.split_at_checked(end))
            {
                let _ = write!(out, r#"<span class="c">{label}</span>"#);
                line = rest;
            } else if window.follows_double_rule()
                && let Some(heading) = chapter_heading(line)
            {
                let tag = match STAR_TAG.captures(line) {
                    Some(caps) => caps[1].to_owned(),
                    None => {
                        let tag = synthesize_tag(heading, |t| {
                            self.index.contains(t) || synthesized.contains(t)
                        })?;
                        let _ = write!(out, r#"<span id="{}">"#, quote_plus(&tag));
                        span_opened = true;
                        synthesized.insert(tag.clone());
                        tag
                    }
                };
                sidebar.push(SidebarHeading {
                    anchor: quote_plus(&tag),
                    text: heading.to_owned(),
                });
            }

            for span in Tokenizer::new(line) {
                self.write_span(&mut out, span, filename);
            }
            if span_opened {
                out.push_str("</span>");
            }
            out.push('\n');
            if is_help_txt && self.project == Project::Vim && LOCAL_ADDITIONS.is_match(raw) {
                out.push_str(FAQ_LINE);
            }
            window.push(raw);
        }

        tracing::debug!(
            file = filename,
            headings = sidebar.len(),
            bytes = out.len(),
            "Rendered document"
        );
        Ok(RenderResult { html: out, sidebar })
    }

    fn write_span(&self, out: &mut String, span: Span<'_>, filename: &str) {
        match span {
            Span::Text(text) | Span::Graphic(text) => out.push_str(&escape_html(text)),
            Span::Header(text) => wrap(out, "h", text),
            Span::Command(text) => wrap(out, "e", text),
            Span::Banner(text) => wrap(out, "i", text),
            Span::Note(text) => wrap(out, "n", text),
            Span::TagDef(tag) => {
                let _ = write!(
                    out,
                    r#"<span id="{}" class="t">{}</span>"#,
                    quote_plus(tag),
                    escape_html(tag)
                );
            }
            Span::Url(url) => {
                let _ = write!(out, r#"<a class="u" href="{url}">{}</a>"#, escape_html(url));
            }
            Span::PipeRef(tag) => self.write_ref(out, tag, filename, Some(CssClass::Pipe)),
            Span::OptionRef(tag) => self.write_ref(out, tag, filename, Some(CssClass::Option)),
            Span::ControlKey(tag) => {
                self.write_ref(out, tag, filename, Some(CssClass::ControlKey));
            }
            Span::Placeholder(tag) => {
                self.write_ref(out, tag, filename, Some(CssClass::Placeholder));
            }
            Span::Word(tag) => self.write_ref(out, tag, filename, None),
        }
    }

    fn write_ref(&self, out: &mut String, tag: &str, filename: &str, class: Option<CssClass>) {
        out.push_str(&self.index.resolve(tag, filename, class));
    }
}

fn wrap(out: &mut String, class: &str, text: &str) {
    let _ = write!(out, r#"<span class="{class}">{}</span>"#, escape_html(text));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::RenderMode;

    fn motion_index() -> TagIndex {
        let mut index = TagIndex::new(RenderMode::Offline);
        index.ingest_index_table("w\tmotion.txt\t/*w*\n'tw'\toptions.txt\t/*'tw'*\n");
        index
    }

    fn render(index: &TagIndex, filename: &str, contents: &str) -> RenderResult {
        HelpRenderer::new(index).to_html(filename, contents).unwrap()
    }

    #[test]
    fn test_pipe_reference_across_documents() {
        let index = motion_index();
        let result = render(&index, "usr_03.txt", "See |w| here.");
        assert_eq!(
            result.html,
            "See <a href=\"motion.txt.html#w\" class=\"l\">w</a> here.\n"
        );
    }

    #[test]
    fn test_pipe_reference_same_document() {
        let index = motion_index();
        let result = render(&index, "motion.txt", "See |w| here.");
        assert_eq!(result.html, "See <a href=\"#w\" class=\"l\">w</a> here.\n");
    }

    #[test]
    fn test_option_reference_keeps_class() {
        let index = motion_index();
        let result = render(&index, "x.txt", "Set 'tw' now");
        assert_eq!(
            result.html,
            "Set <a href=\"options.txt.html#%27tw%27\" class=\"o\">'tw'</a> now\n"
        );
    }

    #[test]
    fn test_escapes_plain_text() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "a & b < c > d");
        assert_eq!(result.html, "a &amp; b &lt; c &gt; d\n");
    }

    #[test]
    fn test_literal_block_is_not_linked() {
        let index = motion_index();
        let result = render(&index, "x.txt", "Example: >\n\t|w| inside\nafter |w|");
        assert_eq!(
            result.html,
            concat!(
                "Example: \n",
                "<span class=\"e\">        |w| inside</span>\n",
                "after <a href=\"motion.txt.html#w\" class=\"l\">w</a>\n",
            )
        );
    }

    #[test]
    fn test_literal_block_drops_closing_marker() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "code: >\n    x = 1\n<back");
        assert_eq!(
            result.html,
            "code: \n<span class=\"e\">    x = 1</span>\nback\n"
        );
    }

    #[test]
    fn test_literal_block_ends_before_rule() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "code: >\n\tx\n======\n");
        assert_eq!(
            result.html,
            "code: \n<span class=\"e\">        x</span>\n<span class=\"h\">======</span>\n\n"
        );
    }

    #[test]
    fn test_control_key_with_placeholder_is_one_span() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "CTRL-W_<C-R>");
        assert_eq!(
            result.html,
            "<span class=\"k\">CTRL-W_&lt;C-R&gt;</span>\n"
        );
    }

    #[test]
    fn test_unknown_word_is_plain() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "xyzzy");
        assert_eq!(result.html, "xyzzy\n");
        assert!(!result.html.contains("<a"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let index = motion_index();
        let text = "Use |w| and 'tw' with CTRL-V.\n";
        let first = render(&index, "x.txt", text);
        let second = render(&index, "x.txt", text);
        assert_eq!(first.html, second.html);
    }

    #[test]
    fn test_explicit_heading_tag_in_sidebar() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "======\n1. Introduction *intro*");
        assert_eq!(
            result.sidebar,
            [SidebarHeading {
                anchor: "intro".to_owned(),
                text: "Introduction".to_owned(),
            }]
        );
        assert!(result.html.contains(r#"<span id="intro" class="t">intro</span>"#));
    }

    #[test]
    fn test_heading_after_blank_line() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "======\n\n2. Usage\t\t*usage*");
        assert_eq!(result.sidebar.len(), 1);
        assert_eq!(result.sidebar[0].text, "Usage");
    }

    #[test]
    fn test_heading_requires_double_rule() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "-----\n1. Introduction *intro*");
        assert!(result.sidebar.is_empty());
    }

    #[test]
    fn test_synthesized_heading_anchor() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "======\nOverview~\n======\nOverview~");
        assert_eq!(
            result.html,
            concat!(
                "<span class=\"h\">======</span>\n",
                "<span id=\"_overview\"><span class=\"h\">Overview</span></span>\n",
                "<span class=\"h\">======</span>\n",
                "<span id=\"_overview_0\"><span class=\"h\">Overview</span></span>\n",
            )
        );
        let anchors: Vec<_> = result.sidebar.iter().map(|h| h.anchor.as_str()).collect();
        assert_eq!(anchors, ["_overview", "_overview_0"]);
    }

    #[test]
    fn test_synthesized_heading_avoids_index_tags() {
        let mut index = TagIndex::new(RenderMode::Offline);
        index.add("other.txt", "_overview");
        let result = render(&index, "x.txt", "======\nOverview~");
        assert_eq!(result.sidebar[0].anchor, "_overview_0");
    }

    #[test]
    fn test_section_label() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "OPTIONS  *options*");
        assert_eq!(
            result.html,
            "<span class=\"c\">OPTIONS </span> <span id=\"options\" class=\"t\">options</span>\n"
        );
    }

    #[test]
    fn test_crlf_lines() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "one\r\ntwo\r\n");
        assert_eq!(result.html, "one\ntwo\n\n");
    }

    #[test]
    fn test_faq_line_only_for_vim_help_txt() {
        let index = TagIndex::new(RenderMode::Online);
        let text = "LOCAL ADDITIONS:\t\t\t\t*local-additions*";
        let vim = render(&index, HELP_FILE, text);
        assert!(vim.html.ends_with(FAQ_LINE));

        let neovim = HelpRenderer::new(&index)
            .with_project(Project::Neovim)
            .to_html(HELP_FILE, text)
            .unwrap();
        assert!(!neovim.html.contains("vim_faq.txt"));

        let other = render(&index, "intro.txt", text);
        assert!(!other.html.contains("vim_faq.txt"));
    }

    #[test]
    fn test_from_options_links_follow_index_mode() {
        let index = motion_index();
        let options = ConverterOptions {
            mode: RenderMode::Online,
            project: Project::Neovim,
            version: None,
        };
        let result = HelpRenderer::from_options(&index, &options)
            .to_html("x.txt", "|w|")
            .unwrap();
        assert_eq!(result.html, "<a href=\"motion.txt.html#w\" class=\"l\">w</a>\n");
    }

    #[test]
    fn test_url_and_command() {
        let index = TagIndex::new(RenderMode::Offline);
        let result = render(&index, "x.txt", "Run `make` from https://vim.org/x now");
        assert_eq!(
            result.html,
            concat!(
                "Run <span class=\"e\">make</span> from ",
                "<a class=\"u\" href=\"https://vim.org/x\">https://vim.org/x</a> now\n",
            )
        );
    }
}
