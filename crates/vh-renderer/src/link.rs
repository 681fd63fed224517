//! Resolvable tag targets.

use std::sync::OnceLock;

use crate::tokenizer::classify;
use crate::util::{escape_html, quote_plus};

/// Tag naming the whole document set; addressed without a fragment.
pub const HELP_TAGS: &str = "help-tags";

/// Pseudo-file that defines [`HELP_TAGS`].
pub const TAGS_FILE: &str = "tags";

/// CSS class attached to rendered references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CssClass {
    /// `|tag|` references, independent of the target's own class.
    Pipe,
    Option,
    ControlKey,
    Placeholder,
    Default,
}

impl CssClass {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pipe => "l",
            Self::Option => "o",
            Self::ControlKey => "k",
            Self::Placeholder => "s",
            Self::Default => "d",
        }
    }
}

/// One tag definition and its cached HTML renderings.
///
/// Renderings are pure functions of `(is_pipe, is_same_doc)` and are stored
/// in [`OnceLock`]s, so concurrent readers may race to fill a slot and will
/// always observe the same string.
#[derive(Debug, Clone)]
pub struct Link {
    filename: String,
    destination: String,
    anchor: Option<String>,
    display: String,
    class: CssClass,
    hrefs: [OnceLock<String>; 2],
    html: [OnceLock<String>; 4],
}

impl Link {
    /// Create a link for `tag` defined in `filename`, served at `destination`.
    #[must_use]
    pub fn new(filename: &str, destination: String, tag: &str) -> Self {
        let anchor = if tag == HELP_TAGS && filename == TAGS_FILE {
            None
        } else {
            Some(quote_plus(tag))
        };
        Self {
            filename: filename.to_owned(),
            destination,
            anchor,
            display: escape_html(tag).into_owned(),
            class: classify(tag),
            hrefs: Default::default(),
            html: Default::default(),
        }
    }

    /// File that defines the tag.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// HTML destination without fragment.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Percent-encoded fragment, absent for the whole-document tag.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Escaped tag text.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// Class derived from the tag text when the link was created.
    #[must_use]
    pub fn css_class(&self) -> CssClass {
        self.class
    }

    /// Link target, fragment-only when rendered inside the defining file.
    pub fn href(&self, is_same_doc: bool) -> &str {
        self.hrefs[usize::from(is_same_doc)].get_or_init(|| match &self.anchor {
            None => self.destination.clone(),
            Some(anchor) if is_same_doc => format!("#{anchor}"),
            Some(anchor) => format!("{}#{anchor}", self.destination),
        })
    }

    /// Anchor element for a reference to this tag.
    pub fn html(&self, is_pipe: bool, is_same_doc: bool) -> &str {
        let slot = usize::from(is_pipe) * 2 + usize::from(is_same_doc);
        self.html[slot].get_or_init(|| {
            let class = if is_pipe { CssClass::Pipe } else { self.class };
            format!(
                r#"<a href="{}" class="{}">{}</a>"#,
                self.href(is_same_doc),
                class.as_str(),
                self.display
            )
        })
    }
}
