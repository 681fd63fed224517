//! Inline classification of a single help-file line.
//!
//! [`Tokenizer`] walks a tab-expanded line and yields [`Span`]s that cover it
//! completely. At every position the categories are tried in a fixed order
//! and the first one that matches consumes the text, so an earlier category
//! always shadows a later one starting at the same column.

use crate::link::CssClass;

/// Placeholder words accepted inside square brackets regardless of context.
const GRAMMAR_PLACEHOLDERS: &[&str] = &[
    "range",
    "line",
    "count",
    "offset",
    "cmd",
    "+cmd",
    "num",
    "-num",
    "+num",
    "++opt",
    "arg",
    "arguments",
    "ident",
    "addr",
    "group",
];

const CONTROL_PREFIXES: [&str; 4] = ["CTRL-SHIFT-", "CTRL-", "META-", "ALT-"];

const URL_SCHEMES: [&str; 3] = ["https://", "http://", "ftp://"];

/// Note markers in match order; `Notes` must precede `Note`.
const NOTE_WORDS: [&str; 4] = ["note", "NOTE", "Notes", "Note"];

/// One classified run of text within a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Span<'a> {
    /// Unclassified text between matches.
    Text(&'a str),
    /// Whole line ending in `~`, without the marker.
    Header(&'a str),
    /// Whole line ending in `` ` `` preceded by a space, without the marker.
    Graphic(&'a str),
    /// `|tag|` reference, delimiters stripped.
    PipeRef(&'a str),
    /// `*tag*` definition, delimiters stripped.
    TagDef(&'a str),
    /// `` `command` ``, delimiters stripped.
    Command(&'a str),
    /// `'option'` reference, quotes kept.
    OptionRef(&'a str),
    /// `CTRL-X` style key combination.
    ControlKey(&'a str),
    /// `<key>`, `{arg}` or `[range]` style placeholder.
    Placeholder(&'a str),
    /// Version or reference-manual banner.
    Banner(&'a str),
    /// `Note:` marker.
    Note(&'a str),
    /// Absolute URL.
    Url(&'a str),
    /// Any other word that may name a tag.
    Word(&'a str),
}

/// Iterator over the [`Span`]s of one line.
///
/// # Examples
///
/// ```
/// use vh_renderer::{Span, Tokenizer};
///
/// let spans: Vec<_> = Tokenizer::new("see |help|").collect();
/// assert_eq!(
///     spans,
///     [Span::Word("see"), Span::Text(" "), Span::PipeRef("help")]
/// );
/// ```
pub struct Tokenizer<'a> {
    line: &'a str,
    pos: usize,
    pending: Option<(Span<'a>, usize)>,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            pending: None,
        }
    }

    /// Find the leftmost match at or after the current position.
    fn next_match(&self) -> Option<(usize, usize, Span<'a>)> {
        let mut prev = self.line[..self.pos].chars().next_back();
        for (offset, c) in self.line[self.pos..].char_indices() {
            let at = self.pos + offset;
            if let Some((len, span)) = match_at(self.line, at, prev) {
                return Some((at, at + len, span));
            }
            prev = Some(c);
        }
        None
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        if let Some((span, end)) = self.pending.take() {
            self.pos = end;
            return Some(span);
        }
        if self.pos >= self.line.len() {
            return None;
        }
        match self.next_match() {
            Some((start, end, span)) if start > self.pos => {
                let text = &self.line[self.pos..start];
                self.pending = Some((span, end));
                self.pos = start;
                Some(Span::Text(text))
            }
            Some((_, end, span)) => {
                self.pos = end;
                Some(span)
            }
            None => {
                let text = &self.line[self.pos..];
                self.pos = self.line.len();
                Some(Span::Text(text))
            }
        }
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

/// Classify a tag name by the reference category its text looks like.
///
/// Only the option, control-key and placeholder forms are considered, and
/// only at the very start of the tag.
pub(crate) fn classify(tag: &str) -> CssClass {
    if option_ref(tag).is_some() {
        CssClass::Option
    } else if control_key(tag).is_some() {
        CssClass::ControlKey
    } else if placeholder(tag, None).is_some() {
        CssClass::Placeholder
    } else {
        CssClass::Default
    }
}

/// Try every category at byte offset `at`, in precedence order.
///
/// Returns the byte length of the match and its span.
fn match_at<'a>(line: &'a str, at: usize, prev: Option<char>) -> Option<(usize, Span<'a>)> {
    let rest = &line[at..];
    header(line, at)
        .or_else(|| graphic(line, at))
        .or_else(|| pipe_ref(rest, prev))
        .or_else(|| tag_def(rest))
        .or_else(|| command(rest))
        .or_else(|| option_ref(rest))
        .or_else(|| control_key(rest))
        .or_else(|| placeholder(rest, prev))
        .or_else(|| banner(rest))
        .or_else(|| note(rest, prev))
        .or_else(|| url(rest))
        .or_else(|| word(rest, prev))
}

/// Characters that make up a bare word.
fn is_word_char(c: char) -> bool {
    matches!(c, '!' | '#'..=')' | '+'..='{' | '}' | '~' | '\u{C0}'..='\u{FF}')
}

fn is_pipe_char(c: char) -> bool {
    matches!(c, '!' | '#'..=')' | '+'..='{' | '}' | '~')
}

fn is_star_char(c: char) -> bool {
    matches!(c, '!' | '#'..=')' | '+'..='~')
}

/// Byte length of the leading run of characters satisfying `pred`.
fn run_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.find(|c| !pred(c)).unwrap_or(s.len())
}

fn header(line: &str, at: usize) -> Option<(usize, Span<'_>)> {
    if at != 0 {
        return None;
    }
    line.strip_suffix('~')
        .map(|text| (line.len(), Span::Header(text)))
}

fn graphic(line: &str, at: usize) -> Option<(usize, Span<'_>)> {
    if at != 0 {
        return None;
    }
    line.strip_suffix(" `")
        .map(|text| (line.len(), Span::Graphic(text)))
}

fn pipe_ref(rest: &str, prev: Option<char>) -> Option<(usize, Span<'_>)> {
    let body = rest.strip_prefix('|')?;
    if prev == Some('\\') {
        return None;
    }
    let n = run_len(body, is_pipe_char);
    (n > 0 && body[n..].starts_with('|')).then(|| (n + 2, Span::PipeRef(&body[..n])))
}

fn tag_def(rest: &str) -> Option<(usize, Span<'_>)> {
    let body = rest.strip_prefix('*')?;
    let n = run_len(body, is_star_char);
    if n == 0 {
        return None;
    }
    let after = body[n..].strip_prefix('*')?;
    after
        .chars()
        .next()
        .is_none_or(char::is_whitespace)
        .then(|| (n + 2, Span::TagDef(&body[..n])))
}

fn command(rest: &str) -> Option<(usize, Span<'_>)> {
    let body = rest.strip_prefix('`')?;
    let n = run_len(body, |c| c != '`' && c != ' ');
    (n > 0 && body[n..].starts_with('`')).then(|| (n + 2, Span::Command(&body[..n])))
}

fn option_ref(rest: &str) -> Option<(usize, Span<'_>)> {
    let body = rest.strip_prefix('\'')?;
    let n = run_len(body, |c| c.is_ascii_lowercase());
    let inner = if n >= 2 && body[n..].starts_with('\'') {
        n
    } else {
        terminal_option_len(body)?
    };
    let len = inner + 2;
    Some((len, Span::OptionRef(&rest[..len])))
}

/// Length of a `t_xx` terminal option name followed by a closing quote.
fn terminal_option_len(body: &str) -> Option<usize> {
    let codes = body.strip_prefix("t_")?;
    let mut chars = codes.chars();
    let width = chars.next()?.len_utf8() + chars.next()?.len_utf8();
    codes[width..].starts_with('\'').then_some(2 + width)
}

fn control_key(rest: &str) -> Option<(usize, Span<'_>)> {
    let mut len = CONTROL_PREFIXES
        .iter()
        .find(|prefix| rest.starts_with(*prefix))?
        .len();
    if rest[len..].starts_with("W_") {
        len += 2;
    }
    len += key_len(&rest[len..]);
    Some((len, Span::ControlKey(&rest[..len])))
}

/// Length of the key that completes a control-key combination, if any.
fn key_len(s: &str) -> usize {
    if s.starts_with("{char}") {
        return "{char}".len();
    }
    if let Some(len) = key_name_len(s) {
        return len;
    }
    s.chars().next().map_or(0, char::len_utf8)
}

/// Length of `<Name>` or `<C-x>` at the start of `s`.
fn key_name_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('<')?;
    let n = run_len(body, |c| c.is_ascii_alphabetic());
    if n > 0 && body[n..].starts_with('>') {
        return Some(n + 2);
    }
    modifier_key_len(body)
}

/// Length of `<S-x>`, `<C-x>` or `<M-x>`, given the text after the `<`.
fn modifier_key_len(body: &str) -> Option<usize> {
    let key = body
        .strip_prefix("S-")
        .or_else(|| body.strip_prefix("C-"))
        .or_else(|| body.strip_prefix("M-"))?;
    let width = key.chars().next()?.len_utf8();
    key[width..].starts_with('>').then_some(1 + 2 + width + 1)
}

fn placeholder(rest: &str, prev: Option<char>) -> Option<(usize, Span<'_>)> {
    let len = match rest.as_bytes().first()? {
        b'<' => angle_placeholder_len(&rest[1..])?,
        b'{' => brace_placeholder_len(&rest[1..])?,
        b'[' => bracket_placeholder_len(&rest[1..], prev)?,
        _ => return None,
    };
    Some((len, Span::Placeholder(&rest[..len])))
}

fn angle_placeholder_len(body: &str) -> Option<usize> {
    let n = run_len(body, |c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if n > 0 && body[n..].starts_with('>') {
        return Some(n + 2);
    }
    modifier_key_len(body)
}

fn brace_placeholder_len(body: &str) -> Option<usize> {
    let first = body.chars().next()?.len_utf8();
    let close = body[first..].find('}')?;
    Some(1 + first + close + 1)
}

fn bracket_placeholder_len(body: &str, prev: Option<char>) -> Option<usize> {
    if let Some(close) = body.find(']')
        && GRAMMAR_PLACEHOLDERS.contains(&&body[..close])
    {
        return Some(close + 2);
    }
    if !prev.is_some_and(char::is_whitespace) {
        return None;
    }
    let n = run_len(body, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '^' | '_')
    });
    (n >= 2 && body[n..].starts_with(']')).then_some(n + 2)
}

fn banner(rest: &str) -> Option<(usize, Span<'_>)> {
    if let Some(body) = rest.strip_prefix("Vim version ") {
        let n = run_len(body, |c| {
            c.is_ascii_digit() || c.is_ascii_lowercase() || c == '.'
        });
        if n > 0 {
            let len = "Vim version ".len() + n;
            return Some((len, Span::Banner(&rest[..len])));
        }
    }
    (rest.starts_with("NVIM REFERENCE") || rest.starts_with("VIM REFERENCE"))
        .then(|| (rest.len(), Span::Banner(rest)))
}

fn note(rest: &str, prev: Option<char>) -> Option<(usize, Span<'_>)> {
    if prev.is_some_and(is_word_char) {
        return None;
    }
    for marker in NOTE_WORDS {
        if !rest.starts_with(marker) {
            continue;
        }
        let with_colon = rest[marker.len()..]
            .starts_with(':')
            .then_some(marker.len() + 1);
        for len in with_colon.into_iter().chain([marker.len()]) {
            if rest[len..].chars().next().is_none_or(|c| !is_word_char(c)) {
                return Some((len, Span::Note(&rest[..len])));
            }
        }
    }
    None
}

fn url(rest: &str) -> Option<(usize, Span<'_>)> {
    let scheme = URL_SCHEMES
        .iter()
        .find(|scheme| rest.starts_with(*scheme))?
        .len();
    let body = &rest[scheme..];
    let run = run_len(body, |c| !matches!(c, '\'' | '"' | '<' | '>' | ' ' | '\t'));
    let (last, c) = body[..run]
        .char_indices()
        .rev()
        .find(|&(i, c)| i > 0 && (c.is_ascii_alphanumeric() || c == '/'))?;
    let len = scheme + last + c.len_utf8();
    Some((len, Span::Url(&rest[..len])))
}

fn word(rest: &str, prev: Option<char>) -> Option<(usize, Span<'_>)> {
    if prev.is_some_and(is_word_char) {
        return None;
    }
    let n = run_len(rest, is_word_char);
    (n > 0).then(|| (n, Span::Word(&rest[..n])))
}
