//! Escaping and text helpers shared by the index and the renderer.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left untouched by [`quote_plus`]: ASCII alphanumerics plus `_.-~`.
const FRAGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Tab stop width used for layout-sensitive detection.
const TAB_WIDTH: usize = 8;

/// Escape `&`, `<` and `>` for HTML text content.
///
/// Quotes are left alone: tag text is never placed inside a quoted attribute
/// without first going through [`quote_plus`].
///
/// # Examples
///
/// ```
/// use vh_renderer::escape_html;
///
/// assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
/// assert_eq!(escape_html("\"quoted\""), "\"quoted\"");
/// ```
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Percent-encode a tag for use as a URL fragment, with spaces as `+`.
///
/// # Examples
///
/// ```
/// use vh_renderer::quote_plus;
///
/// assert_eq!(quote_plus("'tw'"), "%27tw%27");
/// assert_eq!(quote_plus("CTRL-W_~"), "CTRL-W_~");
/// ```
pub fn quote_plus(s: &str) -> String {
    s.split(' ')
        .map(|part| utf8_percent_encode(part, FRAGMENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Expand tabs to spaces with stops every eight columns.
pub(crate) fn expand_tabs(line: &str) -> Cow<'_, str> {
    if !line.contains('\t') {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_specials() {
        assert_eq!(escape_html("<C-R> & more"), "&lt;C-R&gt; &amp; more");
    }

    #[test]
    fn test_escape_html_borrows_plain_text() {
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_html_leaves_quotes() {
        assert_eq!(escape_html(r#"'a' "b""#), r#"'a' "b""#);
    }

    #[test]
    fn test_quote_plus_reserved() {
        assert_eq!(quote_plus("i_<C-R>"), "i_%3CC-R%3E");
        assert_eq!(quote_plus(":s/\\n"), "%3As%2F%5Cn");
    }

    #[test]
    fn test_quote_plus_space() {
        assert_eq!(quote_plus("a b"), "a+b");
    }

    #[test]
    fn test_quote_plus_non_ascii() {
        assert_eq!(quote_plus("é"), "%C3%A9");
    }

    #[test]
    fn test_expand_tabs_columns() {
        assert_eq!(expand_tabs("a\tb"), "a       b");
        assert_eq!(expand_tabs("\tx"), "        x");
        assert_eq!(expand_tabs("12345678\tx"), "12345678        x");
    }

    #[test]
    fn test_expand_tabs_without_tabs() {
        assert!(matches!(expand_tabs("no tabs"), Cow::Borrowed(_)));
    }
}
