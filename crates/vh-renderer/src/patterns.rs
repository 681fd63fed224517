//! Line-level patterns shared by index scanning and rendering.

use std::sync::LazyLock;

use regex::Regex;

/// Line separator; a `\r\n` pair counts as one break.
pub(crate) static NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|[\r\n]").unwrap());

/// First two fields of an index table record.
pub(crate) static TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S+)").unwrap());

/// `*tag*` definition followed by whitespace or end of line.
pub(crate) static STAR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\*([^ \t"*]+)\*(?:\s|$)"#).unwrap());

/// Horizontal rule made of `=` or `-` runs.
pub(crate) static HRULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:===.*===|---.*---)$").unwrap());

/// Double rule that introduces a chapter heading on the next line.
pub(crate) static HRULE_DOUBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^===.*===$").unwrap());

/// Line that opens a literal block on the following line.
pub(crate) static EXAMPLE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:.* )?>$").unwrap());

/// Line that closes a literal block.
pub(crate) static EXAMPLE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^ \t]").unwrap());

/// Upper-case section label at the start of a line.
static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z.][-A-Z0-9 .,()_?]*)(?:\s+\*|$)").unwrap());

/// Chapter heading text once the numbering prefix is removed.
static HEADING_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?) *(?:\*|~?$)").unwrap());

/// Marker line in `help.txt` after which the FAQ entry is inserted.
pub(crate) static LOCAL_ADDITIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^LOCAL ADDITIONS:\s+\*local-additions\*$").unwrap());

/// Lines after a double rule that never start a chapter.
const NOT_HEADINGS: [&str; 5] = [
    "vim:",
    "Next chapter:",
    "Copyright: ",
    "Table of contents:",
    "Advance information about",
];

/// Match a section label, returning the byte offset where the label ends.
pub(crate) fn section_label(line: &str) -> Option<usize> {
    if line == "NOTE" || line == "..." || line.starts_with("CTRL-") {
        return None;
    }
    SECTION
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|label| label.end())
}

/// Extract chapter heading text from a line following a double rule.
///
/// The numbering prefix (digits, dots, spaces and stars) is tried from its
/// longest form down to empty, the same way a backtracking matcher would.
pub(crate) fn chapter_heading(line: &str) -> Option<&str> {
    let prefix = line
        .find(|c: char| !matches!(c, '0'..='9' | '.' | ' ' | '*'))
        .unwrap_or(line.len());
    (0..=prefix).rev().find_map(|start| {
        let rest = &line[start..];
        let lead = rest.trim_start_matches(' ');
        if rest.is_empty() || NOT_HEADINGS.iter().any(|p| lead.starts_with(p)) {
            return None;
        }
        HEADING_BODY
            .captures(rest)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}
