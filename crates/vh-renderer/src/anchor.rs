//! Anchor synthesis for chapter headings without an explicit tag.

use crate::renderer::RenderError;

/// Heading characters that contribute to a synthesized tag.
const HEADING_PREFIX_CHARS: usize = 25;

/// Upper bound on `_N` suffixes tried before giving up.
pub const MAX_SUFFIX_ATTEMPTS: usize = 1000;

/// Derive the base tag for `heading`: `_` followed by its first characters
/// lowercased, with punctuation folded to `-` and everything else dropped.
pub(crate) fn base_tag(heading: &str) -> String {
    let mut tag = String::from("_");
    for c in heading.chars().take(HEADING_PREFIX_CHARS) {
        if c.is_alphanumeric() {
            tag.extend(c.to_lowercase());
        } else if matches!(c, ' ' | ',' | '.' | '?' | '!' | '\'' | '"') {
            tag.push('-');
        }
    }
    tag
}

/// Find the first free tag for `heading`.
///
/// The base tag is tried first, then `{base}_0`, `{base}_1`, and so on,
/// until `is_taken` rejects a candidate.
pub(crate) fn synthesize_tag(
    heading: &str,
    is_taken: impl Fn(&str) -> bool,
) -> Result<String, RenderError> {
    let base = base_tag(heading);
    if !is_taken(&base) {
        return Ok(base);
    }
    for i in 0..MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{base}_{i}");
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(RenderError::AnchorExhausted {
        base,
        attempts: MAX_SUFFIX_ATTEMPTS,
    })
}
