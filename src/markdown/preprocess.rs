use once_cell::sync::Lazy;
use regex::Regex;

/// The marker requesting a table of contents, along with the newline that
/// usually ends its line.
static TOC_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[TOC\]\n?").unwrap());

/// Normalize line endings to `\n` and drop everything up to and including the
/// first `[TOC]` marker.
pub fn preprocess(source: &str) -> String {
    let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
    match TOC_MARKER.find(&normalized) {
        Some(m) => normalized[m.end()..].to_string(),
        None => normalized,
    }
}

/// Does the (raw, unprocessed) source ask for a table of contents?
pub fn has_toc_marker(source: &str) -> bool {
    TOC_MARKER.is_match(source)
}
