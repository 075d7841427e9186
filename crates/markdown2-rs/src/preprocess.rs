//! The `PREPROCESS` stage (spec §4.3, §4.4; SPEC_FULL.md §11
//! `use_file_vars`).
//!
//! Normalizes line endings, optionally reads Emacs-style file-variable
//! headers/footers to toggle extras for just this document, and (when the
//! `metadata` extra is active) extracts a leading `key: value` metadata
//! block.

use std::collections::HashMap;

use crate::document::Document;
use crate::regexes::{EMACS_LOCAL_VARS_RE, EMACS_ONELINER_VARS_RE, METADATA_FENCE_RE, METADATA_LINE_RE};

/// Normalize CRLF/CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Expand every tab to spaces at `doc.options.tab_width`-column stops (spec
/// §4.3), matching the reference implementation's unconditional `_detab`
/// pass at the very start of preprocessing.
pub fn detab(doc: &Document, text: &str) -> String {
    crate::util::detab(text, doc.options.tab_width)
}

/// Blank out lines that contain only spaces/tabs, so later stages can match
/// paragraph breaks with a simple `\n+` instead of `[ \t]*\n+` (spec §4.3,
/// mirroring the reference implementation's `_ws_only_line_re` pass).
pub fn strip_whitespace_only_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| if line.chars().all(|c| c == ' ' || c == '\t') { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse Emacs `-*- var: val; ... -*-` and `Local Variables: ... End:`
/// blocks into a `var -> value` map (spec §6 `use_file_vars`).
pub fn extract_file_vars(text: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    if let Some(caps) = EMACS_ONELINER_VARS_RE.captures(text) {
        parse_var_pairs(&caps["vars"], &mut vars);
    }
    if let Some(caps) = EMACS_LOCAL_VARS_RE.captures(text) {
        for line in caps["body"].lines() {
            parse_var_pairs(line, &mut vars);
        }
    }
    vars
}

fn parse_var_pairs(s: &str, out: &mut HashMap<String, String>) {
    for pair in s.split(';') {
        let pair = pair.trim();
        if let Some((key, val)) = pair.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                out.insert(key.to_lowercase(), val.trim().to_string());
            }
        }
    }
}

/// Strip a leading `---\nkey: value\n...\n---` (or bare, blank-line
/// terminated) metadata block and record it on `doc`.
pub fn extract_metadata<'a>(doc: &mut Document, text: &'a str) -> &'a str {
    if !doc.options.extras.metadata {
        return text;
    }
    let mut lines = text.lines();
    let fenced = lines.clone().next().is_some_and(|l| METADATA_FENCE_RE.is_match(l));
    if fenced {
        lines.next();
    }
    let mut consumed_bytes = if fenced { text.find('\n').map(|p| p + 1).unwrap_or(0) } else { 0 };
    let mut any = false;
    loop {
        let remaining = &text[consumed_bytes..];
        let Some(line) = remaining.lines().next() else { break };
        if line.trim().is_empty() {
            if fenced || any {
                consumed_bytes += line.len() + 1;
            }
            break;
        }
        if fenced && METADATA_FENCE_RE.is_match(line) {
            consumed_bytes += line.len() + 1;
            break;
        }
        let Some(caps) = METADATA_LINE_RE.captures(line) else { break };
        doc.metadata.insert(caps["key"].to_string(), caps["value"].trim().to_string());
        any = true;
        consumed_bytes += line.len() + 1;
    }
    if any || fenced { &text[consumed_bytes.min(text.len())..] } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn normalizes_crlf() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn detab_uses_configured_tab_width() {
        let mut opts = ConversionOptions::default();
        opts.tab_width = 2;
        let doc = Document::new(&opts);
        assert_eq!(detab(&doc, "\tfoo"), "  foo");
    }

    #[test]
    fn strip_whitespace_only_lines_blanks_them() {
        let out = strip_whitespace_only_lines("a\n   \nb\n\t\nc");
        assert_eq!(out, "a\n\nb\n\nc");
    }

    #[test]
    fn extracts_oneliner_file_vars() {
        let vars = extract_file_vars("<!-- -*- markdown-extras: footnotes -*- -->\ntext");
        assert_eq!(vars.get("markdown-extras").unwrap(), "footnotes");
    }

    #[test]
    fn extracts_metadata_block() {
        let mut opts = ConversionOptions::default();
        opts.extras.metadata = true;
        let mut doc = Document::new(&opts);
        let rest = extract_metadata(&mut doc, "title: Hello\nauthor: Me\n\nBody text");
        assert_eq!(doc.metadata.get("title").unwrap(), "Hello");
        assert_eq!(rest.trim(), "Body text");
    }
}
