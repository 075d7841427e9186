//! The inline transformer (SPEC_FULL.md C3; spec §4.3 SPAN_GAMUT).
//!
//! Applied to every run of inline text — paragraph content, header text,
//! list item text, table cell text — in the fixed sub-order: code spans,
//! backslash-escaped characters, links/images, autolinks, italic and bold,
//! then line breaks. Each step is a global substitution over the whole
//! input, matching the reference implementation's `span_gamut`.

use crate::document::Document;
use crate::extension::{Registry, Stage};
use crate::links;
use crate::regexes::{
    self, AUTOLINK_EMAIL_RE, AUTOLINK_URL_RE, CODE_SPAN_OPEN_RE, EM_ASTERISK_RE, EM_UNDERSCORE_RE,
    HARD_BREAK_RE, STRONG_ASTERISK_RE, STRONG_EM_RE, STRONG_UNDERSCORE_RE,
};

/// Run the full inline pipeline over `text`. Dispatches `Stage::SpanGamut`'s
/// pre/post extension hooks around its own work, once per invocation/chunk
/// (one call per header, paragraph, list item, table cell, ...) rather than
/// once globally, matching the reference implementation's `mark_stage`
/// decorator on `_run_span_gamut` itself.
pub fn span_gamut(doc: &mut Document, registry: &Registry, text: &str) -> String {
    let text = registry.run_pre(Stage::SpanGamut, doc, text.to_string());
    let text = hash_code_spans(doc, &text);
    let text = escape_backslashes(doc, &text);
    let text = links::process(doc, &text);
    let text = autolinks(doc, &text);
    let text = emphasis(doc, &text);
    let text = line_breaks(doc, &text);
    registry.run_post(Stage::SpanGamut, doc, text)
}

/// Replace every backtick-delimited code span with a hashed `<code>` HTML
/// fragment. Done by hand (not a single regex) because `regex` has no
/// lookaround/backreferences to express "closing run of exactly N
/// backticks, not itself adjacent to a backtick".
fn hash_code_spans(doc: &mut Document, text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let open_len = run_len(bytes, i, b'`');
            let open_end = i + open_len;
            if let Some((content_end, close_end)) = find_closing_run(bytes, open_end, open_len) {
                let content = &text[open_end..content_end];
                let trimmed = content.trim();
                let escaped = crate::html_shield::escape_code_text(trimmed);
                let key = doc.hashes.store(&format!("<code>{escaped}</code>"));
                out.push_str(&key);
                i = close_end;
                continue;
            }
        }
        let ch_len = text[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        out.push_str(&text[i..i + ch_len]);
        i += ch_len;
    }
    out
}

fn run_len(bytes: &[u8], start: usize, b: u8) -> usize {
    let mut n = 0;
    while start + n < bytes.len() && bytes[start + n] == b {
        n += 1;
    }
    n
}

fn find_closing_run(bytes: &[u8], from: usize, open_len: usize) -> Option<(usize, usize)> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let len = run_len(bytes, i, b'`');
            if len == open_len {
                return Some((i, i + len));
            }
            i += len;
        } else {
            i += 1;
        }
    }
    None
}

/// Replace `\X` for every escapable `X` with a hashed literal placeholder so
/// later stages (emphasis, link syntax) never reinterpret it.
fn escape_backslashes(doc: &mut Document, text: &str) -> String {
    let include_quotes = doc.options.extras.smarty_pants;
    let re = regexes::backslash_escape_regex(include_quotes);
    re.replace_all(text, |caps: &regex::Captures| {
        let literal = &caps[1];
        doc.hashes.store(literal)
    })
    .into_owned()
}

fn autolinks(doc: &mut Document, text: &str) -> String {
    let text = AUTOLINK_URL_RE
        .replace_all(text, |caps: &regex::Captures| {
            let url = &caps[1];
            format!("<a href=\"{}\">{}</a>", links::escape_href(url), links::xml_escape(url))
        })
        .into_owned();
    AUTOLINK_EMAIL_RE
        .replace_all(&text, |caps: &regex::Captures| links::obfuscate_email(doc, &caps[1]))
        .into_owned()
}

fn emphasis(doc: &Document, text: &str) -> String {
    let mut text = STRONG_EM_RE.replace_all(text, "<strong><em>$a</em></strong>").into_owned();
    text = STRONG_ASTERISK_RE.replace_all(&text, "<strong>$a</strong>").into_owned();
    text = EM_ASTERISK_RE.replace_all(&text, "<em>$a</em>").into_owned();

    let allow_middle = doc.options.extras.middle_word_em.map(|o| o.allowed).unwrap_or(true);
    if allow_middle {
        text = text.replace("__", "\u{0}STRONGU\u{0}");
        text = STRONG_UNDERSCORE_RE.replace_all(&text, "${1}<strong>$a</strong>${3}").into_owned();
        text = text.replace("\u{0}STRONGU\u{0}", "__");
        text = EM_UNDERSCORE_RE.replace_all(&text, "${1}<em>$a</em>${3}").into_owned();
    } else {
        text = STRONG_UNDERSCORE_RE.replace_all(&text, "${1}<strong>$a</strong>${3}").into_owned();
        text = EM_UNDERSCORE_RE.replace_all(&text, "${1}<em>$a</em>${3}").into_owned();
    }
    text
}

fn line_breaks(doc: &Document, text: &str) -> String {
    let mut text = HARD_BREAK_RE.replace_all(text, "<br />\n").into_owned();
    if let Some(breaks) = doc.options.extras.breaks {
        if breaks.on_backslash {
            text = regexes::BACKSLASH_BREAK_RE.replace_all(&text, "<br />\n").into_owned();
        }
        if breaks.on_newline {
            text = text.replace('\n', "<br />\n");
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    fn empty_registry() -> Registry {
        Registry::build(Vec::new()).unwrap()
    }

    #[test]
    fn code_spans_are_hashed_and_restored() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let registry = empty_registry();
        let out = span_gamut(&mut doc, &registry, "a `b c` d");
        let restored = doc.hashes.unhash(&out);
        assert_eq!(restored, "a <code>b c</code> d");
    }

    #[test]
    fn double_backtick_allows_embedded_single_backtick() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let registry = empty_registry();
        let out = span_gamut(&mut doc, &registry, "``a ` b``");
        let restored = doc.hashes.unhash(&out);
        assert_eq!(restored, "<code>a ` b</code>");
    }

    #[test]
    fn emphasis_markers_render() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let registry = empty_registry();
        let out = span_gamut(&mut doc, &registry, "*em* and **strong**");
        assert_eq!(out, "<em>em</em> and <strong>strong</strong>");
    }
}
