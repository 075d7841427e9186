//! HTML shielding: the `HASH_HTML` stage (spec §4.4; SPEC_FULL.md C5).
//!
//! Raw block-level HTML — elements whose tag name is in
//! [`crate::regexes::BLOCK_TAGS`], plus HTML comments — is located at the
//! top of a line, depth-counted against its own closing tag, and replaced
//! whole with a hash-registry key so none of its contents gets reinterpreted
//! as Markdown by later stages. `UNHASH_HTML` (spec §4.4, the pipeline's
//! final stage) restores it — verbatim if `safe_mode` is off, otherwise
//! with the block's content passed through [`Document::options`]'s
//! `safe_mode` transform (spec §4.5, §7) before storage.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::options::SafeMode;
use crate::regexes::BLOCK_TAGS;

const SAFE_MODE_REPLACEMENT: &str = "[HTML_REMOVED]";

fn sanitize_block(doc: &Document, block: &str) -> String {
    match doc.options.safe_mode {
        None => block.to_string(),
        Some(SafeMode::Escape) => escape_code_text(block),
        Some(SafeMode::Replace) => SAFE_MODE_REPLACEMENT.to_string(),
    }
}

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

fn open_close_re(tag: &str) -> (Regex, Regex) {
    (
        Regex::new(&format!(r"(?i)<{tag}(?:\s[^>]*)?>")).unwrap(),
        Regex::new(&format!(r"(?i)</{tag}\s*>")).unwrap(),
    )
}

/// Hash out every top-level raw HTML block and comment in `text`.
pub fn hash_blocks(doc: &mut Document, text: &str) -> String {
    let text = hash_comments(doc, text);
    hash_tagged_blocks(doc, &text, true)
}

/// Re-hash the block-level HTML `block_gamut` itself just rendered (headers,
/// lists, a `tables`-extra block) right before `PARAGRAPHS` runs, so that
/// stage doesn't wrap already-rendered markup in a second `<p>`. Mirrors the
/// reference implementation's second, non-`raw` `_hash_html_blocks` call in
/// `_run_block_gamut`: this is markup the converter just generated, not raw
/// source HTML, so it's never safe-mode-sanitized here regardless of
/// `safe_mode`.
pub fn hash_rendered_blocks(doc: &mut Document, text: &str) -> String {
    hash_tagged_blocks(doc, text, false)
}

fn hash_comments(doc: &mut Document, text: &str) -> String {
    COMMENT_RE
        .replace_all(text, |caps: &regex::Captures| {
            let sanitized = sanitize_block(doc, &caps[0]);
            doc.hashes.store(&sanitized)
        })
        .into_owned()
}

fn hash_tagged_blocks(doc: &mut Document, text: &str, sanitize: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: loop {
        let mut best: Option<(usize, usize, &str)> = None;
        for tag in BLOCK_TAGS {
            let marker = format!("<{tag}");
            if let Some(pos) = find_line_start_tag(rest, &marker) {
                if best.is_none_or(|(p, ..)| pos < p) {
                    best = Some((pos, marker.len(), tag));
                }
            }
        }
        let Some((pos, _, tag)) = best else {
            out.push_str(rest);
            break 'outer;
        };
        out.push_str(&rest[..pos]);
        let (open_re, close_re) = open_close_re(tag);
        match extract_block(&rest[pos..], &open_re, &close_re) {
            Some((block, consumed)) => {
                let sanitized = if sanitize { sanitize_block(doc, block) } else { block.to_string() };
                let key = doc.hashes.store(&sanitized);
                // Wrap the key in blank lines on both sides so it always stands as
                // its own block for PARAGRAPHS, regardless of how much blank-line
                // whitespace (if any) surrounded the original tag in the source.
                out.push_str("\n\n");
                out.push_str(&key);
                out.push_str("\n\n");
                rest = &rest[pos + consumed..];
            }
            None => {
                // No balanced close found; treat the opening tag itself as
                // plain text and keep scanning past it.
                out.push_str(&rest[pos..pos + 1]);
                rest = &rest[pos + 1..];
            }
        }
    }
    out
}

fn find_line_start_tag(text: &str, marker: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mlen = marker.len();
    let mut i = 0;
    while i + mlen <= bytes.len() {
        let at_line_start = i == 0 || bytes[i - 1] == b'\n';
        if at_line_start && text[i..].to_lowercase().starts_with(&marker.to_lowercase()) {
            let after = text.as_bytes().get(i + mlen).copied();
            if matches!(after, None | Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'/')) {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn extract_block<'a>(text: &'a str, open_re: &Regex, close_re: &Regex) -> Option<(&'a str, usize)> {
    let first_open = open_re.find(text)?;
    if first_open.start() != 0 {
        return None;
    }
    let mut depth = 0usize;
    let mut pos = 0usize;
    loop {
        let next_open = open_re.find_at(text, pos);
        let next_close = close_re.find_at(text, pos);
        match (next_open, next_close) {
            (_, None) => return None,
            (Some(o), Some(c)) if o.start() < c.start() => {
                depth += 1;
                pos = o.end();
            }
            (_, Some(c)) => {
                depth -= 1;
                pos = c.end();
                if depth == 0 {
                    return Some((&text[..pos], pos));
                }
            }
        }
    }
}

/// HTML-escape the literal payload of a code span or block: only `&`, `<`,
/// `>` need escaping since the content is rendered inside `<code>`/`<pre>`,
/// not an attribute.
pub fn escape_code_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
