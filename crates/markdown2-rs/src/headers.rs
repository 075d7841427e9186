//! ATX and Setext header processing, header-id slugging, and table-of-
//! contents collection (spec §4.3 HEADERS, §4.9).

use unicode_normalization::UnicodeNormalization;

use crate::document::Document;
use crate::extension::Registry;
use crate::regexes::{ATX_HEADER_RE, ATX_HEADER_TAG_FRIENDLY_RE, SETEXT_HEADER_RE};
use crate::span;

/// Run header processing over a block-gamut-scoped chunk of text.
pub fn run(doc: &mut Document, registry: &Registry, text: &str) -> String {
    let text = run_setext(doc, registry, text);
    run_atx(doc, registry, &text)
}

fn run_setext(doc: &mut Document, registry: &Registry, text: &str) -> String {
    SETEXT_HEADER_RE
        .replace_all(text, |caps: &regex::Captures| {
            let level: u8 = if caps[2].starts_with('=') { 1 } else { 2 };
            render_header(doc, registry, level, caps[1].trim())
        })
        .into_owned()
}

fn run_atx(doc: &mut Document, registry: &Registry, text: &str) -> String {
    let re = if doc.options.extras.tag_friendly { &*ATX_HEADER_TAG_FRIENDLY_RE } else { &*ATX_HEADER_RE };
    re.replace_all(text, |caps: &regex::Captures| {
        let level = caps[1].len() as u8;
        render_header(doc, registry, level, caps[2].trim())
    })
    .into_owned()
}

fn render_header(doc: &mut Document, registry: &Registry, level: u8, raw: &str) -> String {
    let level = demoted_level(doc, level);
    let inline = span::span_gamut(doc, registry, raw);
    let id_attr = header_id_attr(doc, level, raw);
    let class_attr = doc
        .options
        .extras
        .html_classes
        .as_ref()
        .and_then(|c| c.classes.get(&format!("h{level}")))
        .map(|c| format!(" class=\"{c}\""))
        .unwrap_or_default();
    format!("<h{level}{id_attr}{class_attr}>{inline}</h{level}>\n\n")
}

fn demoted_level(doc: &Document, level: u8) -> u8 {
    match doc.options.extras.demote_headers {
        Some(n) => (level + n).min(6),
        None => level,
    }
}

/// Note: `opts.mixed` (apply ids/TOC entries to raw `<hN>` HTML blocks, not
/// just Markdown headers) and `opts.reset_count` (reset the slug-collision
/// counters per `convert` call) are declared on [`crate::options::HeaderIdsOptions`]
/// but not consulted here — see DESIGN.md's header-ids entry for why.
fn header_id_attr(doc: &mut Document, level: u8, raw_text: &str) -> String {
    let header_ids = doc.options.extras.header_ids.clone();
    let toc = doc.options.extras.toc.is_some();
    if header_ids.is_none() && !toc {
        return String::new();
    }
    let opts = header_ids.unwrap_or_default();
    let mut base = slugify(raw_text);
    if let Some(prefix) = &opts.prefix {
        base = format!("{prefix}{base}");
    }
    let id = doc.unique_slug(&base);
    if doc.options.extras.toc.as_ref().is_some_and(|t| level <= t.depth) {
        doc.toc.push(crate::document::TocEntry { level, id: id.clone(), text: strip_tags(raw_text) });
    }
    format!(" id=\"{id}\"")
}

fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Slugify header text: NFKD normalize, strip non-word characters, lowercase,
/// collapse whitespace/hyphens to a single `-` (spec §4.9, grounded in the
/// reference implementation's `_slugify`).
pub fn slugify(text: &str) -> String {
    let normalized: String = text.nfkd().collect();
    let mut out = String::with_capacity(normalized.len());
    let mut last_was_sep = false;
    for ch in normalized.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !last_was_sep && !out.is_empty() {
                out.push('-');
                last_was_sep = true;
            }
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Render the collected table of contents as nested `<ul>` lists.
pub fn render_toc(entries: &[crate::document::TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let min_level = entries.iter().map(|e| e.level).min().unwrap();
    let mut out = String::new();
    let mut current = min_level;
    out.push_str("<ul>\n");
    for entry in entries {
        while current < entry.level {
            out.push_str("<ul>\n");
            current += 1;
        }
        while current > entry.level {
            out.push_str("</ul>\n");
            current -= 1;
        }
        out.push_str(&format!("<li><a href=\"#{}\">{}</a></li>\n", entry.id, entry.text));
    }
    while current > min_level {
        out.push_str("</ul>\n");
        current -= 1;
    }
    out.push_str("</ul>\n");
    out
}
