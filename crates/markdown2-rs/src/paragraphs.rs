//! Paragraph formation: the last block-gamut step (spec §4.3 PARAGRAPHS).
//!
//! Whatever text remains after headers, lists, code blocks, and block
//! quotes have hashed themselves out is split on blank lines; each
//! surviving chunk that isn't already a bare hash-registry key (i.e. an
//! already-rendered block) is wrapped in `<p>` with its content run through
//! the span gamut.

use crate::document::Document;
use crate::extension::Registry;
use crate::hash::KEY_RE;
use crate::regexes::BLANK_LINES_RE;
use crate::span::span_gamut;

pub fn run(doc: &mut Document, registry: &Registry, text: &str) -> String {
    let trimmed = text.trim_matches('\n');
    if trimmed.is_empty() {
        return String::new();
    }
    let mut blocks = Vec::new();
    for block in BLANK_LINES_RE.split(trimmed) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        if is_bare_key(block) {
            blocks.push(block.to_string());
            continue;
        }
        if doc.options.extras.cuddled_lists && starts_with_cuddled_list(block) {
            blocks.push(render_cuddled(doc, registry, block));
            continue;
        }
        let inline = span_gamut(doc, registry, block);
        blocks.push(format!("<p>{inline}</p>"));
    }
    blocks.join("\n\n")
}

fn is_bare_key(block: &str) -> bool {
    KEY_RE.is_match(block) && KEY_RE.find(block).is_some_and(|m| m.start() == 0 && m.end() == block.len())
}

fn starts_with_cuddled_list(block: &str) -> bool {
    let mut lines = block.lines();
    let Some(first) = lines.next() else { return false };
    !first.trim_start().starts_with(['*', '-', '+']) && !first.chars().next().is_some_and(|c| c.is_ascii_digit())
        && lines.next().is_some_and(|l| crate::regexes::LIST_MARKER_RE.is_match(l))
}

fn render_cuddled(doc: &mut Document, registry: &Registry, block: &str) -> String {
    let mut lines = block.lines();
    let heading = lines.next().unwrap_or_default();
    let list_text: String = lines.collect::<Vec<_>>().join("\n");
    let inline = span_gamut(doc, registry, heading);
    let list_html = crate::lists::run(doc, registry, &list_text);
    format!("<p>{inline}</p>\n\n{}", list_html.trim_end_matches('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    fn empty_registry() -> Registry {
        Registry::build(Vec::new()).unwrap()
    }

    #[test]
    fn wraps_plain_text_in_paragraph() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let registry = empty_registry();
        let out = run(&mut doc, &registry, "hello world");
        assert_eq!(out, "<p>hello world</p>");
    }

    #[test]
    fn leaves_bare_hash_key_unwrapped() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let registry = empty_registry();
        let key = doc.hashes.store("<div>x</div>");
        let out = run(&mut doc, &registry, &key);
        assert_eq!(out, key);
    }
}
