//! The `POSTPROCESS` stage (spec §4.3, §4.4).
//!
//! Appends the rendered footnote list (if any footnote was cited) and
//! prepends the table of contents when `toc.prepend` is set. Runs after
//! `BLOCK_GAMUT`/`SPAN_GAMUT` and before the final `UNHASH_HTML` pass, so
//! any hash keys it introduces (a footnote body can itself contain a code
//! block) still get resolved.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::extension::Registry;
use crate::headers::render_toc;

pub fn run(doc: &mut Document, registry: &Registry, text: &str) -> String {
    let mut out = text.to_string();

    if !doc.footnote_order.is_empty() {
        let list = crate::footnotes::render_list(doc, registry);
        out.push_str("\n\n");
        out.push_str(&list);
    }

    if let Some(toc_opts) = doc.options.extras.toc.clone() {
        if toc_opts.prepend && !doc.toc.is_empty() {
            let toc_html = render_toc(&doc.toc);
            out = format!("{toc_html}\n{out}");
        }
    }

    out
}

static ANCHOR_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<a\s+[^>]*href=[^>]*>").unwrap());
static REL_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\srel\s*=\s*"([^"]*)""#).unwrap());

/// Add `rel="nofollow"`/`target="_blank"` to every `<a href=...>` tag in the
/// fully unhashed output (spec §11, grounded in the reference
/// implementation's `_a_sub_pattern`). Unlike link rendering in `links.rs`,
/// this runs over the final HTML so it also reaches anchors that arrived as
/// raw, already-hashed HTML blocks rather than Markdown link syntax.
pub fn apply_link_attrs(doc: &Document, text: &str) -> String {
    if !doc.options.extras.nofollow && !doc.options.extras.target_blank_links {
        return text.to_string();
    }
    ANCHOR_TAG_RE
        .replace_all(text, |caps: &regex::Captures| {
            let tag = &caps[0];
            let mut rel: Vec<String> = match REL_ATTR_RE.captures(tag) {
                Some(c) => c[1].split_whitespace().map(str::to_string).collect(),
                None => Vec::new(),
            };
            if doc.options.extras.nofollow && !rel.iter().any(|r| r == "nofollow") {
                rel.push("nofollow".to_string());
            }
            if doc.options.extras.target_blank_links && !rel.iter().any(|r| r == "noopener") {
                rel.push("noopener".to_string());
            }
            let without_rel = REL_ATTR_RE.replace(tag, "").into_owned();
            let rel_attr = format!(" rel=\"{}\"", rel.join(" "));
            let with_target = if doc.options.extras.target_blank_links && !without_rel.contains("target=") {
                " target=\"_blank\""
            } else {
                ""
            };
            without_rel.trim_end_matches('>').to_string() + &rel_attr + with_target + ">"
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn leaves_text_unchanged_without_footnotes_or_toc() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let registry = Registry::build(Vec::new()).unwrap();
        assert_eq!(run(&mut doc, &registry, "<p>hi</p>"), "<p>hi</p>");
    }

    #[test]
    fn apply_link_attrs_is_noop_when_extras_disabled() {
        let opts = ConversionOptions::default();
        let doc = Document::new(&opts);
        let html = r#"<a href="http://x">x</a>"#;
        assert_eq!(apply_link_attrs(&doc, html), html);
    }

    #[test]
    fn apply_link_attrs_adds_nofollow() {
        let mut opts = ConversionOptions::default();
        opts.extras.nofollow = true;
        let doc = Document::new(&opts);
        let out = apply_link_attrs(&doc, r#"<a href="http://x">x</a>"#);
        assert!(out.contains(r#"rel="nofollow""#));
    }

    #[test]
    fn apply_link_attrs_adds_target_blank_and_merges_existing_rel() {
        let mut opts = ConversionOptions::default();
        opts.extras.target_blank_links = true;
        opts.extras.nofollow = true;
        let doc = Document::new(&opts);
        let out = apply_link_attrs(&doc, r#"<a href="http://x" rel="external">x</a>"#);
        assert!(out.contains("external"));
        assert!(out.contains("nofollow"));
        assert!(out.contains("noopener"));
        assert!(out.contains(r#"target="_blank""#));
    }
}
