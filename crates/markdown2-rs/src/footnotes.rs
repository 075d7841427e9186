//! Footnote reference renumbering and rendering (spec §4.6; SPEC_FULL.md
//! "Document/Metadata/Footnotes/TOC").
//!
//! Footnote definitions are stripped into [`Document::footnote_defs`] during
//! `LINK_DEFS` (`link_defs.rs`). This module replaces each `[^id]`
//! reference with a numbered `<sup>` link in *reference order* (not
//! definition order — two documents that define footnotes in a different
//! order than they're cited still number 1, 2, 3... by citation).
//! [`render_list`] is called from `postprocess.rs` once `BLOCK_GAMUT` has
//! finished, since footnote bodies are themselves run through the block
//! gamut.

use crate::document::Document;
use crate::extension::Registry;
use crate::regexes::FOOTNOTE_REF_RE;

/// Replace every `[^id]` citation with a numbered back-reference link.
pub fn replace_refs(doc: &mut Document, text: &str) -> String {
    if !doc.options.extras.footnotes {
        return text.to_string();
    }
    FOOTNOTE_REF_RE
        .replace_all(text, |caps: &regex::Captures| {
            let id = caps[1].trim().to_lowercase();
            if !doc.footnote_defs.contains_key(&id) {
                return caps[0].to_string();
            }
            let n = doc.footnote_ref_order(&id);
            format!(
                "<sup id=\"fnref-{n}\"><a href=\"#fn-{n}\" rel=\"footnote\">{n}</a></sup>"
            )
        })
        .into_owned()
}

/// Render the collected footnotes (in reference order) as an `<ol>`, each
/// item's body run through the block gamut and followed by a back-link.
pub fn render_list(doc: &mut Document, registry: &Registry) -> String {
    if doc.footnote_order.is_empty() {
        return String::new();
    }
    let symbol = doc.options.footnote_return_symbol.clone().unwrap_or_else(|| "\u{21a9}".to_string());
    let ids: Vec<String> = doc.footnote_order.clone();
    let mut out = String::from("<div class=\"footnotes\">\n<hr/>\n<ol>\n");
    for (i, id) in ids.iter().enumerate() {
        let n = i + 1;
        let body = doc.footnote_defs.get(id).cloned().unwrap_or_default();
        let rendered = crate::block::block_gamut(doc, registry, &body);
        let rendered = rendered.trim_end();
        let backlink = format!(" <a href=\"#fnref-{n}\" class=\"footnote-backref\">{symbol}</a>");
        let with_backlink = if let Some(stripped) = rendered.strip_suffix("</p>") {
            format!("{stripped}{backlink}</p>")
        } else {
            format!("{rendered}{backlink}")
        };
        out.push_str(&format!("<li id=\"fn-{n}\">\n{with_backlink}\n</li>\n"));
    }
    out.push_str("</ol>\n</div>\n");
    out
}
