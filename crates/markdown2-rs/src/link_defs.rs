//! The link definition table: the `LINK_DEFS` stage (spec §4.3, §4.4;
//! SPEC_FULL.md C6).
//!
//! Strips `[id]: url "title"` and `[^id]: text` lines out of the document
//! body and records them on the [`Document`] so later stages (`links.rs`,
//! `footnotes.rs`) can resolve references against them. Definitions are
//! case-insensitively keyed, matching the reference implementation.

use crate::document::{Document, LinkDef};
use crate::regexes::{FOOTNOTE_DEF_RE, LINK_DEF_RE};

/// Strip link and footnote definitions from `text`, storing them on `doc`.
pub fn strip(doc: &mut Document, text: &str) -> String {
    let text = strip_link_defs(doc, text);
    rewrite_markdown_file_link_defs(doc);
    if doc.options.extras.footnotes { strip_footnote_defs(doc, &text) } else { text }
}

fn strip_link_defs(doc: &mut Document, text: &str) -> String {
    LINK_DEF_RE
        .replace_all(text, |caps: &regex::Captures| {
            let id = caps["id"].trim().to_lowercase();
            let url = caps["url"].to_string();
            let title = caps.name("title").map(|m| m.as_str().to_string());
            doc.link_defs.insert(id, LinkDef { url, title });
            ""
        })
        .into_owned()
}

/// Rewrite `.md`/`.markdown` targets in stored link definitions to `.html`,
/// when the `markdown-file-links` extra is active with its `link_defs` flag
/// set (default `true`). Woven directly into this stage, the same way the
/// reference implementation's `MarkdownFileLinks.run` rewrites `self.md.urls`
/// immediately after `LINK_DEFS` rather than at `run()`-time over rendered
/// text, since by the time anchors are rendered a reference link's original
/// `.md` target is no longer visible to a post-render pass.
fn rewrite_markdown_file_link_defs(doc: &mut Document) {
    let Some(opts) = doc.options.extras.markdown_file_links.clone() else { return };
    if !opts.link_defs {
        return;
    }
    for def in doc.link_defs.values_mut() {
        if let Some(base) = def.url.strip_suffix(".markdown") {
            def.url = format!("{base}.html");
        } else if let Some(base) = def.url.strip_suffix(".md") {
            def.url = format!("{base}.html");
        }
    }
}

fn strip_footnote_defs(doc: &mut Document, text: &str) -> String {
    FOOTNOTE_DEF_RE
        .replace_all(text, |caps: &regex::Captures| {
            let id = caps["id"].trim().to_lowercase();
            let raw = caps["text"].to_string();
            let dedented = crate::util::outdent(&raw, doc.options.tab_width);
            doc.footnote_defs.insert(id, dedented.trim().to_string());
            ""
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn strips_link_definition_and_records_it() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let out = strip(&mut doc, "[ex]: http://example.com \"Title\"\n\nbody");
        assert!(!out.contains("[ex]:"));
        let def = doc.link_defs.get("ex").unwrap();
        assert_eq!(def.url, "http://example.com");
        assert_eq!(def.title.as_deref(), Some("Title"));
    }

    #[test]
    fn rewrites_md_link_def_target_when_markdown_file_links_enabled() {
        let mut opts = ConversionOptions::default();
        opts.extras.markdown_file_links = Some(crate::options::MarkdownFileLinksOptions::default());
        let mut doc = Document::new(&opts);
        strip(&mut doc, "[ex]: readme.md\n\nbody");
        assert_eq!(doc.link_defs.get("ex").unwrap().url, "readme.html");
    }

    #[test]
    fn leaves_link_def_target_alone_when_link_defs_flag_is_off() {
        let mut opts = ConversionOptions::default();
        opts.extras.markdown_file_links =
            Some(crate::options::MarkdownFileLinksOptions { link_defs: false, ..Default::default() });
        let mut doc = Document::new(&opts);
        strip(&mut doc, "[ex]: readme.md\n\nbody");
        assert_eq!(doc.link_defs.get("ex").unwrap().url, "readme.md");
    }

    #[test]
    fn strips_footnote_definition_when_enabled() {
        let mut opts = ConversionOptions::default();
        opts.extras.footnotes = true;
        let mut doc = Document::new(&opts);
        let out = strip(&mut doc, "text[^1]\n\n[^1]: note body\n");
        assert!(!out.contains("[^1]: note"));
        assert_eq!(doc.footnote_defs.get("1").unwrap(), "note body");
    }
}
