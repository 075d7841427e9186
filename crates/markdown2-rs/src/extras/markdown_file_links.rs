//! Rewrite `.md`/`.markdown` link targets to `.html` (`markdown-file-links`
//! extra, SPEC_FULL.md §6/§11).
//!
//! By the time this runs (after `SPAN_GAMUT`) every link, whether written as
//! `[text](url)` or `[text][id]` against a definition in `link_defs.rs`, has
//! already been rendered to an `<tag href="...">` anchor with no trace of
//! which syntax produced it — so `inline`/`reference` can't be told apart
//! from rendered HTML the way the reference implementation's separate
//! `LinkProcessor.test`/`run` hooks can. This pass honors either flag as "an
//! anchor should be rewritten"; `options.link_defs` is handled earlier, in
//! `link_defs.rs`, where reference-style targets are still addressable by id.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::extension::{Extension, Order, Registry, Stage};

pub struct MarkdownFileLinks;

impl Extension for MarkdownFileLinks {
    fn name(&self) -> &'static str {
        "markdown-file-links"
    }

    fn order(&self) -> Order {
        Order::AfterStage(Stage::SpanGamut)
    }

    fn test(&self, doc: &Document) -> bool {
        doc.options.extras.markdown_file_links.is_some()
    }

    fn run(&self, doc: &mut Document, _registry: &Registry, text: String) -> String {
        let opts = doc.options.extras.markdown_file_links.clone().unwrap_or_default();
        if !opts.inline && !opts.reference {
            return text;
        }
        href_re(&opts.tags)
            .replace_all(&text, |caps: &regex::Captures| {
                let href = &caps[2];
                let rewritten = rewrite_target(href);
                format!("{}{rewritten}{}", &caps[1], &caps[3])
            })
            .into_owned()
    }
}

fn href_re(tags: &[String]) -> Regex {
    let alternation = tags.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r#"(?i)(<(?:{alternation})\s[^>]*\bhref=")([^"]+)(")"#)).unwrap_or_else(|_| FALLBACK_HREF_RE.clone())
}

static FALLBACK_HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)(<a\s[^>]*\bhref=")([^"]+)(")"#).unwrap());

fn rewrite_target(href: &str) -> String {
    if let Some(base) = href.strip_suffix(".markdown") {
        return format!("{base}.html");
    }
    if let Some(base) = href.strip_suffix(".md") {
        return format!("{base}.html");
    }
    href.to_string()
}
