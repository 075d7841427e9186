//! User-supplied auto-link patterns (`link-patterns` extra, spec §4.10).
//!
//! Each configured [`crate::options::LinkPattern`] is matched against the
//! block's plain text and replaced with a hashed `<a>` tag before the span
//! gamut runs, so the generated anchor's text is protected from further
//! emphasis/link processing.

use crate::document::Document;
use crate::extension::{Extension, Order, Registry, Stage};
use crate::links::xml_escape;
use crate::options::LinkPatternReplacement;

pub struct LinkPatterns;

impl Extension for LinkPatterns {
    fn name(&self) -> &'static str {
        "link-patterns"
    }

    fn order(&self) -> Order {
        Order::BeforeStage(Stage::SpanGamut)
    }

    fn test(&self, doc: &Document) -> bool {
        doc.options.extras.link_patterns && !doc.options.link_patterns.is_empty()
    }

    fn run(&self, doc: &mut Document, _registry: &Registry, text: String) -> String {
        let patterns = doc.options.link_patterns.clone();
        let mut out = text;
        for pattern in &patterns {
            out = pattern
                .regex
                .replace_all(&out, |caps: &regex::Captures| {
                    let matched = &caps[0];
                    let href = match &pattern.replacement {
                        LinkPatternReplacement::Template(tpl) => {
                            let mut expanded = String::new();
                            caps.expand(tpl, &mut expanded);
                            expanded
                        }
                        LinkPatternReplacement::Callback(f) => f(matched),
                    };
                    let key = doc.hashes.store(&format!(
                        "<a href=\"{}\">{}</a>",
                        xml_escape(&href),
                        xml_escape(matched)
                    ));
                    key
                })
                .into_owned();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ConversionOptions, LinkPattern, LinkPatternReplacement};
    use regex::Regex;

    #[test]
    fn replaces_issue_references() {
        let mut opts = ConversionOptions::default();
        opts.extras.link_patterns = true;
        opts.link_patterns.push(LinkPattern {
            regex: Regex::new(r"#(\d+)").unwrap(),
            replacement: LinkPatternReplacement::Template("https://issues/$1".to_string()),
        });
        let mut doc = Document::new(&opts);
        let registry = Registry::build(Vec::new()).unwrap();
        let out = LinkPatterns.run(&mut doc, &registry, "see #42 please".to_string());
        let restored = doc.hashes.unhash(&out);
        assert!(restored.contains("href=\"https://issues/42\""));
    }
}
