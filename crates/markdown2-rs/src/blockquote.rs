//! Block quote processing (spec §4.3 BLOCK_QUOTES).
//!
//! A run of consecutive `>`-prefixed lines becomes a `<blockquote>` whose
//! dedented content is recursively run back through the block gamut, so
//! nested lists, headers, and further block quotes inside a quote work the
//! same as at the top level.

use crate::document::Document;
use crate::extension::Registry;
use crate::regexes::BLOCKQUOTE_RE;

pub fn run(doc: &mut Document, registry: &Registry, text: &str) -> String {
    BLOCKQUOTE_RE
        .replace_all(text, |caps: &regex::Captures| {
            let raw = &caps[0];
            let dedented: String = raw
                .lines()
                .map(|line| line.trim_start().strip_prefix('>').map(|rest| rest.strip_prefix(' ').unwrap_or(rest)).unwrap_or(line))
                .collect::<Vec<_>>()
                .join("\n");
            let inner = crate::block::block_gamut(doc, registry, &dedented);
            let html = format!("<blockquote>\n{}\n</blockquote>\n\n", inner.trim());
            let key = doc.hashes.store(&html);
            format!("\n\n{key}\n\n")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn wraps_quoted_lines() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let registry = Registry::build(Vec::new()).unwrap();
        let out = run(&mut doc, &registry, "> line one\n> line two\n");
        let restored = doc.hashes.unhash(&out);
        assert!(restored.contains("<blockquote>"));
        assert!(restored.contains("line one"));
    }
}
