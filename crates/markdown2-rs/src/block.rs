//! The block transformer: the `BLOCK_GAMUT` stage (spec §4.3, §4.4;
//! SPEC_FULL.md C4).
//!
//! Runs the fixed sub-steps in order — headers, horizontal rules, lists,
//! indented code blocks, block quotes, then whatever's left becomes
//! paragraphs. Headers render directly rather than hashing their own
//! output, so a second, non-`raw` `HASH_HTML` pass runs right before
//! `PARAGRAPHS` to re-hide whatever block-level markup the earlier
//! sub-steps just rendered (headers, a `tables`-extra block), so it isn't
//! mistaken for a plain text run and wrapped in another `<p>`. Called
//! recursively for list-item and block-quote content.

use crate::document::Document;
use crate::extension::Registry;
use crate::regexes::HR_RE;

pub fn block_gamut(doc: &mut Document, registry: &Registry, text: &str) -> String {
    let text = crate::headers::run(doc, registry, text);
    let text = run_hr(doc, &text);
    let text = crate::lists::run(doc, registry, &text);
    let text = crate::code::run(doc, &text);
    let text = crate::blockquote::run(doc, registry, &text);
    let text = crate::html_shield::hash_rendered_blocks(doc, &text);
    crate::paragraphs::run(doc, registry, &text)
}

fn run_hr(doc: &mut Document, text: &str) -> String {
    HR_RE
        .replace_all(text, |_: &regex::Captures| {
            let key = doc.hashes.store(&format!("<hr{}", doc.options.empty_element_suffix()));
            format!("\n\n{key}\n\n")
        })
        .into_owned()
}
