//! The pipeline driver (spec §4.3, §4.4; SPEC_FULL.md C7).
//!
//! Runs the seven fixed [`crate::extension::Stage`]s in order over one
//! [`Document`], giving the [`crate::extension::Registry`] a chance to run
//! registered extensions immediately before/after each stage.

use crate::document::Document;
use crate::extension::{Registry, Stage};

/// Run the full pipeline over `source`, returning the rendered HTML.
pub fn run(doc: &mut Document, registry: &Registry, source: &str) -> String {
    let mut text = source.to_string();

    text = registry.run_pre(Stage::Preprocess, doc, text);
    text = crate::preprocess::normalize_newlines(&text);
    text = crate::preprocess::detab(doc, &text);
    text = crate::preprocess::strip_whitespace_only_lines(&text);
    let vars = if doc.options.use_file_vars { crate::preprocess::extract_file_vars(&text) } else { Default::default() };
    let _ = vars; // file vars are merged into effective options by the caller before Document is built
    text = crate::preprocess::extract_metadata(doc, &text).to_string();
    text = registry.run_post(Stage::Preprocess, doc, text);

    text = registry.run_pre(Stage::HashHtml, doc, text);
    text = crate::html_shield::hash_blocks(doc, &text);
    text = registry.run_post(Stage::HashHtml, doc, text);

    text = registry.run_pre(Stage::LinkDefs, doc, text);
    text = crate::link_defs::strip(doc, &text);
    text = registry.run_post(Stage::LinkDefs, doc, text);

    text = registry.run_pre(Stage::BlockGamut, doc, text);
    text = crate::footnotes::replace_refs(doc, &text);
    text = crate::block::block_gamut(doc, registry, &text);
    text = registry.run_post(Stage::BlockGamut, doc, text);

    text = registry.run_pre(Stage::Postprocess, doc, text);
    text = crate::postprocess::run(doc, registry, &text);
    text = registry.run_post(Stage::Postprocess, doc, text);

    text = registry.run_pre(Stage::UnhashHtml, doc, text);
    text = doc.hashes.unhash(&text);
    text = registry.run_post(Stage::UnhashHtml, doc, text);
    format!("{}\n", crate::postprocess::apply_link_attrs(doc, &text))
}
