//! Built-in pluggable Extensions (spec §4.10; SPEC_FULL.md C9).
//!
//! Only extensions whose effect is a genuinely separable pre/post pass
//! around a pipeline stage are modeled as [`crate::extension::Extension`]
//! objects here. `breaks` and `middle-word-em` are instead read directly as
//! flags inside `span.rs`'s existing emphasis/line-break steps — their
//! effect has no boundary of its own to attach to, it changes how an
//! existing step behaves. Footnotes, header-ids, toc, and html-classes are
//! likewise woven into the core stages (`headers.rs`, `footnotes.rs`)
//! rather than registered here, matching how the reference implementation
//! treats them (they are not `Extra` subclasses there either).

mod fenced_code_blocks;
mod link_patterns;
mod markdown_file_links;
mod smarty_pants;
mod strike;
mod tables;

use crate::extension::Extension;
use crate::options::ConversionOptions;

/// Build the list of active extensions for one converter, in no particular
/// order (the [`crate::extension::Registry`] sorts by declared position).
pub fn build(options: &ConversionOptions) -> Vec<Box<dyn Extension>> {
    let mut exts: Vec<Box<dyn Extension>> = Vec::new();
    if options.extras.tables {
        exts.push(Box::new(tables::Tables));
    }
    if options.extras.strike {
        exts.push(Box::new(strike::Strike));
    }
    if options.extras.smarty_pants {
        exts.push(Box::new(smarty_pants::SmartyPants));
    }
    if options.extras.link_patterns {
        exts.push(Box::new(link_patterns::LinkPatterns));
    }
    if options.extras.fenced_code_blocks.is_some() {
        exts.push(Box::new(fenced_code_blocks::FencedCodeBlocks));
    }
    if options.extras.markdown_file_links.is_some() {
        exts.push(Box::new(markdown_file_links::MarkdownFileLinks));
    }
    exts
}
