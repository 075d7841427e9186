//! # markdown2
//!
//! A Markdown-to-HTML converter with a pluggable extension pipeline,
//! modeled on python-markdown2's `Stage`/`Extra`/hash-shield design.
//!
//! Built-in extras (tables, strikethrough, SmartyPants, footnotes, and more)
//! are configured through [`ConversionOptions`] and run as part of a fixed
//! seven-stage pipeline; custom [`Extension`](extension::Extension)
//! implementations can be registered alongside them.

pub mod block;
pub mod blockquote;
pub mod code;
pub mod converter;
pub mod document;
pub mod error;
pub mod extension;
pub mod extras;
pub mod footnotes;
pub mod hash;
pub mod headers;
pub mod html_shield;
pub mod link_defs;
pub mod links;
pub mod lists;
pub mod options;
pub mod paragraphs;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod regexes;
pub mod span;
pub mod util;

pub use converter::{convert, ConversionResult, Converter};
pub use error::{ConversionError, Result};
pub use options::{ConversionOptions, Extras, SafeMode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_convert_function_round_trips_basic_markdown() {
        let html = convert("# Title\n\nSome *text*.\n", None).unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn converter_can_be_reused_with_extras_enabled() {
        let mut opts = ConversionOptions::default();
        opts.extras.strike = true;
        let converter = Converter::new(opts).unwrap();
        let out = converter.convert("~~gone~~").html;
        assert!(out.contains("<s>gone</s>"));
    }
}
