//! The public conversion entry point (spec §1, §6).
//!
//! A [`Converter`] owns a fixed [`ConversionOptions`] and its resolved
//! extension [`Registry`]; building the registry is the only fallible part
//! of setup (unresolvable `before`/`after` ordering), so it happens once in
//! [`Converter::new`] rather than on every call to [`Converter::convert`].

use std::collections::HashMap;

use crate::document::Document;
use crate::error::Result;
use crate::extension::Registry;
use crate::headers::render_toc;
use crate::options::ConversionOptions;

/// The result of converting one document: the rendered HTML plus whatever
/// side-channel data the active extras collected.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "metadata", derive(serde::Serialize))]
pub struct ConversionResult {
    /// Rendered HTML.
    pub html: String,
    /// `key: value` pairs extracted from a leading metadata block, if the
    /// `metadata` extra was active.
    pub metadata: HashMap<String, String>,
    /// Rendered table-of-contents HTML, if the `toc` extra was active and
    /// any headers were found.
    pub toc_html: Option<String>,
}

/// A reusable Markdown-to-HTML converter.
pub struct Converter {
    options: ConversionOptions,
    registry: Registry,
}

impl Converter {
    /// Build a converter, resolving the extension execution plan once.
    pub fn new(options: ConversionOptions) -> Result<Self> {
        let registry = Registry::build(crate::extras::build(&options))?;
        Ok(Self { options, registry })
    }

    /// Convert `source` Markdown to HTML.
    pub fn convert(&self, source: &str) -> ConversionResult {
        let effective;
        let options = if self.options.use_file_vars {
            let normalized = crate::preprocess::normalize_newlines(source);
            let vars = crate::preprocess::extract_file_vars(&normalized);
            effective = self.options.with_file_vars(&vars);
            &effective
        } else {
            &self.options
        };

        let mut doc = Document::new(options);
        let html = crate::pipeline::run(&mut doc, &self.registry, source);
        let toc_html = if options.extras.toc.is_some() && !doc.toc.is_empty() {
            Some(render_toc(&doc.toc))
        } else {
            None
        };

        ConversionResult { html, metadata: doc.metadata, toc_html }
    }
}

/// Convert `source` with default options. Convenience wrapper around
/// [`Converter::new`] + [`Converter::convert`] for one-shot use.
pub fn convert(source: &str, options: Option<ConversionOptions>) -> Result<String> {
    let converter = Converter::new(options.unwrap_or_default())?;
    Ok(converter.convert(source).html)
}
