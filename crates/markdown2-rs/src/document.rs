//! Per-conversion mutable state threaded through every pipeline stage
//! (SPEC_FULL.md "Document/Metadata/Footnotes/TOC").
//!
//! One [`Document`] is created per call to
//! [`crate::converter::Converter::convert`] and discarded afterward; the
//! [`crate::converter::Converter`] itself holds only the immutable
//! [`crate::options::ConversionOptions`] and the resolved
//! [`crate::extension::Registry`], so a single converter can run many
//! conversions concurrently.

use std::collections::HashMap;

use crate::hash::HashRegistry;
use crate::options::ConversionOptions;

/// A parsed `[id]: url "title"` link or image reference definition.
#[derive(Debug, Clone)]
pub struct LinkDef {
    pub url: String,
    pub title: Option<String>,
}

/// A single table-of-contents entry.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "metadata", derive(serde::Serialize))]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Mutable state for one conversion.
pub struct Document<'a> {
    pub options: &'a ConversionOptions,
    pub hashes: HashRegistry,
    pub link_defs: HashMap<String, LinkDef>,
    pub footnote_defs: HashMap<String, String>,
    pub footnote_order: Vec<String>,
    pub header_slugs: HashMap<String, usize>,
    pub toc: Vec<TocEntry>,
    pub metadata: HashMap<String, String>,
    pub used_extras: std::collections::HashSet<String>,
}

impl<'a> Document<'a> {
    pub fn new(options: &'a ConversionOptions) -> Self {
        Self {
            options,
            hashes: HashRegistry::new(),
            link_defs: HashMap::new(),
            footnote_defs: HashMap::new(),
            footnote_order: Vec::new(),
            header_slugs: HashMap::new(),
            toc: Vec::new(),
            metadata: HashMap::new(),
            used_extras: std::collections::HashSet::new(),
        }
    }

    /// Register a reference to footnote `id`, returning its 1-based
    /// reference order, assigning the next order the first time it's seen
    /// (spec §4.6: footnotes are renumbered in reference order, not
    /// definition order).
    pub fn footnote_ref_order(&mut self, id: &str) -> usize {
        if let Some(pos) = self.footnote_order.iter().position(|x| x == id) {
            return pos + 1;
        }
        self.footnote_order.push(id.to_string());
        self.footnote_order.len()
    }

    /// Generate a unique header slug, tracking collisions with a `-N`
    /// suffix (spec §4.9).
    pub fn unique_slug(&mut self, base: &str) -> String {
        let count = self.header_slugs.entry(base.to_string()).or_insert(0);
        let slug = if *count == 0 { base.to_string() } else { format!("{base}-{count}") };
        *count += 1;
        slug
    }
}
