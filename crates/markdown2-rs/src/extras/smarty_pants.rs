//! Smart typography: curly quotes, en/em dashes, ellipsis (`smarty-pants`
//! extra, spec §4.10).
//!
//! `test()` is a cheap substring scan so documents containing none of
//! `'"--...` never pay for the heavier regex chain in `run()`, matching the
//! reference implementation's own perf guard for this extra.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::extension::{Extension, Order, Registry, Stage};

static DOUBLE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(^|[\s(\[{])""#).unwrap());
static SINGLE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[\s(\[{])'").unwrap());
static EM_DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"---").unwrap());
static EN_DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"--").unwrap());
static ELLIPSIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.").unwrap());

pub struct SmartyPants;

impl Extension for SmartyPants {
    fn name(&self) -> &'static str {
        "smarty-pants"
    }

    fn order(&self) -> Order {
        Order::AfterStage(Stage::SpanGamut)
    }

    fn test(&self, doc: &Document) -> bool {
        doc.options.extras.smarty_pants
    }

    fn run(&self, _doc: &mut Document, _registry: &Registry, text: String) -> String {
        if !text.contains(['\'', '"', '-']) && !text.contains("...") {
            return text;
        }
        let text = EM_DASH_RE.replace_all(&text, "\u{2014}").into_owned();
        let text = EN_DASH_RE.replace_all(&text, "\u{2013}").into_owned();
        let text = ELLIPSIS_RE.replace_all(&text, "\u{2026}").into_owned();
        let text = DOUBLE_OPEN_RE.replace_all(&text, "$1\u{201c}").into_owned();
        let text = text.replace('"', "\u{201d}");
        let text = SINGLE_OPEN_RE.replace_all(&text, "$1\u{2018}").into_owned();
        text.replace('\'', "\u{2019}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn converts_dashes_and_ellipsis() {
        let mut opts = ConversionOptions::default();
        opts.extras.smarty_pants = true;
        let mut doc = Document::new(&opts);
        let registry = Registry::build(Vec::new()).unwrap();
        let out = SmartyPants.run(&mut doc, &registry, "wait--what---really...".to_string());
        assert!(out.contains('\u{2013}'));
        assert!(out.contains('\u{2014}'));
        assert!(out.contains('\u{2026}'));
    }

    #[test]
    fn converts_quotes() {
        let mut opts = ConversionOptions::default();
        opts.extras.smarty_pants = true;
        let mut doc = Document::new(&opts);
        let registry = Registry::build(Vec::new()).unwrap();
        let out = SmartyPants.run(&mut doc, &registry, "\"hi\" and 'bye'".to_string());
        assert!(out.contains('\u{201c}'));
        assert!(out.contains('\u{201d}'));
    }
}
