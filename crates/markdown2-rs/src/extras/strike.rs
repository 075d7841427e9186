//! `~~strike~~` → `<s>strike</s>` (`strike` extra, spec §4.10).

use crate::document::Document;
use crate::extension::{Extension, Order, Registry, Stage};
use crate::regexes::STRIKE_RE;

pub struct Strike;

impl Extension for Strike {
    fn name(&self) -> &'static str {
        "strike"
    }

    fn order(&self) -> Order {
        Order::BeforeStage(Stage::SpanGamut)
    }

    fn test(&self, doc: &Document) -> bool {
        doc.options.extras.strike
    }

    fn run(&self, _doc: &mut Document, _registry: &Registry, text: String) -> String {
        STRIKE_RE.replace_all(&text, "<s>$a</s>").into_owned()
    }
}
