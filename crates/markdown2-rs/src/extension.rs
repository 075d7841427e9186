//! The Extension Registry and execution-plan builder (spec §4.1, §4.2;
//! SPEC_FULL.md C8).
//!
//! Each [`Stage`] of the fixed pipeline (SPEC_FULL.md C7, see
//! [`crate::pipeline`]) runs its own processing and then gives every
//! registered [`Extension`] a chance to run immediately before or after it,
//! according to the extension's declared [`Order`]. The plan is computed
//! once per converter (not per document) by inserting each extension
//! directly at a stage boundary (`Order::BeforeStage`/`Order::AfterStage`)
//! or relative to another extension's already-resolved position
//! (`Order::BeforeExt`/`Order::AfterExt`).

use crate::document::Document;
use crate::error::ConversionError;

/// The seven fixed pipeline stages (spec §4.3/§4.4), in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Preprocess,
    HashHtml,
    LinkDefs,
    BlockGamut,
    SpanGamut,
    Postprocess,
    UnhashHtml,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Stage; 7] = [
        Stage::Preprocess,
        Stage::HashHtml,
        Stage::LinkDefs,
        Stage::BlockGamut,
        Stage::SpanGamut,
        Stage::Postprocess,
        Stage::UnhashHtml,
    ];

    /// Numeric position used as an extension's `order` scalar when it runs
    /// exactly at this stage's boundary.
    pub fn ordinal(self) -> f64 {
        Stage::ALL.iter().position(|s| *s == self).unwrap() as f64
    }
}

/// Where an extension wants to run relative to the fixed pipeline or to
/// another extension.
#[derive(Clone, Copy)]
pub enum Order {
    /// Run immediately before the named stage starts.
    BeforeStage(Stage),
    /// Run immediately after the named stage finishes.
    AfterStage(Stage),
    /// Run immediately before another extension, wherever it ends up.
    BeforeExt(&'static str),
    /// Run immediately after another extension, wherever it ends up.
    AfterExt(&'static str),
}

/// A pluggable processing unit (spec §4.1). Built-in extensions
/// (`extras/*.rs`) implement this.
pub trait Extension: Send + Sync {
    /// Stable identifier, used in `extras` option maps and ordering
    /// references.
    fn name(&self) -> &'static str;

    /// Declared position in the pipeline.
    fn order(&self) -> Order;

    /// Cheap predicate: does this extension need to run at all for the
    /// current document? Checked before every `run` call so no-op
    /// extensions don't pay a scan cost (spec §4.1).
    fn test(&self, doc: &Document) -> bool;

    /// Transform `text`, returning the replacement. `registry` is the same
    /// registry this extension is registered in, so an extension whose work
    /// includes running inline processing (e.g. `tables`) can dispatch
    /// `Stage::SpanGamut` hooks the same way `span_gamut` itself does,
    /// rather than bypassing them.
    fn run(&self, doc: &mut Document, registry: &Registry, text: String) -> String;
}

struct Entry {
    stage: Stage,
    is_pre: bool,
    order: f64,
    ext: Box<dyn Extension>,
}

/// Computes and holds the execution plan for a set of extensions.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Build a plan from the given extensions, resolving `BeforeExt`/
    /// `AfterExt` references against each other. Returns
    /// `Err(ConversionError::OrderingCycle)` if an extension's relative
    /// reference names itself or an extension that is never resolved
    /// (refers to nothing present, or only to other unresolved extensions).
    pub fn build(extensions: Vec<Box<dyn Extension>>) -> crate::error::Result<Self> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut remaining: Vec<Box<dyn Extension>> = Vec::new();

        for ext in extensions {
            match ext.order() {
                Order::BeforeStage(stage) => {
                    let order = stage.ordinal() - 0.5;
                    entries.push(Entry { stage, is_pre: true, order, ext });
                }
                Order::AfterStage(stage) => {
                    let order = stage.ordinal() + 0.5;
                    entries.push(Entry { stage, is_pre: false, order, ext });
                }
                Order::BeforeExt(target) | Order::AfterExt(target) => {
                    if target == ext.name() {
                        return Err(ConversionError::OrderingCycle(ext.name().to_string()));
                    }
                    remaining.push(ext);
                }
            }
        }

        while !remaining.is_empty() {
            let mut next_remaining = Vec::new();
            let mut progressed = false;
            for ext in remaining {
                let target = match ext.order() {
                    Order::BeforeExt(n) | Order::AfterExt(n) => n,
                    Order::BeforeStage(_) | Order::AfterStage(_) => unreachable!(),
                };
                match entries.iter().find(|e| e.ext.name() == target) {
                    Some(found) => {
                        let is_before = matches!(ext.order(), Order::BeforeExt(_));
                        let order = if is_before { found.order - 1e-3 } else { found.order + 1e-3 };
                        let stage = found.stage;
                        let is_pre = found.is_pre;
                        entries.push(Entry { stage, is_pre, order, ext });
                        progressed = true;
                    }
                    None => next_remaining.push(ext),
                }
            }
            if !progressed {
                let names: Vec<_> = next_remaining.iter().map(|e| e.name()).collect();
                return Err(ConversionError::OrderingCycle(names.join(", ")));
            }
            remaining = next_remaining;
        }

        entries.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap());
        Ok(Self { entries })
    }

    /// Run every extension scheduled immediately before `stage` whose
    /// `test` passes.
    pub fn run_pre(&self, stage: Stage, doc: &mut Document, text: String) -> String {
        self.run_filtered(stage, true, doc, text)
    }

    /// Run every extension scheduled immediately after `stage` whose `test`
    /// passes.
    pub fn run_post(&self, stage: Stage, doc: &mut Document, text: String) -> String {
        self.run_filtered(stage, false, doc, text)
    }

    fn run_filtered(&self, stage: Stage, is_pre: bool, doc: &mut Document, mut text: String) -> String {
        for entry in self.entries.iter().filter(|e| e.stage == stage && e.is_pre == is_pre) {
            if entry.ext.test(doc) {
                doc.used_extras.insert(entry.ext.name().to_string());
                text = entry.ext.run(doc, self, text);
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    struct Shout;

    impl Extension for Shout {
        fn name(&self) -> &'static str {
            "shout"
        }
        fn order(&self) -> Order {
            Order::AfterStage(Stage::BlockGamut)
        }
        fn test(&self, _doc: &Document) -> bool {
            true
        }
        fn run(&self, _doc: &mut Document, _registry: &Registry, text: String) -> String {
            text.to_uppercase()
        }
    }

    #[test]
    fn runs_post_stage_extension_and_records_it_as_used() {
        let registry = Registry::build(vec![Box::new(Shout)]).unwrap();
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let out = registry.run_post(Stage::BlockGamut, &mut doc, "hi".to_string());
        assert_eq!(out, "HI");
        assert!(doc.used_extras.contains("shout"));
    }

    #[test]
    fn before_ext_resolves_relative_to_a_stage_attached_extension() {
        struct Whisper;
        impl Extension for Whisper {
            fn name(&self) -> &'static str {
                "whisper"
            }
            fn order(&self) -> Order {
                Order::BeforeExt("shout")
            }
            fn test(&self, _doc: &Document) -> bool {
                true
            }
            fn run(&self, _doc: &mut Document, _registry: &Registry, text: String) -> String {
                format!("({text})")
            }
        }

        let registry = Registry::build(vec![Box::new(Shout), Box::new(Whisper)]).unwrap();
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let out = registry.run_post(Stage::BlockGamut, &mut doc, "hi".to_string());
        assert_eq!(out, "(HI)");
    }

    #[test]
    fn self_referential_before_ext_is_an_ordering_cycle() {
        struct SelfRef;
        impl Extension for SelfRef {
            fn name(&self) -> &'static str {
                "self-ref"
            }
            fn order(&self) -> Order {
                Order::BeforeExt("self-ref")
            }
            fn test(&self, _doc: &Document) -> bool {
                true
            }
            fn run(&self, _doc: &mut Document, _registry: &Registry, text: String) -> String {
                text
            }
        }

        assert!(matches!(
            Registry::build(vec![Box::new(SelfRef)]),
            Err(ConversionError::OrderingCycle(_))
        ));
    }
}
