//! Fenced ```` ``` ````/`~~~` code blocks (`fenced-code-blocks` extra, spec
//! §4.8), with an opaque `wavedrom` diagram hook layered on top (spec §6).
//!
//! The reference implementation invokes this extra at two different points
//! depending on `safe_mode` (`PREPROCESS` when raw HTML hashing would
//! otherwise swallow embedded HTML in a fence, `LINK_DEFS` once it's
//! active). This port always runs it immediately before `BLOCK_GAMUT`: by
//! that point link/footnote definitions are already stripped and raw HTML
//! blocks are already hashed out, so a fence can't be accidentally captured
//! by either earlier stage regardless of `safe_mode`, which was the
//! original's actual concern.

use crate::document::Document;
use crate::extension::{Extension, Order, Registry, Stage};
use crate::html_shield::escape_code_text;
use crate::regexes::FENCED_CODE_OPEN_RE;
use crate::util::outdent;

pub struct FencedCodeBlocks;

impl Extension for FencedCodeBlocks {
    fn name(&self) -> &'static str {
        "fenced-code-blocks"
    }

    fn order(&self) -> Order {
        Order::BeforeStage(Stage::BlockGamut)
    }

    fn test(&self, doc: &Document) -> bool {
        doc.options.extras.fenced_code_blocks.is_some()
    }

    fn run(&self, doc: &mut Document, _registry: &Registry, text: String) -> String {
        replace_fences(doc, &text)
    }
}

fn replace_fences(doc: &mut Document, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(open) = FENCED_CODE_OPEN_RE.find(rest) else {
            out.push_str(rest);
            break;
        };
        let line_start = rest[..open.start()].rfind('\n').map(|p| p + 1).unwrap_or(0);
        if rest[line_start..open.start()].trim().is_empty() {
            let caps = FENCED_CODE_OPEN_RE.captures(&rest[line_start..]).unwrap();
            let fence = caps["fence"].to_string();
            let lang = caps["lang"].trim().to_string();
            let after_open = line_start + caps[0].len();
            let body_start = rest[after_open..].find('\n').map(|p| after_open + p + 1).unwrap_or(rest.len());
            if let Some((code, consumed_end)) = find_closing_fence(&rest[body_start..], &fence) {
                out.push_str(&rest[..line_start]);
                out.push_str(&render_block(doc, &outdent(code.trim_end_matches('\n'), doc.options.tab_width), &lang));
                rest = &rest[body_start + consumed_end..];
                continue;
            }
        }
        out.push_str(&rest[..open.end()]);
        rest = &rest[open.end()..];
    }
    out
}

fn find_closing_fence<'a>(text: &'a str, fence: &str) -> Option<(&'a str, usize)> {
    let fence_char = fence.as_bytes()[0];
    let min_len = fence.len();
    let mut pos = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches('\n').trim();
        if trimmed.bytes().all(|b| b == fence_char) && trimmed.len() >= min_len {
            return Some((&text[..pos], pos + line.len()));
        }
        pos += line.len();
    }
    None
}

fn render_block(doc: &mut Document, code: &str, lang: &str) -> String {
    if lang.eq_ignore_ascii_case("wavedrom") {
        if let Some(opts) = &doc.options.extras.wavedrom {
            let html = render_wavedrom(code, opts.prefer_embed_svg);
            let key = doc.hashes.store(&html);
            return format!("\n\n{key}\n\n");
        }
    }

    let fenced = doc.options.extras.fenced_code_blocks.clone().unwrap_or_default();
    let html = if let Some(highlighter) = &fenced.highlighter {
        highlighter(code, lang).unwrap_or_else(|| default_pre(code, lang, fenced.highlightjs_lang))
    } else {
        default_pre(code, lang, fenced.highlightjs_lang)
    };
    let key = doc.hashes.store(&html);
    format!("\n\n{key}\n\n")
}

fn default_pre(code: &str, lang: &str, highlightjs_lang: bool) -> String {
    let escaped = escape_code_text(code);
    let class_attr = if highlightjs_lang && !lang.is_empty() { format!(" class=\"language-{lang}\"") } else { String::new() };
    format!("<pre><code{class_attr}>{escaped}\n</code></pre>\n")
}

/// Wavedrom is an opaque external diagram renderer (spec §1); this only
/// emits the container markup a real renderer would post-process or embed
/// into, never timing-diagram rendering logic of its own.
fn render_wavedrom(code: &str, prefer_embed_svg: bool) -> String {
    let escaped = escape_code_text(code);
    if prefer_embed_svg {
        format!("<div class=\"wavedrom\" data-wavedrom-embed=\"svg\">{escaped}</div>\n")
    } else {
        format!("<script type=\"wavedrom\">{escaped}</script>\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ConversionOptions, FencedCodeBlockOptions};

    #[test]
    fn renders_plain_fence_as_pre_code() {
        let mut opts = ConversionOptions::default();
        opts.extras.fenced_code_blocks = Some(FencedCodeBlockOptions::default());
        let mut doc = Document::new(&opts);
        let out = replace_fences(&mut doc, "```rust\nlet x = 1;\n```\n");
        let restored = doc.hashes.unhash(&out);
        assert!(restored.contains("<pre><code>let x = 1;"));
    }

    #[test]
    fn highlightjs_lang_adds_class() {
        let mut opts = ConversionOptions::default();
        opts.extras.fenced_code_blocks = Some(FencedCodeBlockOptions { highlightjs_lang: true, highlighter: None });
        let mut doc = Document::new(&opts);
        let out = replace_fences(&mut doc, "```rust\ncode\n```\n");
        let restored = doc.hashes.unhash(&out);
        assert!(restored.contains("class=\"language-rust\""));
    }
}
