//! Configuration options for Markdown-to-HTML conversion.
//!
//! Spec §6 describes the API surface as a single `options` mapping with a
//! per-extension option schema. Rust favors static typing over a dynamic
//! `name -> value` map for the built-in extensions, so [`Extras`] is a typed
//! struct of `Option<...OptionsStruct>` / `bool` fields rather than a
//! `HashMap<String, serde_json::Value>` — each field *is* the schema entry
//! named in spec §6. A field present (`Some`/`true`) means the extension is
//! enabled; its payload (if any) is the extension's option value.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::error::ConversionError;

/// Tab width used for outdenting and detabbing (spec default: 4).
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Safe-mode setting controlling how raw HTML is handled (spec §4.5, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeMode {
    /// Entity-escape `&`, `<`, `>` in raw HTML rather than dropping it.
    Escape,
    /// Substitute a fixed placeholder string for raw HTML.
    Replace,
}

impl SafeMode {
    /// Parse the CLI/API string form (`"escape"` / `"replace"`).
    pub fn parse(s: &str) -> Result<Self, ConversionError> {
        match s {
            "escape" => Ok(Self::Escape),
            "replace" => Ok(Self::Replace),
            other => Err(ConversionError::UnknownSafeMode(other.to_string())),
        }
    }
}

/// A single user-supplied auto-link rule for the `link-patterns` extension.
#[derive(Clone)]
pub struct LinkPattern {
    /// Pattern matched against plain text runs.
    pub regex: Regex,
    /// Replacement applied to each match.
    pub replacement: LinkPatternReplacement,
}

/// Either a literal `$1`-style replacement template or a callback.
#[derive(Clone)]
pub enum LinkPatternReplacement {
    /// A capture-group template, e.g. `"https://issues/$1"`.
    Template(String),
    /// A callback invoked with the full match, returning the href.
    Callback(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

/// `toc` extension options.
#[derive(Debug, Clone)]
pub struct TocOptions {
    /// Maximum header level included in the table of contents.
    pub depth: u8,
    /// Prepend the rendered TOC to the document output.
    pub prepend: bool,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self { depth: 6, prepend: false }
    }
}

/// `header-ids` extension options.
#[derive(Debug, Clone, Default)]
pub struct HeaderIdsOptions {
    /// Process raw `<hN>` HTML blocks for ids/TOC entries in addition to
    /// Markdown headers.
    pub mixed: bool,
    /// Prefix prepended to every generated slug.
    pub prefix: Option<String>,
    /// Reset the per-slug collision counters for each `convert` call.
    pub reset_count: bool,
}

/// `breaks` extension options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreaksOptions {
    /// Treat every single newline inside a paragraph as a hard break.
    pub on_newline: bool,
    /// Treat a trailing backslash as a hard break.
    pub on_backslash: bool,
}

/// `middle-word-em` extension options.
#[derive(Debug, Clone, Copy)]
pub struct MiddleWordEmOptions {
    /// Whether `a*b*c`/`a_b_c` style mid-word emphasis is allowed.
    pub allowed: bool,
}

impl Default for MiddleWordEmOptions {
    fn default() -> Self {
        Self { allowed: true }
    }
}

/// `html-classes` extension options: a class string per emitted tag.
#[derive(Debug, Clone, Default)]
pub struct HtmlClassesOptions {
    /// Map from tag name (`img`, `table`, `thead`, `pre`, `code`, `ul`,
    /// `ol`, `p`) to the class attribute value to emit on it.
    pub classes: HashMap<String, String>,
}

/// Opaque formatter options for the `fenced-code-blocks` extension. The
/// actual highlighter is an external collaborator (spec §1); this struct
/// only carries the pass-through configuration.
#[derive(Clone, Default)]
pub struct FencedCodeBlockOptions {
    /// Emit `class="language-X"` on the `<code>` tag instead of routing
    /// through a highlighter callback.
    pub highlightjs_lang: bool,
    /// Highlighter callback: `(source, language-tag) -> HTML`. When absent,
    /// fenced blocks fall back to plain HTML-escaped `<pre><code>`.
    pub highlighter: Option<Arc<dyn Fn(&str, &str) -> Option<String> + Send + Sync>>,
}

impl std::fmt::Debug for FencedCodeBlockOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FencedCodeBlockOptions")
            .field("highlightjs_lang", &self.highlightjs_lang)
            .field("highlighter", &self.highlighter.is_some())
            .finish()
    }
}

/// `wavedrom` extension options.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavedromOptions {
    /// Prefer embedding rendered SVG directly rather than linking it.
    pub prefer_embed_svg: bool,
}

/// `markdown-file-links` extension options.
#[derive(Debug, Clone)]
pub struct MarkdownFileLinksOptions {
    /// Rewrite link-definition URLs too, not just inline links.
    pub link_defs: bool,
    /// Tags whose `.md`/`.markdown` targets get rewritten (default: `a`).
    pub tags: Vec<String>,
    /// Rewrite inline link targets.
    pub inline: bool,
    /// Rewrite reference link targets.
    pub reference: bool,
}

impl Default for MarkdownFileLinksOptions {
    fn default() -> Self {
        Self {
            link_defs: true,
            tags: vec!["a".to_string()],
            inline: true,
            reference: true,
        }
    }
}

/// The set of optional feature processors active for a conversion (spec §2
/// C9, §4.10, §6). A field's presence/`true` value is what spec §4.1 calls
/// an Extension being "active"; each built-in [`crate::extension::Extension`]
/// reads its own flag directly out of this struct in its `test` impl.
#[derive(Debug, Clone, Default)]
pub struct Extras {
    /// Footnote definitions and references (§4.6, §4.4, §8).
    pub footnotes: bool,
    /// Table of contents collection (§4.9).
    pub toc: Option<TocOptions>,
    /// Header slug/id generation (§4.9). Implied by `toc` if unset.
    pub header_ids: Option<HeaderIdsOptions>,
    /// Hard-break relaxation (§4.3 step 7).
    pub breaks: Option<BreaksOptions>,
    /// Mid-word emphasis control (§4.3 step 6).
    pub middle_word_em: Option<MiddleWordEmOptions>,
    /// Per-tag CSS classes (§4.7, §4.8, §4.9).
    pub html_classes: Option<HtmlClassesOptions>,
    /// User-supplied auto-link patterns (§4.10); actual patterns live in
    /// [`ConversionOptions::link_patterns`], this flag only gates the stage.
    pub link_patterns: bool,
    /// Fenced ```` ``` ````-delimited code blocks (§4.8).
    pub fenced_code_blocks: Option<FencedCodeBlockOptions>,
    /// Wavedrom diagram fences, layered on `fenced-code-blocks` (§6).
    pub wavedrom: Option<WavedromOptions>,
    /// Rewrite `.md` link targets to `.html` (§6).
    pub markdown_file_links: Option<MarkdownFileLinksOptions>,
    /// GFM-style pipe tables (§4.10).
    pub tables: bool,
    /// Smart typography (§4.10).
    pub smarty_pants: bool,
    /// `~~strike~~` → `<s>` (§4.10).
    pub strike: bool,
    /// `[ ]`/`[x]` task-list checkboxes (§4.7).
    pub task_list: bool,
    /// Metadata block extraction (§3, §6).
    pub metadata: bool,

    // -- supplemented, see SPEC_FULL.md §11 --
    /// Shift every header level down by N, capped at h6.
    pub demote_headers: Option<u8>,
    /// Add `rel="nofollow noopener" target="_blank"` to every `<a>`.
    pub target_blank_links: bool,
    /// Add `rel="nofollow"` to every `<a>`.
    pub nofollow: bool,
    /// Allow a list to start with no blank line after a paragraph.
    pub cuddled_lists: bool,
    /// Require at least one space after `#` in ATX headers.
    pub tag_friendly: bool,
}

/// Main conversion options (spec §6).
#[derive(Clone)]
pub struct ConversionOptions {
    /// Emit `>` instead of ` />` for void elements.
    pub html4tags: bool,
    /// Tab width used for outdenting/detabbing.
    pub tab_width: usize,
    /// Raw-HTML handling mode; `None` disables safe mode.
    pub safe_mode: Option<SafeMode>,
    /// Active extensions and their options.
    pub extras: Extras,
    /// Auto-link patterns for the `link-patterns` extension.
    pub link_patterns: Vec<LinkPattern>,
    /// Format string for footnote back-link titles (one `%d`/`{}` slot).
    pub footnote_title: Option<String>,
    /// Symbol used for the footnote back-link.
    pub footnote_return_symbol: Option<String>,
    /// Honor Emacs-style file-variable blocks to activate extras.
    pub use_file_vars: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            html4tags: false,
            tab_width: DEFAULT_TAB_WIDTH,
            safe_mode: None,
            extras: Extras::default(),
            link_patterns: Vec::new(),
            footnote_title: None,
            footnote_return_symbol: None,
            use_file_vars: false,
        }
    }
}

impl ConversionOptions {
    /// The `/>`-vs-`>` suffix for void elements, per `html4tags`.
    pub fn empty_element_suffix(&self) -> &'static str {
        if self.html4tags { ">" } else { " />" }
    }

    /// Apply Emacs file-variable overrides (`use_file_vars`, SPEC_FULL.md
    /// §11) on top of this options set, returning the effective options for
    /// one document. Unrecognized variable names are ignored rather than
    /// rejected, matching the reference implementation's tolerant behavior
    /// for a mechanism meant to be embedded in arbitrary prose.
    pub fn with_file_vars(&self, vars: &HashMap<String, String>) -> Self {
        let mut effective = self.clone();
        if let Some(extras) = vars.get("markdown-extras") {
            for name in extras.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                enable_extra_by_name(&mut effective.extras, name);
            }
        }
        if let Some(mode) = vars.get("markdown-safe-mode") {
            if let Ok(parsed) = SafeMode::parse(mode.trim()) {
                effective.safe_mode = Some(parsed);
            }
        }
        if let Some(width) = vars.get("markdown-tab-width") {
            if let Ok(parsed) = width.trim().parse() {
                effective.tab_width = parsed;
            }
        }
        effective
    }
}

fn enable_extra_by_name(extras: &mut Extras, name: &str) {
    match name {
        "footnotes" => extras.footnotes = true,
        "toc" => {
            extras.toc.get_or_insert_with(TocOptions::default);
        }
        "header-ids" => {
            extras.header_ids.get_or_insert_with(HeaderIdsOptions::default);
        }
        "tables" => extras.tables = true,
        "smarty-pants" => extras.smarty_pants = true,
        "strike" => extras.strike = true,
        "task_list" => extras.task_list = true,
        "cuddled-lists" => extras.cuddled_lists = true,
        "tag-friendly" => extras.tag_friendly = true,
        "target-blank-links" => extras.target_blank_links = true,
        "nofollow" => extras.nofollow = true,
        "metadata" => extras.metadata = true,
        "fenced-code-blocks" => {
            extras.fenced_code_blocks.get_or_insert_with(FencedCodeBlockOptions::default);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_mode_parses_known_values() {
        assert_eq!(SafeMode::parse("escape").unwrap(), SafeMode::Escape);
        assert_eq!(SafeMode::parse("replace").unwrap(), SafeMode::Replace);
    }

    #[test]
    fn safe_mode_rejects_unknown_values() {
        assert!(SafeMode::parse("yolo").is_err());
    }

    #[test]
    fn empty_element_suffix_respects_html4tags() {
        let mut opts = ConversionOptions::default();
        assert_eq!(opts.empty_element_suffix(), " />");
        opts.html4tags = true;
        assert_eq!(opts.empty_element_suffix(), ">");
    }
}
