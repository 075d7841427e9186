//! Compiled regex library (SPEC_FULL.md C2).
//!
//! Every pattern used by more than one call site — or compiled from a
//! literal rather than built dynamically from user options — lives here as
//! a `once_cell::sync::Lazy<Regex>`, matching the teacher's `text.rs`
//! convention of never recompiling a pattern per call.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block-level HTML tags that get hashed out whole during `HASH_HTML`
/// (reference implementation's `block_tags_a`/`block_tags_b`).
pub const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "table", "dl", "ol",
    "ul", "script", "noscript", "form", "fieldset", "iframe", "math", "svg", "article", "section",
    "nav", "aside", "header", "footer", "figure", "figcaption", "details", "summary", "hr",
];

/// Leading ATX header marker, e.g. `## `.
pub static ATX_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\#{1,6})[ \t]*(.+?)[ \t]*\#*\s*$").unwrap());

/// ATX header requiring at least one space/tab after the hashes
/// (`tag-friendly` extra, SPEC_FULL.md §11).
pub static ATX_HEADER_TAG_FRIENDLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\#{1,6})[ \t]+(.+?)[ \t]*\#*\s*$").unwrap());

/// Setext-style `===`/`---` underlined headers.
pub static SETEXT_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(.+?)[ \t]*\n(=+|-+)[ \t]*\n+").unwrap());

/// Horizontal rule: three or more `*`, `-`, or `_`, optionally space
/// separated, alone on a line.
pub static HR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ ]{0,3}((?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap());

/// Opening fence of a fenced code block (``` or ~~~), capturing the
/// language/info string. `regex` has no backreferences, so matching the
/// required closing fence (same character, length >= opening length) is
/// done by hand in `extras/fenced_code_blocks.rs`.
pub static FENCED_CODE_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?P<fence>`{3,}|~{3,})[ \t]*(?P<lang>[^\n`]*)[ \t]*$").unwrap());

/// Indented (4-space) code block, one or more consecutive indented lines.
pub static INDENTED_CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^(?:[ ]{4}|\t).*\n?)+").unwrap());

/// Opening run of one or more backticks; code-span matching itself is done
/// by hand in `span.rs` (the `regex` crate has no lookaround, so "closing
/// run of exactly N backticks, not adjacent to a further backtick" can't be
/// expressed as a single pattern).
pub static CODE_SPAN_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`+").unwrap());

/// A list item marker: `*`, `+`, `-`, or `N.`/`N)`.
pub static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ ]{0,3}(?:[*+-]|\d+[.)])[ \t]+").unwrap());

/// A whole unordered or ordered list block (contiguous list-item lines plus
/// their continuations).
pub static LIST_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ ]{0,3}(?:[*+-]|\d+[.)])[ \t]+.*(?:\n(?:[ \t].*|[ \t]*\n[ \t].*)?)*)").unwrap()
});

/// Block quote: one or more consecutive `>`-prefixed lines.
pub static BLOCKQUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^[ \t]*>[ \t]?.*(?:\n|$))+").unwrap());

/// Link/image definition line: `[id]: url "title"`.
pub static LINK_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^[ ]{0,3}\[(?P<id>[^\]]+)\]:[ \t]*\n?[ \t]*<?(?P<url>[^\s>]+)>?(?:[ \t]*\n?[ \t]*(?P<quote>["'(])(?P<title>.*?)["')])?[ \t]*(?:\n+|\z)"#,
    )
    .unwrap()
});

/// Footnote definition: `[^id]: text`, continuation lines indented.
pub static FOOTNOTE_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ ]{0,3}\[\^(?P<id>[^\]]+)\]:[ \t]*(?P<text>.*(?:\n(?:[ \t].+|[ \t]*)?)*)").unwrap()
});

/// Inline footnote reference: `[^id]`.
pub static FOOTNOTE_REF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\^([^\]]+)\]").unwrap());

/// Strong+em, strong, and em inline markers (asterisk and underscore
/// forms), longest-first so `***x***` is tried before `**x**`/`*x*`.
pub static STRONG_EM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\*\*\*(?P<a>(?:\\.|[^\\])+?)\*\*\*").unwrap());
pub static STRONG_ASTERISK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\*\*(?P<a>(?:\\.|[^\\])+?)\*\*").unwrap());
pub static EM_ASTERISK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\*(?P<a>(?:\\.|[^\\])+?)\*").unwrap());
/// Underscore emphasis requires a non-word boundary on both sides (so
/// `foo_bar_baz` is not treated as emphasis unless `middle-word-em` is on).
/// `regex` has no lookaround, so the boundary characters are captured in
/// groups 1/3 and must be re-emitted by the caller.
pub static STRONG_UNDERSCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(^|\W)__(?P<a>(?:\\.|[^\\])+?)__($|\W)").unwrap());
pub static EM_UNDERSCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(^|\W)_(?P<a>(?:\\.|[^\\])+?)_($|\W)").unwrap());

/// `~~strike~~` (`strike` extra).
pub static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)~~(?P<a>(?:\\.|[^\\])+?)~~").unwrap());

/// Bare autolink: `<http://example.com>` or `<user@host>`.
pub static AUTOLINK_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<((?:https?|ftp):[^'">\s]+)>"#).unwrap());
pub static AUTOLINK_EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<([^'">\s]+@[^'">\s]+\.[^'">\s]+)>"#).unwrap());

/// Characters escaped verbatim by a leading backslash.
pub const ESCAPABLE_CHARS: &str = r"\`*_{}[]()>#+-.!";
pub const ESCAPABLE_CHARS_SMARTY: &str = r#"\`*_{}[]()>#+-.!"'"#;

/// Escaped-character backslash sequence, built per-call since the
/// escapable set depends on whether SmartyPants quote-escaping is active;
/// kept here as a factory rather than a single static.
pub fn backslash_escape_regex(include_quotes: bool) -> Regex {
    let chars = if include_quotes { ESCAPABLE_CHARS_SMARTY } else { ESCAPABLE_CHARS };
    let escaped: String = chars.chars().map(|c| regex::escape(&c.to_string())).collect();
    Regex::new(&format!("\\\\([{escaped}])")).unwrap()
}

/// Trailing two-or-more spaces before a newline: hard line break.
pub static HARD_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}\n").unwrap());

/// Backslash immediately before a newline: hard line break (`breaks`
/// extra's `on_backslash` option).
pub static BACKSLASH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\\n").unwrap());

/// A single blank line (used to split the document into blocks).
pub static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Table row: pipe-delimited cells.
pub static TABLE_ROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ ]{0,3}\|?(.+)\|?[ \t]*$").unwrap());

/// Table separator row, e.g. `| --- | :--: | ---: |`.
pub static TABLE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ ]{0,3}\|?[ \t]*:?-+:?[ \t]*(\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$").unwrap());

/// Emacs `-*- ... -*-` one-line file-variables header.
pub static EMACS_ONELINER_VARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^.*?-\*-(?P<vars>.*?)-\*-.*$").unwrap());

/// Emacs `Local Variables: ... End:` block file-variables footer.
pub static EMACS_LOCAL_VARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^(?P<prefix>[^\r\n]*?)Local Variables:[ \t]*\r?\n(?P<body>.*?)^[^\r\n]*?End:").unwrap()
});

/// A key-colon-value line inside a metadata header block.
pub static METADATA_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<key>[A-Za-z0-9_-]+):[ \t]*(?P<value>.*)$").unwrap());

/// The `---`/`...` metadata block fence.
pub static METADATA_FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-{3,}\s*$").unwrap());
