//! Ordered and unordered list processing (spec §4.3 LISTS).
//!
//! A list block is split into items at the list's base marker indentation;
//! continuation lines are dedented by the marker width and recursively run
//! back through the block gamut, so nested lists, code blocks, and
//! block quotes inside a list item work like at the top level. A list is
//! "loose" (items wrapped in `<p>`) if a blank line separates any two
//! items or appears inside an item's own continuation; otherwise it is
//! "tight" and the sole paragraph each item produces is unwrapped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::extension::Registry;
use crate::regexes::LIST_BLOCK_RE;

static ITEM_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ ]{0,3})([*+-]|\d+[.)])([ \t]+)").unwrap());
static TASK_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([ xX])\][ \t]+").unwrap());

struct Item {
    raw: String,
    has_blank: bool,
    checked: Option<bool>,
}

pub fn run(doc: &mut Document, registry: &Registry, text: &str) -> String {
    LIST_BLOCK_RE
        .replace_all(text, |caps: &regex::Captures| render_list_block(doc, registry, &caps[0]))
        .into_owned()
}

fn render_list_block(doc: &mut Document, registry: &Registry, block: &str) -> String {
    let Some(first) = ITEM_START_RE.captures(block) else {
        return block.to_string();
    };
    let marker = &first[2];
    let ordered = marker.chars().next().unwrap().is_ascii_digit();
    let items = split_items(block);
    let loose = items.len() > 1 && items.iter().any(|i| i.has_blank);

    let tag = if ordered { "ol" } else { "ul" };
    let class_attr = doc
        .options
        .extras
        .html_classes
        .as_ref()
        .and_then(|c| c.classes.get(tag))
        .map(|c| format!(" class=\"{c}\""))
        .unwrap_or_default();

    let mut out = format!("<{tag}{class_attr}>\n");
    for item in &items {
        let dedented = dedent_item(&item.raw);
        let mut item_html = crate::block::block_gamut(doc, registry, &dedented);
        if !loose {
            item_html = unwrap_single_paragraph(&item_html);
        }
        let item_html = item_html.trim_end_matches('\n');
        match item.checked {
            Some(checked) => {
                let attr = if checked { " checked=\"checked\"" } else { "" };
                out.push_str(&format!(
                    "<li><input type=\"checkbox\" disabled=\"disabled\"{attr}{} {item_html}</li>\n",
                    doc.options.empty_element_suffix()
                ));
            }
            None => out.push_str(&format!("<li>{item_html}</li>\n")),
        }
    }
    out.push_str(&format!("</{tag}>\n\n"));
    out
}

fn split_items(block: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut current: Option<(String, bool)> = None;
    for line in block.lines() {
        if ITEM_START_RE.is_match(line) {
            if let Some((raw, has_blank)) = current.take() {
                items.push(finalize_item(raw, has_blank));
            }
            current = Some((line.to_string(), false));
        } else if let Some((raw, has_blank)) = current.as_mut() {
            if line.trim().is_empty() {
                *has_blank = true;
            }
            raw.push('\n');
            raw.push_str(line);
        }
    }
    if let Some((raw, has_blank)) = current {
        items.push(finalize_item(raw, has_blank));
    }
    items
}

fn finalize_item(raw: String, has_blank: bool) -> Item {
    let after_marker = ITEM_START_RE.replace(&raw, "").into_owned();
    let (content, checked) = match TASK_MARKER_RE.captures(&after_marker) {
        Some(caps) => {
            let checked = !caps[1].trim().is_empty();
            (TASK_MARKER_RE.replace(&after_marker, "").into_owned(), Some(checked))
        }
        None => (after_marker, None),
    };
    Item { raw: reassemble(&raw, &content), has_blank, checked }
}

fn reassemble(original_first_line: &str, replaced_first_line_content: &str) -> String {
    let mut lines = original_first_line.lines();
    lines.next();
    let rest: Vec<&str> = lines.collect();
    if rest.is_empty() {
        replaced_first_line_content.to_string()
    } else {
        format!("{replaced_first_line_content}\n{}", rest.join("\n"))
    }
}

fn dedent_item(raw: &str) -> String {
    let width = ITEM_START_RE
        .captures(raw)
        .map(|c| c[0].len())
        .unwrap_or(0)
        .max(2);
    let mut out = String::new();
    for (i, line) in raw.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == 0 {
            out.push_str(line);
        } else if line.len() >= width {
            out.push_str(&line[width.min(line.len())..]);
        } else {
            out.push_str(line.trim_start());
        }
    }
    out
}

fn unwrap_single_paragraph(html: &str) -> String {
    let trimmed = html.trim();
    if let Some(inner) = trimmed.strip_prefix("<p>").and_then(|s| s.strip_suffix("</p>")) {
        if !inner.contains("<p>") {
            return inner.to_string();
        }
    }
    html.to_string()
}
