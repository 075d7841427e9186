//! GFM/PHP-Markdown-Extra pipe tables (`tables` extra, spec §4.10).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::extension::{Extension, Order, Registry, Stage};
use crate::span::span_gamut;

static TABLE_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ ]{0,3}\|?.+\|.*\n[ ]{0,3}\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*\n(?:[ ]{0,3}\|?.*\|.*\n?)*").unwrap()
});

#[derive(Clone, Copy)]
enum Align {
    None,
    Left,
    Center,
    Right,
}

pub struct Tables;

impl Extension for Tables {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn order(&self) -> Order {
        Order::BeforeStage(Stage::BlockGamut)
    }

    fn test(&self, doc: &Document) -> bool {
        doc.options.extras.tables
    }

    fn run(&self, doc: &mut Document, registry: &Registry, text: String) -> String {
        TABLE_BLOCK_RE.replace_all(&text, |caps: &regex::Captures| render_table(doc, registry, &caps[0])).into_owned()
    }
}

fn render_table(doc: &mut Document, registry: &Registry, block: &str) -> String {
    let mut lines = block.lines();
    let Some(header_line) = lines.next() else { return block.to_string() };
    let Some(sep_line) = lines.next() else { return block.to_string() };
    let aligns = parse_alignments(sep_line);
    let headers = split_row(header_line);
    if headers.len() != aligns.len() {
        return block.to_string();
    }

    let class_attr = doc
        .options
        .extras
        .html_classes
        .as_ref()
        .and_then(|c| c.classes.get("table"))
        .map(|c| format!(" class=\"{c}\""))
        .unwrap_or_default();
    let thead_class_attr = doc
        .options
        .extras
        .html_classes
        .as_ref()
        .and_then(|c| c.classes.get("thead"))
        .map(|c| format!(" class=\"{c}\""))
        .unwrap_or_default();

    let mut out = format!("<table{class_attr}>\n<thead{thead_class_attr}>\n<tr>\n");
    for (cell, align) in headers.iter().zip(&aligns) {
        let inline = span_gamut(doc, registry, cell.trim());
        out.push_str(&format!("  <th{}>{inline}</th>\n", align_attr(*align)));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_row(line);
        out.push_str("<tr>\n");
        for (i, align) in aligns.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let inline = span_gamut(doc, registry, cell.trim());
            out.push_str(&format!("  <td{}>{inline}</td>\n", align_attr(*align)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n\n");
    out
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim().trim_start_matches('|').trim_end_matches('|');
    split_unescaped_pipes(trimmed).into_iter().map(|s| s.replace("\\|", "|")).collect()
}

fn split_unescaped_pipes(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'|' && (i == 0 || bytes[i - 1] != b'\\') {
            out.push(&s[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    out.push(&s[start..]);
    out
}

fn parse_alignments(sep_line: &str) -> Vec<Align> {
    split_row(sep_line)
        .iter()
        .map(|cell| {
            let cell = cell.trim();
            let left = cell.starts_with(':');
            let right = cell.ends_with(':');
            match (left, right) {
                (true, true) => Align::Center,
                (true, false) => Align::Left,
                (false, true) => Align::Right,
                (false, false) => Align::None,
            }
        })
        .collect()
}

fn align_attr(align: Align) -> &'static str {
    match align {
        Align::None => "",
        Align::Left => " style=\"text-align:left\"",
        Align::Center => " style=\"text-align:center\"",
        Align::Right => " style=\"text-align:right\"",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn renders_simple_table() {
        let mut opts = ConversionOptions::default();
        opts.extras.tables = true;
        let mut doc = Document::new(&opts);
        let registry = Registry::build(Vec::new()).unwrap();
        let html = render_table(&mut doc, &registry, "a | b\n--- | ---:\n1 | 2\n");
        assert!(html.contains("<table"));
        assert!(html.contains("  <th>a</th>"));
        assert!(html.contains("text-align:right"));
    }
}
