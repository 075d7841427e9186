//! Small text utilities shared across pipeline stages.
//!
//! Grounded in the reference implementation's `_outdent` and `_detab`
//! helpers (tab-width-aware block dedenting used throughout list and
//! block-quote processing, spec §4.3).

/// Remove one level of leading indentation (up to `tab_width` columns, or a
/// single literal tab) from every line of `text`.
pub fn outdent(text: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut first = true;
    for line in text.split('\n') {
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(outdent_line(line, tab_width));
    }
    out
}

fn outdent_line(line: &str, tab_width: usize) -> &str {
    if let Some(rest) = line.strip_prefix('\t') {
        return rest;
    }
    let mut removed = 0;
    for (i, ch) in line.char_indices() {
        if ch == ' ' && removed < tab_width {
            removed += 1;
            continue;
        }
        return &line[i..];
    }
    if removed == line.len() { "" } else { line }
}

/// Expand every tab in `text` to spaces at `tab_width`-column tab stops,
/// line by line (spec §4.3, mirroring the reference implementation's
/// `_detab`/`_detab_line`, which expand tabs anywhere in a line, not only
/// leading indentation).
pub fn detab(text: &str, tab_width: usize) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&detab_line(line, tab_width));
    }
    out
}

fn detab_line(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let spaces = tab_width - (col % tab_width);
            out.extend(std::iter::repeat_n(' ', spaces));
            col += spaces;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}
