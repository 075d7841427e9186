//! Indented (4-space) code block processing (spec §4.3 CODE_BLOCKS).

use crate::document::Document;
use crate::html_shield::escape_code_text;
use crate::regexes::INDENTED_CODE_BLOCK_RE;

/// Replace every run of 4-space/tab-indented lines with a hashed `<pre>`
/// block. Hashing prevents the block-gamut's other steps (lists,
/// blockquotes) from reinterpreting its contents.
pub fn run(doc: &mut Document, text: &str) -> String {
    INDENTED_CODE_BLOCK_RE
        .replace_all(text, |caps: &regex::Captures| {
            let raw = &caps[0];
            let dedented = crate::util::outdent(raw.trim_end_matches('\n'), doc.options.tab_width);
            let escaped = escape_code_text(&dedented);
            let html = format!("<pre><code>{escaped}\n</code></pre>\n");
            let key = doc.hashes.store(&html);
            format!("\n\n{key}\n\n")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConversionOptions;

    #[test]
    fn wraps_indented_block_in_pre_code() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let out = run(&mut doc, "    let x = 1;\n    let y = 2;\n");
        let restored = doc.hashes.unhash(&out);
        assert!(restored.contains("<pre><code>let x = 1;\nlet y = 2;"));
    }

    #[test]
    fn escapes_html_metacharacters_in_code() {
        let opts = ConversionOptions::default();
        let mut doc = Document::new(&opts);
        let out = run(&mut doc, "    <div>&amp;\n");
        let restored = doc.hashes.unhash(&out);
        assert!(restored.contains("&lt;div&gt;&amp;amp;"));
    }
}
