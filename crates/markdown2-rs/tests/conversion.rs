use markdown2_rs::options::{ConversionOptions, FencedCodeBlockOptions, TocOptions};
use markdown2_rs::{convert, Converter};

#[test]
fn paragraph_and_emphasis() {
    let html = convert("hello *world* and **strong**\n", None).unwrap();
    assert!(html.contains("<em>world</em>"));
    assert!(html.contains("<strong>strong</strong>"));
}

#[test]
fn atx_header_renders() {
    let html = convert("# Title\n\nbody\n", None).unwrap();
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<p>body</p>"));
}

#[test]
fn ordered_and_unordered_lists() {
    let html = convert("* a\n* b\n\n1. x\n2. y\n", None).unwrap();
    assert!(html.contains("<ul>"));
    assert!(html.contains("<ol>"));
    assert!(html.contains("<li>a</li>"));
}

#[test]
fn fenced_code_block_extra() {
    let mut opts = ConversionOptions::default();
    opts.extras.fenced_code_blocks = Some(FencedCodeBlockOptions::default());
    let converter = Converter::new(opts).unwrap();
    let out = converter.convert("```rust\nlet x = 1;\n```\n").html;
    assert!(out.contains("<pre><code>let x = 1;"));
}

#[test]
fn table_extra_renders_alignment() {
    let mut opts = ConversionOptions::default();
    opts.extras.tables = true;
    let converter = Converter::new(opts).unwrap();
    let out = converter.convert("a | b\n--- | ---:\n1 | 2\n").html;
    assert!(out.contains("<table>"));
    assert!(out.contains("text-align:right"));
}

#[test]
fn footnotes_numbered_in_citation_order() {
    let mut opts = ConversionOptions::default();
    opts.extras.footnotes = true;
    let converter = Converter::new(opts).unwrap();
    let out = converter
        .convert("para one[^b].\n\npara two[^a].\n\n[^b]: second def\n[^a]: first def\n")
        .html;
    assert!(out.contains("fnref-1"));
    assert!(out.contains("fn-1"));
    assert!(out.contains("class=\"footnotes\""));
}

#[test]
fn toc_collects_headers_up_to_depth() {
    let mut opts = ConversionOptions::default();
    opts.extras.toc = Some(TocOptions { depth: 2, prepend: false });
    let converter = Converter::new(opts).unwrap();
    let result = converter.convert("# One\n\n## Two\n\n### Three\n");
    let toc = result.toc_html.expect("toc should be rendered");
    assert!(toc.contains("#one"));
    assert!(toc.contains("#two"));
    assert!(!toc.contains("#three"));
}

#[test]
fn safe_mode_escapes_raw_html() {
    let mut opts = ConversionOptions::default();
    opts.safe_mode = Some(markdown2_rs::options::SafeMode::Escape);
    let converter = Converter::new(opts).unwrap();
    let out = converter.convert("<script>alert(1)</script>\n\ntext\n").html;
    assert!(!out.contains("<script>"));
}

#[test]
fn link_definitions_resolve_reference_links() {
    let html = convert("[site][ex]\n\n[ex]: http://example.com \"Example\"\n", None).unwrap();
    assert!(html.contains("href=\"http://example.com\""));
    assert!(html.contains("title=\"Example\""));
}

#[test]
fn strike_and_smarty_pants_extras_compose() {
    let mut opts = ConversionOptions::default();
    opts.extras.strike = true;
    opts.extras.smarty_pants = true;
    let converter = Converter::new(opts).unwrap();
    let out = converter.convert("~~gone~~ and \"quoted\"\n").html;
    assert!(out.contains("<s>gone</s>"));
    assert!(out.contains('\u{201c}'));
}

#[test]
fn metadata_block_is_extracted_and_stripped_from_output() {
    let mut opts = ConversionOptions::default();
    opts.extras.metadata = true;
    let converter = Converter::new(opts).unwrap();
    let result = converter.convert("title: Hello\nauthor: Me\n\nBody text\n");
    assert_eq!(result.metadata.get("title").unwrap(), "Hello");
    assert!(!result.html.contains("title: Hello"));
    assert!(result.html.contains("Body text"));
}

#[test]
fn use_file_vars_activates_extras_from_document() {
    let mut opts = ConversionOptions::default();
    opts.use_file_vars = true;
    let converter = Converter::new(opts).unwrap();
    let out = converter
        .convert("<!-- -*- markdown-extras: strike -*- -->\n\n~~gone~~\n")
        .html;
    assert!(out.contains("<s>gone</s>"));
}

#[test]
fn reusable_converter_is_independent_across_calls() {
    let converter = Converter::new(ConversionOptions::default()).unwrap();
    let a = converter.convert("one *x*");
    let b = converter.convert("two *y*");
    assert!(a.html.contains('x'));
    assert!(b.html.contains('y'));
    assert!(!a.html.contains('y'));
}
