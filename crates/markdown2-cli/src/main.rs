//! Command-line interface for `markdown2-rs`.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use markdown2_rs::options::{
    ConversionOptions, FencedCodeBlockOptions, HeaderIdsOptions, LinkPattern, LinkPatternReplacement, SafeMode,
    TocOptions,
};
use markdown2_rs::{ConversionError, Converter};
use regex::Regex;

#[derive(Parser)]
#[command(name = "markdown2", version, about = "Convert Markdown to HTML", long_about = None)]
struct Cli {
    /// Files to convert. If none are given, stdin is used. `-` also means stdin.
    paths: Vec<String>,

    /// Text encoding of the input file(s).
    #[arg(long, default_value = "utf-8")]
    encoding: String,

    /// Use HTML 4 style for empty element tags (`>` instead of ` />`).
    #[arg(long)]
    html4tags: bool,

    /// Sanitize literal HTML: "escape" or "replace".
    #[arg(short = 's', long = "safe", value_name = "MODE")]
    safe_mode: Option<String>,

    /// Turn on extra features. May be repeated or comma/space separated;
    /// `name=value` sets an integer-valued option (e.g. `toc=3`).
    #[arg(short = 'x', long = "extras")]
    extras: Vec<String>,

    /// Look for an Emacs-style `markdown-extras` file variable.
    #[arg(long)]
    use_file_vars: bool,

    /// Path to a link-patterns file (`REGEX<TAB>HREF-TEMPLATE` per line).
    #[arg(long)]
    link_patterns_file: Option<String>,

    /// Output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<String>,

    /// Tab width used for outdenting/detabbing.
    #[arg(long, default_value_t = markdown2_rs::options::DEFAULT_TAB_WIDTH)]
    tab_width: usize,

    /// Print collected document metadata (spec `metadata` extra) as JSON to stderr.
    #[arg(long)]
    show_metadata: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("markdown2: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let options = build_options(&cli)?;
    let converter = Converter::new(options).map_err(AppError::Conversion)?;

    let paths = if cli.paths.is_empty() { vec!["-".to_string()] } else { cli.paths.clone() };

    for path in &paths {
        let text = read_input(path, &cli.encoding)?;
        let result = converter.convert(&text);
        if let Some(out_path) = &cli.output {
            std::fs::write(out_path, &result.html)
                .map_err(|source| AppError::Io { path: out_path.clone(), source })?;
        } else {
            print!("{}", result.html);
        }

        if cli.show_metadata && !result.metadata.is_empty() {
            let json = serde_json::to_string(&result.metadata).map_err(AppError::Metadata)?;
            eprintln!("{json}");
        }
    }

    Ok(())
}

fn read_input(path: &str, encoding: &str) -> Result<String, AppError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| AppError::Io { path: path.to_string(), source })?;
        return Ok(buf);
    }

    let bytes = std::fs::read(path).map_err(|source| AppError::Io { path: path.to_string(), source })?;
    let label = encoding_rs::Encoding::for_label(encoding.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    let (text, _, _) = label.decode(&bytes);
    Ok(text.into_owned())
}

fn build_options(cli: &Cli) -> Result<ConversionOptions, AppError> {
    let mut options = ConversionOptions {
        html4tags: cli.html4tags,
        tab_width: cli.tab_width,
        use_file_vars: cli.use_file_vars,
        ..ConversionOptions::default()
    };

    if let Some(mode) = &cli.safe_mode {
        options.safe_mode = Some(SafeMode::parse(mode).map_err(AppError::Conversion)?);
    }

    for entry in &cli.extras {
        for item in entry.split([',', ';', ' ']).map(str::trim).filter(|s| !s.is_empty()) {
            let (name, arg) = match item.split_once('=') {
                Some((n, v)) => (n, Some(v)),
                None => (item, None),
            };
            enable_extra(&mut options, name, arg)?;
        }
    }

    if let Some(path) = &cli.link_patterns_file {
        options.link_patterns = parse_link_patterns_file(path)?;
        options.extras.link_patterns = true;
    }

    Ok(options)
}

fn enable_extra(options: &mut ConversionOptions, name: &str, arg: Option<&str>) -> Result<(), AppError> {
    match name {
        "footnotes" => options.extras.footnotes = true,
        "toc" => {
            let depth = arg.and_then(|v| v.parse().ok()).unwrap_or(6);
            options.extras.toc = Some(TocOptions { depth, prepend: false });
        }
        "header-ids" => {
            options.extras.header_ids.get_or_insert_with(HeaderIdsOptions::default);
        }
        "tables" => options.extras.tables = true,
        "strike" => options.extras.strike = true,
        "smarty-pants" => options.extras.smarty_pants = true,
        "task_list" => options.extras.task_list = true,
        "cuddled-lists" => options.extras.cuddled_lists = true,
        "tag-friendly" => options.extras.tag_friendly = true,
        "target-blank-links" => options.extras.target_blank_links = true,
        "nofollow" => options.extras.nofollow = true,
        "metadata" => options.extras.metadata = true,
        "fenced-code-blocks" => {
            options.extras.fenced_code_blocks.get_or_insert_with(FencedCodeBlockOptions::default);
        }
        "demote-headers" => {
            options.extras.demote_headers = Some(arg.and_then(|v| v.parse().ok()).unwrap_or(1));
        }
        other => return Err(AppError::UnknownExtra(other.to_string())),
    }
    Ok(())
}

fn parse_link_patterns_file(path: &str) -> Result<Vec<LinkPattern>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::Io { path: path.to_string(), source })?;
    let mut patterns = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(split_at) = trimmed.rfind(char::is_whitespace) else {
            return Err(AppError::Conversion(ConversionError::InvalidLinkPattern {
                line: i + 1,
                reason: "expected \"REGEX HREF-TEMPLATE\"".to_string(),
            }));
        };
        let (pattern, href) = (trimmed[..split_at].trim_end(), trimmed[split_at..].trim_start());
        let regex = Regex::new(pattern).map_err(|err| {
            AppError::Conversion(ConversionError::InvalidLinkPattern { line: i + 1, reason: err.to_string() })
        })?;
        patterns.push(LinkPattern { regex, replacement: LinkPatternReplacement::Template(translate_backrefs(href)) });
    }
    Ok(patterns)
}

/// Link-patterns files are written with Python `re.Match.expand`-style
/// `\1`..`\9` backreferences; the `regex` crate's own `expand` wants
/// `${1}`..`${9}` instead. Translate one into the other and escape any
/// literal `$` so it isn't mistaken for a group reference.
fn translate_backrefs(href: &str) -> String {
    let mut out = String::with_capacity(href.len());
    let mut chars = href.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '$' => out.push_str("$$"),
            '\\' if matches!(chars.peek(), Some(d) if d.is_ascii_digit()) => {
                let digit = chars.next().unwrap();
                out.push_str(&format!("${{{digit}}}"));
            }
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("failed to read/write {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("unknown extra {0:?}")]
    UnknownExtra(String),
    #[error("failed to serialize metadata: {0}")]
    Metadata(serde_json::Error),
}
