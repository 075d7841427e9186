//! Typed errors for Markdown conversion.
//!
//! Only configuration-class failures (spec §7) become an `Err`. Malformed
//! Markdown is never fatal: the offending fragment is left as literal text
//! in the output, matching the reference implementation's `MarkdownError`,
//! which is raised only for invalid `safe_mode` values and similar setup
//! mistakes.

/// Errors that can occur while configuring or running a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// An unrecognized `safe_mode` value was requested.
    #[error("invalid safe mode: {0:?} (must be \"escape\" or \"replace\")")]
    UnknownSafeMode(String),

    /// A line in a link-patterns file could not be parsed.
    #[error("invalid link-patterns line {line}: {reason}")]
    InvalidLinkPattern {
        /// 1-based line number within the patterns file.
        line: usize,
        /// Human-readable reason the line was rejected.
        reason: String,
    },

    /// An extension ordering constraint could not be satisfied (a cycle
    /// among `before`/`after` relationships).
    #[error("extension ordering cycle detected involving {0:?}")]
    OrderingCycle(String),
}

/// Convenience alias for fallible conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;
