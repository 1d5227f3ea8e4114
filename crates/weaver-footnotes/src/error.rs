//! Error types for footnote conversion and configuration.
//!
//! Command operations never fail: disallowed targets are skipped and empty
//! inputs are no-ops. Errors only arise at the edges, when reading serialized
//! markup or loading configuration.

use miette::Diagnostic;

/// Failure to move a document to or from serialized view markup.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ConversionError {
    /// Malformed markup
    #[error("markup error: {0}")]
    #[diagnostic(code(weaver::footnotes::markup))]
    Xml(#[from] quick_xml::Error),

    /// Malformed element attribute
    #[error("attribute error: {0}")]
    #[diagnostic(code(weaver::footnotes::markup))]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Writing the serialized view failed
    #[error("failed to write view markup")]
    #[diagnostic(code(weaver::footnotes::write))]
    Write(#[from] std::fmt::Error),

    /// Closing tag without a matching opening tag
    #[error("unexpected closing tag </{0}>")]
    #[diagnostic(code(weaver::footnotes::unbalanced))]
    UnexpectedEnd(String),

    /// Closing tag that does not match the innermost open element
    #[error("expected </{0}>, found </{1}>")]
    #[diagnostic(code(weaver::footnotes::unbalanced))]
    Mismatched(String, String),

    /// Element still open at end of input
    #[error("element <{0}> is never closed")]
    #[diagnostic(
        code(weaver::footnotes::unbalanced),
        help("every inline element needs a matching closing tag")
    )]
    Unclosed(String),
}

/// Failure to load editor configuration.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ConfigError {
    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Invalid JSON
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(weaver::footnotes::config))]
    Json(#[from] serde_json::Error),

    /// Values that parse but cannot be used
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(weaver::footnotes::config))]
    Invalid(String),
}
