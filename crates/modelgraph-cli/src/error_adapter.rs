//! Error adapter for converting ModelGraphError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Model load failures keep the offending JSON text, so they are rendered with
//! a labeled span at the line and column reported by the JSON parser.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use modelgraph::ModelGraphError;

/// Adapter for a model file that failed to load.
pub struct LoadDiagnostic<'a> {
    err: &'a serde_json::Error,
    /// Source code for displaying snippets
    src: &'a str,
    path: &'a str,
    span: SourceSpan,
}

impl<'a> LoadDiagnostic<'a> {
    /// Create a new load diagnostic over the source text of `path`.
    pub fn new(err: &'a serde_json::Error, src: &'a str, path: &'a str) -> Self {
        Self {
            err,
            src,
            path,
            span: error_span(err, src),
        }
    }

    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

impl fmt::Debug for LoadDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadDiagnostic")
            .field("err", &self.err)
            .field("path", &self.path)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for LoadDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load model `{}`", self.path)
    }
}

impl std::error::Error for LoadDiagnostic<'_> {}

impl MietteDiagnostic for LoadDiagnostic<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("modelgraph::load"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err.classify() {
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                "the file is not well-formed JSON"
            }
            serde_json::error::Category::Data => "the JSON does not describe a model file",
            serde_json::error::Category::Io => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(Some(self.err.to_string()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`ModelGraphError`] variants without source text.
pub struct ErrorAdapter<'a>(pub &'a ModelGraphError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ModelGraphError::Io(_) => "modelgraph::io",
            ModelGraphError::Load { .. } => "modelgraph::load",
            ModelGraphError::Serialize(_) => "modelgraph::serialize",
            ModelGraphError::Dispatch(_) => "modelgraph::dispatch",
            ModelGraphError::Graph(_) => "modelgraph::graph",
            ModelGraphError::Config(_) => "modelgraph::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            ModelGraphError::Graph(modelgraph::graph::GraphError::UnknownVertex(_)) => Some(
                Box::new("every referenced type must be declared in one of the input files"),
            ),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A load failure with source location information.
    Load(LoadDiagnostic<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Load(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Load(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Load(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Load(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Load(d) => d.source_code(),
            Reportable::Error(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Load(d) => d.labels(),
            Reportable::Error(_) => None,
        }
    }
}

/// Locate the byte offset of a JSON error reported as 1-based line/column.
///
/// Positions past the end of the text (unexpected end of input) are clamped to
/// an empty span at the end.
fn error_span(err: &serde_json::Error, src: &str) -> SourceSpan {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(err.line().saturating_sub(1))
        .map(str::len)
        .sum();
    let offset = (line_start + err.column().saturating_sub(1)).min(src.len());
    let len = usize::from(offset < src.len());
    SourceSpan::new(offset.into(), len)
}

/// Convert a [`ModelGraphError`] into a list of reportable errors.
pub fn to_reportables(err: &ModelGraphError) -> Vec<Reportable<'_>> {
    match err {
        ModelGraphError::Load { err, src, path } => {
            vec![Reportable::Load(LoadDiagnostic::new(err, src, path))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
