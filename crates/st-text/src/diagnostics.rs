use std::fmt;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The story cannot be used as written.
    Error,
    /// The story parses but something looks wrong.
    Warning,
}

impl Severity {
    fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    fn report_kind(self) -> ReportKind<'static> {
        match self {
            Self::Error => ReportKind::Error,
            Self::Warning => ReportKind::Warning,
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
        }
    }
}

/// A problem found in a story source, tied to the line it occurs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Byte range of the offending line.
    pub span: Range<usize>,
    /// 1-based line number.
    pub line: usize,
    /// What is wrong.
    pub message: String,
    /// Short note shown under the line, defaulting to the message.
    pub label: Option<String>,
}

impl Diagnostic {
    fn new(severity: Severity, span: Range<usize>, line: usize, message: String) -> Self {
        Self {
            severity,
            span,
            line,
            message,
            label: None,
        }
    }

    /// An error at `line`.
    pub fn error(span: Range<usize>, line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, span, line, message.into())
    }

    /// A warning at `line`.
    pub fn warning(span: Range<usize>, line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, span, line, message.into())
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: line {}: {}",
            self.severity.name(),
            self.line,
            self.message
        )
    }
}

/// Render diagnostics against `source` with ariadne.
///
/// Diagnostics that cannot be rendered are skipped.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diagnostic in diagnostics {
        let label = Label::new((filename, diagnostic.span.clone()))
            .with_message(diagnostic.label.as_deref().unwrap_or(&diagnostic.message))
            .with_color(diagnostic.severity.color());

        let written = Report::build(
            diagnostic.severity.report_kind(),
            (filename, diagnostic.span.clone()),
        )
        .with_message(&diagnostic.message)
        .with_label(label)
        .finish()
        .write((filename, Source::from(source)), &mut output);

        if let Err(e) = written {
            tracing::debug!(line = diagnostic.line, "cannot render diagnostic: {e}");
        }
    }

    String::from_utf8_lossy(&output).into_owned()
}
