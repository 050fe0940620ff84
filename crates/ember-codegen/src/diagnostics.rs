//! Diagnostic rendering for lowering failures.
//!
//! Human-readable output goes through ariadne; `json` output is a single
//! line per diagnostic for editors and build tooling.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use rowan::TextRange;
use serde::Serialize;

use crate::error::{LowerError, Unsupported};

/// How diagnostics are rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticOptions {
    /// Emit ANSI colors.
    pub color: bool,
    /// Emit one JSON object instead of an ariadne report.
    pub json: bool,
}

impl DiagnosticOptions {
    /// Plain text without colors, for snapshots and logs.
    pub fn colorless() -> Self {
        DiagnosticOptions {
            color: false,
            json: false,
        }
    }

    pub fn json() -> Self {
        DiagnosticOptions {
            color: false,
            json: true,
        }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions {
            color: true,
            json: false,
        }
    }
}

// ── Error Codes ────────────────────────────────────────────────────────

/// A stable code for each lowering failure.
pub fn error_code(err: &LowerError) -> &'static str {
    match err {
        LowerError::NotImplemented { what, .. } => match what {
            Unsupported::Intersection => "C0001",
            Unsupported::Tuple => "C0002",
            Unsupported::Structural => "C0003",
            Unsupported::TypeParamRef => "C0004",
            Unsupported::Trait => "C0005",
            Unsupported::PointerUnion => "C0006",
            Unsupported::Union => "C0007",
        },
    }
}

fn label_message(err: &LowerError) -> &'static str {
    match err {
        LowerError::NotImplemented { what, .. } => match what {
            Unsupported::Intersection => "intersection type used here",
            Unsupported::Tuple => "tuple type used here",
            Unsupported::Structural => "structural type used here",
            Unsupported::TypeParamRef => "type parameter is not known at code generation",
            Unsupported::Trait => "trait used as a concrete type here",
            Unsupported::PointerUnion => "both sides of this union are the same pointer type",
            Unsupported::Union => "sides of this union have different machine types",
        },
    }
}

// ── Span Helpers ───────────────────────────────────────────────────────

fn text_range_to_range(range: TextRange) -> Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    start..end
}

// ── JSON ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonSpan {
    start: usize,
    end: usize,
    label: &'static str,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    code: &'static str,
    severity: &'static str,
    message: String,
    file: &'a str,
    spans: Vec<JsonSpan>,
}

fn render_json(error: &LowerError, filename: &str) -> String {
    let range = text_range_to_range(error.span());
    let diag = JsonDiagnostic {
        code: error_code(error),
        severity: "error",
        message: error.to_string(),
        file: filename,
        spans: vec![JsonSpan {
            start: range.start,
            end: range.end,
            label: label_message(error),
        }],
    };
    serde_json::to_string(&diag).unwrap_or_else(|_| error.to_string())
}

// ── Main Rendering Function ────────────────────────────────────────────

/// Render a lowering failure against the source it points into.
pub fn render_diagnostic(
    error: &LowerError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    if options.json {
        return render_json(error, filename);
    }

    let config = if options.color {
        Config::default()
    } else {
        Config::default().with_color(false)
    };

    // ariadne needs a non-empty span inside the source.
    let source_len = source.len();
    let raw = text_range_to_range(error.span());
    let start = raw.start.min(source_len);
    let end = raw.end.min(source_len).max(start);
    let range = if start == end {
        start..end.saturating_add(1).min(source_len)
    } else {
        start..end
    };

    let report = Report::build(ReportKind::Error, range.clone())
        .with_code(error_code(error))
        .with_message(error.to_string())
        .with_config(config)
        .with_label(
            Label::new(range)
                .with_message(label_message(error))
                .with_color(Color::Red),
        )
        .finish();

    let mut buf = Vec::new();
    if report.write(Source::from(source), &mut buf).is_err() {
        return error.to_string();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
