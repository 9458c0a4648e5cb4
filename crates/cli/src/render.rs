//! Pretty diagnostic rendering using ariadne.
//!
//! Converts [`Diagnostic`]s into ariadne [`Report`]s that underline the
//! offending token inside the selection string. JSON output is assembled by
//! each command; this module only provides the failure envelope for it.

use std::io::{self, IsTerminal, Write};

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use sparse_fields_diagnostics::Diagnostic;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or detect from whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|c| !c.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Report layout shared by every diagnostic. Spans are byte offsets.
fn report_config() -> Config {
    Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte)
}

/// Render diagnostics against `source` to stderr.
pub(crate) fn render_diagnostics(source: &str, name: &str, diagnostics: &[Diagnostic]) {
    let mut stderr = io::stderr().lock();
    if let Err(err) = write_reports(source, name, diagnostics, report_config(), &mut stderr) {
        log::warn!("failed to render diagnostics: {err}");
    }
}

/// Write one report per diagnostic to `out`.
///
/// Diagnostics with a span get an underlined excerpt. End-of-input errors
/// have an empty span, which ariadne cannot underline, so the label is
/// widened to cover the last character when there is one.
fn write_reports(
    source: &str,
    name: &str,
    diagnostics: &[Diagnostic],
    config: Config,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut cache = (name, Source::from(source));

    for diag in diagnostics {
        let Some(span) = &diag.span else {
            writeln!(out, "{}[{}]: {}", diag.severity, diag.id, diag.message)?;
            if let Some(note) = context_note(diag) {
                writeln!(out, "  = note: {note}")?;
            }
            if let Some(explanation) = diag.explain() {
                writeln!(out, "  = help: {explanation}")?;
            }
            continue;
        };

        let (start, end) = label_range(source, span.start, span.end);
        let mut builder = Report::build(ReportKind::Error, (name, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((name, start..end))
                    .with_message(context_note(diag).unwrap_or_else(|| diag.message.clone()))
                    .with_color(Color::Red),
            );

        if let Some(explanation) = diag.explain() {
            builder = builder.with_help(explanation);
        }

        builder.finish().write(&mut cache, &mut *out)?;
    }
    Ok(())
}

/// Clamp a byte span to `source` and widen empty spans onto the previous
/// character so the label has something to point at.
fn label_range(source: &str, start: usize, end: usize) -> (usize, usize) {
    let end = end.min(source.len());
    let start = start.min(end);
    if start < end {
        return (start, end);
    }
    match source[..start].chars().next_back() {
        Some(c) => (start - c.len_utf8(), start),
        None => (start, end),
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line such as `1 error` to stderr.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    use ariadne::Fmt;

    let errors = diagnostics.len();
    if errors == 0 {
        return;
    }
    let s = if errors == 1 { "" } else { "s" };
    eprintln!("{}", format!("{errors} error{s}").fg(Color::Red));
}

// ── Command failures ────────────────────────────────────────────────────

/// Report an error that stopped a command before it produced a result.
///
/// JSON mode prints a `{ "success": false, ... }` envelope to stdout so
/// callers parsing stdout always receive a JSON document.
pub(crate) fn report_failure(err: &anyhow::Error, format: Format) {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": false,
                "error": "command_failed",
                "message": format!("{err:#}"),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("envelope serialization cannot fail")
            );
        }
        Format::Pretty => eprintln!("error: {err:#}"),
    }
}
