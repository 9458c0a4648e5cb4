mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sparse_fields_core::{
    EmitConfig, FieldPath, Layout, Selection, TokenKind, emit_selection, parse_with_table,
    tokenize,
};
use sparse_fields_delimiters::{DelimiterTable, load_delimiters_from_str};
use sparse_fields_diagnostics::{self as diag, Diagnostic};

use crate::render::{Format, print_summary, render_diagnostics, report_failure};

/// Exit code for a well-formed run whose answer is negative (syntax error,
/// nothing matched). Command failures such as unreadable input use 2.
const EXIT_NEGATIVE: i32 = 1;
const EXIT_FAILURE: i32 = 2;

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "sparse-fields",
    version,
    about = "Parse, check, and match partial-response field selections such as `foo,bar(baz,qux/quux)`"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Path to a JSON delimiter configuration (`fields`, `nested`,
    /// `group_start`, `group_end`). Omitted keys keep the defaults.
    #[arg(long, global = true)]
    delimiters: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a selection and print the flattened field paths.
    Parse {
        /// Selection text, or `-` to read it from stdin.
        selection: String,
    },

    /// Syntax-check a selection (exit 1 if malformed).
    #[command(alias = "syntax-check")]
    Check {
        /// Selection text, or `-` to read it from stdin.
        selection: String,
    },

    /// Test response paths against a selection (exit 1 if none is selected).
    Match {
        /// Selection text, or `-` to read it from stdin.
        selection: String,
        /// Response paths such as `author/name`.
        #[arg(required = true)]
        paths: Vec<String>,
        /// Compare segments case-insensitively.
        #[arg(long, short = 'i')]
        ignore_case: bool,
    },

    /// Print the canonical form of a selection.
    Format {
        /// Selection text, or `-` to read it from stdin.
        selection: String,
        /// Fold shared prefixes back into groups instead of spelling out
        /// every path.
        #[arg(long)]
        grouped: bool,
    },

    /// Dump the lexer's token stream.
    Tokens {
        /// Selection text, or `-` to read it from stdin.
        selection: String,
    },

    /// Explain a diagnostic ID (e.g. SEL1001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match run(cli, format) {
        Ok(code) => process::exit(code),
        Err(err) => {
            report_failure(&err, format);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli, format: Format) -> Result<i32> {
    if let Cmd::Explain { id } = &cli.cmd {
        cmd_explain(id, format)?;
        return Ok(0);
    }

    let table = resolve_table(cli.delimiters.as_deref())?;
    match cli.cmd {
        Cmd::Parse { selection } => cmd_parse(&Input::read(&selection)?, &table, format),
        Cmd::Check { selection } => cmd_check(&Input::read(&selection)?, &table, format),
        Cmd::Match {
            selection,
            paths,
            ignore_case,
        } => cmd_match(
            &Input::read(&selection)?,
            &paths,
            ignore_case,
            &table,
            format,
        ),
        Cmd::Format { selection, grouped } => {
            cmd_format(&Input::read(&selection)?, grouped, &table, format)
        }
        Cmd::Tokens { selection } => cmd_tokens(&Input::read(&selection)?, &table, format),
        Cmd::Explain { .. } => Ok(0),
    }
}

// ── Input ───────────────────────────────────────────────────────────────

/// Selection text plus the name shown in diagnostics.
struct Input {
    text: String,
    name: &'static str,
}

impl Input {
    /// Take the selection from the argument, or from stdin when it is `-`.
    fn read(arg: &str) -> Result<Self> {
        if arg != "-" {
            return Ok(Self {
                text: arg.to_string(),
                name: "<selection>",
            });
        }
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read selection from stdin")?;
        Ok(Self {
            text,
            name: "<stdin>",
        })
    }
}

/// Load the delimiter table from `--delimiters`, or use the default one.
fn resolve_table(path: Option<&str>) -> Result<DelimiterTable> {
    let Some(path) = path else {
        return Ok(DelimiterTable::standard().clone());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read delimiters file '{path}'"))?;
    let table = load_delimiters_from_str(&json)
        .and_then(|opts| opts.table())
        .with_context(|| format!("invalid delimiters file '{path}'"))?;
    log::info!("loaded delimiters from {path}");
    Ok(table)
}

/// Parse `input`, or report the syntax error and return `None`.
fn parse_or_report(input: &Input, table: &DelimiterTable, format: Format) -> Result<Option<Selection>> {
    match parse_with_table(&input.text, table) {
        Ok(sel) => Ok(Some(sel)),
        Err(err) => {
            let diagnostics = vec![err.to_diagnostic()];
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "ok": false,
                        "diagnostics": diagnostics,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => report_pretty(input, &diagnostics),
            }
            Ok(None)
        }
    }
}

fn report_pretty(input: &Input, diagnostics: &[Diagnostic]) {
    render_diagnostics(&input.text, input.name, diagnostics);
    print_summary(diagnostics);
}

/// `path` joined with the table's primary nested-field delimiter.
fn render_path(path: &FieldPath, table: &DelimiterTable) -> String {
    path.segments().join(&table.primary_nested().to_string())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(input: &Input, table: &DelimiterTable, format: Format) -> Result<i32> {
    let Some(sel) = parse_or_report(input, table, format)? else {
        return Ok(EXIT_NEGATIVE);
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "paths": sel,
                "diagnostics": [],
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for path in &sel {
                println!("{}", render_path(path, table));
            }
        }
    }
    Ok(0)
}

fn cmd_check(input: &Input, table: &DelimiterTable, format: Format) -> Result<i32> {
    let Some(sel) = parse_or_report(input, table, format)? else {
        return Ok(EXIT_NEGATIVE);
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "path_count": sel.len(),
                "diagnostics": [],
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => eprintln!("syntax ok ({} paths)", sel.len()),
    }
    Ok(0)
}

#[derive(Debug, Serialize)]
struct MatchVerdict<'a> {
    path: &'a str,
    selected: bool,
}

fn cmd_match(
    input: &Input,
    paths: &[String],
    ignore_case: bool,
    table: &DelimiterTable,
    format: Format,
) -> Result<i32> {
    let Some(sel) = parse_or_report(input, table, format)? else {
        return Ok(EXIT_NEGATIVE);
    };

    let verdicts: Vec<MatchVerdict<'_>> = paths
        .iter()
        .map(|path| MatchVerdict {
            path: path.as_str(),
            selected: sel.matches_with(path, ignore_case, table),
        })
        .collect();
    let any = verdicts.iter().any(|v| v.selected);
    log::debug!(
        "{} of {} paths selected",
        verdicts.iter().filter(|v| v.selected).count(),
        verdicts.len()
    );

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "ignore_case": ignore_case,
                "any_selected": any,
                "results": verdicts,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            use ariadne::{Color, Fmt};
            for v in &verdicts {
                if v.selected {
                    println!("{} {}", "selected".fg(Color::Green), v.path);
                } else {
                    println!("{} {}", "excluded".fg(Color::Red), v.path);
                }
            }
        }
    }
    Ok(if any { 0 } else { EXIT_NEGATIVE })
}

fn cmd_format(input: &Input, grouped: bool, table: &DelimiterTable, format: Format) -> Result<i32> {
    let Some(sel) = parse_or_report(input, table, format)? else {
        return Ok(EXIT_NEGATIVE);
    };

    let config = EmitConfig {
        layout: if grouped { Layout::Grouped } else { Layout::Flat },
    };
    let formatted = emit_selection(&sel, table, &config);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "formatted": formatted,
                "changed": formatted != input.text.trim(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => println!("{formatted}"),
    }
    Ok(0)
}

#[derive(Debug, Serialize)]
struct TokenRow<'a> {
    kind: TokenKind,
    text: Option<&'a str>,
    start: usize,
    end: usize,
}

fn cmd_tokens(input: &Input, table: &DelimiterTable, format: Format) -> Result<i32> {
    let rows: Vec<TokenRow<'_>> = tokenize(&input.text, table)
        .into_iter()
        .map(|tok| TokenRow {
            kind: tok.kind,
            text: tok.text,
            start: tok.start(),
            end: tok.position,
        })
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        Format::Pretty => {
            for row in &rows {
                let kind = row.kind.to_string();
                match row.text {
                    Some(text) => println!("{:>4}..{:<4} {kind:<24} {text:?}", row.start, row.end),
                    None => println!("{:>4}..{:<4} {kind}", row.start, row.end),
                }
            }
        }
    }
    Ok(0)
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}
