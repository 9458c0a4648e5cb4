//! Lightweight parse/match/format benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p sparse_fields_core --example selection_benchmark --release`

use std::time::Instant;

use sparse_fields_core::{DelimiterTable, EmitConfig, Layout, Selection, emit_selection};

/// A wide selection: `f0(c0,c1,...),f1(...),...`.
fn wide_selection(fields: usize, children: usize) -> String {
    (0..fields)
        .map(|f| {
            let inner = (0..children)
                .map(|c| format!("c{c}/leaf"))
                .collect::<Vec<_>>()
                .join(",");
            format!("f{f}({inner})")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// A deep selection: `a(a(a(...x...)))`.
fn deep_selection(depth: usize) -> String {
    format!("{}x{}", "a(".repeat(depth), ")".repeat(depth))
}

fn per_iter_ms(elapsed: std::time::Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / iterations as f64
}

fn run_benchmark(label: &str, input: &str, probe: &str, iterations: usize) -> Result<(), String> {
    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = Selection::parse(input);
    }
    let parse_elapsed = parse_start.elapsed();

    let selection =
        Selection::parse(input).map_err(|e| format!("benchmark input '{label}' failed: {e}"))?;

    let match_start = Instant::now();
    for _ in 0..iterations {
        let _ = selection.matches(probe, true);
    }
    let match_elapsed = match_start.elapsed();

    let grouped = EmitConfig {
        layout: Layout::Grouped,
    };
    let format_start = Instant::now();
    for _ in 0..iterations {
        let _ = emit_selection(&selection, DelimiterTable::standard(), &grouped);
    }
    let format_elapsed = format_start.elapsed();

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", input.len());
    println!("  paths:       {}", selection.len());
    println!(
        "  parse:  total={:?}, per_iter={:.3} ms",
        parse_elapsed,
        per_iter_ms(parse_elapsed, iterations)
    );
    println!(
        "  match:  total={:?}, per_iter={:.3} ms",
        match_elapsed,
        per_iter_ms(match_elapsed, iterations)
    );
    println!(
        "  format: total={:?}, per_iter={:.3} ms",
        format_elapsed,
        per_iter_ms(format_elapsed, iterations)
    );
    Ok(())
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("SPARSE_FIELDS_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(500);

    let wide = wide_selection(50, 20);
    let deep = deep_selection(200);

    run_benchmark("wide", &wide, "F49/C19/LEAF/extra", iterations)?;
    run_benchmark("deep", &deep, "a/a/a/a", iterations)?;

    Ok(())
}
