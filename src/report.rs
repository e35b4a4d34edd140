use colored::*;

use crate::metrics::RetrievalKind;
use crate::results::BenchmarkResult;
use crate::utils::{format_table_row, print_table_row, print_table_separator};

const DEMO_LABEL: &str = "P2P (demo)";

const HEADERS: [&str; 8] = [
    "Kind",
    "Samples",
    "Failed",
    "Avg (ms)",
    "Min (ms)",
    "Max (ms)",
    "StdDev",
    "Avg Mbps",
];
const WIDTHS: [usize; 8] = [12, 7, 6, 10, 10, 10, 8, 9];

/// One line of the summary table
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub cells: Vec<String>,
    /// Derived figures rather than measurements
    pub synthetic: bool,
}

impl SummaryRow {
    fn measured(cells: Vec<String>) -> Self {
        Self {
            cells,
            synthetic: false,
        }
    }
}

/// Rows of the summary table, one per kind with data
///
/// Demo figures get their own synthetic row; cells they have no value for
/// are shown as "-".
pub fn summary_rows(result: &BenchmarkResult) -> Vec<SummaryRow> {
    let mut rows = Vec::new();

    for kind in [RetrievalKind::P2p, RetrievalKind::Centralized] {
        if let Some(stats) = result.summary_for(kind) {
            rows.push(SummaryRow::measured(vec![
                kind_label(kind).to_string(),
                stats.samples.to_string(),
                result.failures_for(kind).to_string(),
                format!("{:.2}", stats.avg_latency_ms),
                format!("{:.2}", stats.min_latency_ms),
                format!("{:.2}", stats.max_latency_ms),
                format!("{:.2}", stats.std_dev),
                format!("{:.2}", stats.avg_speed_mbps),
            ]));
        } else if result.failures_for(kind) > 0 {
            let mut row = vec![
                kind_label(kind).to_string(),
                "0".to_string(),
                result.failures_for(kind).to_string(),
            ];
            row.extend(std::iter::repeat("-".to_string()).take(5));
            rows.push(SummaryRow::measured(row));
        }
    }

    if let Some(demo) = &result.demo_p2p {
        rows.push(SummaryRow {
            cells: vec![
                DEMO_LABEL.to_string(),
                "-".to_string(),
                "-".to_string(),
                format!("{:.2}", demo.avg_latency_ms),
                format!("{:.2}", demo.min_latency_ms),
                format!("{:.2}", demo.max_latency_ms),
                "-".to_string(),
                "-".to_string(),
            ],
            synthetic: true,
        });
    }

    rows
}

fn kind_label(kind: RetrievalKind) -> &'static str {
    match kind {
        RetrievalKind::P2p => "P2P",
        RetrievalKind::Centralized => "Centralized",
    }
}

/// Print the summary table for a finished run
pub fn print_summary(result: &BenchmarkResult) {
    println!();
    println!("{}", "📊 Summary:".bold());

    let rows = summary_rows(result);
    if rows.is_empty() {
        println!("{}", "   No samples were collected.".yellow());
        return;
    }

    print_table_separator(&WIDTHS);
    println!("{}", format_table_row(&HEADERS, &WIDTHS).bold());
    print_table_separator(&WIDTHS);
    for row in &rows {
        let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
        if row.synthetic {
            println!("{}", format_table_row(&cells, &WIDTHS).dimmed());
        } else {
            print_table_row(&cells, &WIDTHS);
        }
    }
    print_table_separator(&WIDTHS);

    if result.demo_p2p.is_some() {
        println!(
            "{}",
            "   P2P (demo) figures are synthetic (derived from centralized results), not measurements."
                .yellow()
        );
    }
}
