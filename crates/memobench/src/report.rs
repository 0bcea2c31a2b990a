//! Result rendering: boxed text tables or JSON

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub len: usize,
    pub queries: usize,
    pub updates: usize,
    pub capacity: usize,
    pub uncached_secs: f64,
    pub cached_secs: f64,
    pub speedup: f64,
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
    pub evictions: u64,
    pub invalidations: u64,
    pub checksum: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FibRow {
    pub n: u64,
    /// Decimal string; results outgrow JSON numbers
    pub value: String,
    pub unbounded_secs: f64,
    pub splay_secs: f64,
    pub lru_secs: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FibReport {
    pub repeats: u32,
    pub lru_capacity: usize,
    pub rows: Vec<FibRow>,
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = String::new();
    for (cell, width) in cells.zip(widths) {
        out.push_str(&format!("| {:>width$} ", cell, width = *width));
    }
    out.push_str("|\n");
    out
}

/// Render rows as a table with `+---+` borders
fn boxed(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let border: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let mut out = border.clone();
    out.push_str(&line(headers.iter().copied(), &widths));
    out.push_str(&border);
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str), &widths));
    }
    out.push_str(&border);
    out
}

impl RangeReport {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        if format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(self)?);
        }

        let rows = vec![
            vec!["array length".to_string(), self.len.to_string()],
            vec!["queries".to_string(), self.queries.to_string()],
            vec!["updates".to_string(), self.updates.to_string()],
            vec!["cache capacity".to_string(), self.capacity.to_string()],
            vec!["time without cache (s)".to_string(), format!("{:.4}", self.uncached_secs)],
            vec!["time with LRU cache (s)".to_string(), format!("{:.4}", self.cached_secs)],
            vec!["speedup".to_string(), format!("{:.2}x", self.speedup)],
            vec!["hit ratio".to_string(), format!("{:.2}%", self.hit_ratio * 100.0)],
            vec!["evictions".to_string(), self.evictions.to_string()],
            vec!["invalidated ranges".to_string(), self.invalidations.to_string()],
        ];
        Ok(boxed(&["metric", "value"], &rows))
    }
}

impl FibReport {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        if format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(self)?);
        }

        let lru_header = format!("LRU({}) Time (s)", self.lru_capacity);
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.n.to_string(),
                    format!("{:.8}", row.unbounded_secs),
                    format!("{:.8}", row.splay_secs),
                    format!("{:.8}", row.lru_secs),
                ]
            })
            .collect();
        Ok(boxed(
            &["n", "Unbounded Time (s)", "Splay Tree Time (s)", lru_header.as_str()],
            &rows,
        ))
    }
}
