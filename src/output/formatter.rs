//! Console tables for the run plan and the end-of-run summary

use crate::{
    driver::{RunPlan, RunReport},
    models::Config,
    stats::{summarize, TrialStats},
};
use colored::*;
use std::fmt::Write as _;
use std::time::Duration;

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
    pub alignment: Alignment,
}

impl Column {
    pub fn left(header: &'static str) -> Self {
        Self { header, alignment: Alignment::Left }
    }

    pub fn right(header: &'static str) -> Self {
        Self { header, alignment: Alignment::Right }
    }
}

/// A bordered table; cells may carry a color applied after padding
#[derive(Debug, Clone)]
pub struct TableFormat {
    columns: Vec<Column>,
    rows: Vec<Vec<(String, Option<Color>)>>,
}

impl TableFormat {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Vec<(String, Option<Color>)>) {
        self.rows.push(row);
    }

    /// Render with `+---+` borders; colors are dropped when `enable_color` is false
    pub fn render(&self, enable_color: bool) -> String {
        let widths = self.column_widths();
        let border = horizontal_border(&widths);

        let mut output = String::new();
        output.push_str(&border);
        output.push('\n');

        let headers: Vec<(String, Option<Color>)> = self
            .columns
            .iter()
            .map(|c| (c.header.to_string(), None))
            .collect();
        output.push_str(&self.render_row(&headers, &widths, enable_color, true));
        output.push('\n');
        output.push_str(&border);
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row, &widths, enable_color, false));
            output.push('\n');
        }

        output.push_str(&border);
        output
    }

    fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|(text, _)| text.chars().count())
                    .fold(column.header.len(), usize::max)
            })
            .collect()
    }

    fn render_row(
        &self,
        cells: &[(String, Option<Color>)],
        widths: &[usize],
        enable_color: bool,
        is_header: bool,
    ) -> String {
        let mut row = String::from("|");

        for (idx, &width) in widths.iter().enumerate() {
            let (text, color) = cells
                .get(idx)
                .map(|(t, c)| (t.as_str(), *c))
                .unwrap_or(("", None));
            let alignment = self.columns[idx].alignment;
            let padded = align_text(text, width, alignment);

            let cell = match (enable_color, is_header, color) {
                (true, true, _) => padded.bold().to_string(),
                (true, false, Some(color)) => padded.color(color).to_string(),
                _ => padded,
            };

            row.push(' ');
            row.push_str(&cell);
            row.push_str(" |");
        }

        row
    }
}

fn horizontal_border(widths: &[usize]) -> String {
    let mut border = String::from("+");
    for &width in widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }
    border
}

fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    match alignment {
        Alignment::Left => format!("{:<width$}", text, width = width),
        Alignment::Right => format!("{:>width$}", text, width = width),
    }
}

/// Format seconds in human-readable form
pub fn format_seconds(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let minutes = (secs / 60.0) as u64;
        format!("{}m{:.1}s", minutes, secs % 60.0)
    }
}

/// Format a byte count with binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn format_duration(duration: Duration) -> String {
    format_seconds(duration.as_secs_f64())
}

/// Renders the dry-run plan and the post-run summary
pub struct SummaryFormatter {
    enable_color: bool,
}

impl SummaryFormatter {
    pub fn new(enable_color: bool) -> Self {
        Self { enable_color }
    }

    fn heading(&self, title: &str) -> String {
        if self.enable_color {
            title.blue().bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Table of every planned combination with its URL
    pub fn format_plan(&self, plan: &RunPlan, config: &Config) -> String {
        let mut table = TableFormat::new(vec![
            Column::left("File"),
            Column::left("Endpoint"),
            Column::left("Method"),
            Column::right("Trials"),
            Column::left("URL"),
        ]);

        for planned in plan.runs() {
            let url = config
                .catalog
                .get(&planned.file_name)
                .and_then(|spec| spec.path_for(planned.method))
                .map(|path| {
                    crate::runner::join_url(config.sources.base_url(planned.source), path)
                })
                .unwrap_or_default();

            table.push_row(vec![
                (planned.file_name.clone(), None),
                (planned.source.label().to_string(), Some(Color::Cyan)),
                (planned.method.to_string(), None),
                (planned.iterations.to_string(), None),
                (url, None),
            ]);
        }

        let (min_delay, _) = config.delay_bounds();
        let mut output = String::new();
        let _ = writeln!(output, "{}", self.heading("Benchmark plan"));
        let _ = writeln!(output, "{}", table.render(self.enable_color));
        let _ = writeln!(
            output,
            "{} combinations, {} trials, at least {} of pauses",
            plan.runs().len(),
            plan.total_trials(),
            format_duration(plan.minimum_pause(min_delay))
        );
        let _ = write!(output, "Results would be written to {}", config.output_file.display());
        output
    }

    /// Per-combination statistics table
    pub fn format_stats(&self, stats: &[TrialStats]) -> String {
        let mut table = TableFormat::new(vec![
            Column::left("File"),
            Column::left("Endpoint"),
            Column::left("Method"),
            Column::right("Trials"),
            Column::right("Min"),
            Column::right("Mean"),
            Column::right("Median"),
            Column::right("P90"),
            Column::right("Max"),
            Column::right("Bytes"),
            Column::right("Throughput"),
        ]);

        for s in stats {
            let level = Some(s.performance_level().color());
            table.push_row(vec![
                (s.file_name.clone(), None),
                (s.source.label().to_string(), Some(Color::Cyan)),
                (s.method.to_string(), None),
                (s.count.to_string(), None),
                (format_seconds(s.min_sec), None),
                (format_seconds(s.mean_sec), level),
                (format_seconds(s.median_sec), None),
                (format_seconds(s.p90_sec), None),
                (format_seconds(s.max_sec), None),
                (format_bytes(s.total_bytes), None),
                (
                    s.throughput_bps()
                        .map(|bps| format!("{}/s", format_bytes(bps as u64)))
                        .unwrap_or_else(|| "-".to_string()),
                    None,
                ),
            ]);
        }

        table.render(self.enable_color)
    }

    /// Summary printed after a successful run
    pub fn format_report(&self, report: &RunReport, config: &Config) -> String {
        let stats = summarize(&report.records);

        let mut output = String::new();
        let _ = writeln!(output, "{}", self.heading("Benchmark summary"));
        if stats.is_empty() {
            let _ = writeln!(output, "No trials were run.");
        } else {
            let _ = writeln!(output, "{}", self.format_stats(&stats));
        }
        let _ = writeln!(
            output,
            "Started {} | {} trials in {}",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.records.len(),
            format_duration(report.wall_time)
        );
        let _ = write!(output, "Results written to {}", config.output_file.display());
        output
    }
}
