/*!
 * Reporting functionality for wpr
 *
 * Summarises a written document with the tabled library: one table for the
 * embedded files and one for the totals.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::{estimate_tokens, format_file_size};
use crate::writer::FileStats;

/// What went into a written document
#[derive(Debug, Clone)]
pub struct BundleReport {
    /// Output file path
    pub output_file: String,
    /// Time from scan start to document written
    pub duration: Duration,
    /// Number of candidate files offered
    pub candidates: usize,
    /// Embedded files, in document order
    pub files: Vec<FileStats>,
    /// Size of the written document in bytes
    pub document_bytes: u64,
}

impl BundleReport {
    /// Total lines across embedded files
    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|f| f.lines).sum()
    }

    /// Total characters across embedded files
    pub fn total_chars(&self) -> usize {
        self.files.iter().map(|f| f.chars).sum()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for written documents
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &BundleReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &BundleReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, which carries the file name
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &BundleReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Session Time".to_string(),
                value: format!("{:.2?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Bundled".to_string(),
                value: format!(
                    "{} of {}",
                    self.format_number(report.files.len()),
                    self.format_number(report.candidates)
                ),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines()),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(estimate_tokens(report.total_chars()))
                ),
            },
            SummaryRow {
                key: "💾 Document Size".to_string(),
                value: format_file_size(report.document_bytes),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &BundleReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let rows: Vec<FileRow> = report
            .files
            .iter()
            .map(|file| FileRow {
                path: self.format_path(file.path.as_str(), 60),
                lines: self.format_number(file.lines),
                tokens: self.format_number(estimate_tokens(file.chars)),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &BundleReport) -> String {
        let summary_title = "✅  DOCUMENT WRITTEN";
        let summary_table = self.create_summary_table(report);

        if report.files.is_empty() {
            return format!("{}\n{}", summary_title, summary_table);
        }

        format!(
            "{}\n{}\n\n{}\n{}",
            "📋  BUNDLED FILES",
            self.create_files_table(report),
            summary_title,
            summary_table
        )
    }
}
