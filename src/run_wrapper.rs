//! An analysis wrapper

use std::path::Path;
use std::path::PathBuf;

use crate::error::AnalyzerError;
use crate::error::AnalyzerResult;
use crate::metrics;
use crate::program;
use crate::report;
use crate::report::ReportContext;
use crate::trace::parser;

/// Analysis run options
#[derive(Clone, Debug)]
pub struct AnalyzerPolicy {
    /// Path to the trace log
    pub trace: PathBuf,
    /// Path to the program hex file
    pub hex: PathBuf,
    /// Echo the report to stdout
    pub show: bool,
    /// Report destination; None suppresses the file write
    pub out: Option<PathBuf>,
}

impl Default for AnalyzerPolicy {
    fn default() -> Self {
        Self {
            trace: PathBuf::from("sim/pipeline_trace.log"),
            hex: PathBuf::from("tests/sample_program.hex"),
            show: false,
            out: Some(PathBuf::from("sim/analyze_report.log")),
        }
    }
}

/// Runs the full analysis on the given inputs
/// and returns the rendered report.
///
/// An unreadable trace file degrades to the "no entries" report instead
/// of aborting; an absent program hex degrades to an empty listing.
pub fn run(policy: &AnalyzerPolicy) -> AnalyzerResult<String> {
    let entries = match parser::parse_trace_file(&policy.trace) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Warning: {}", e);
            Vec::new()
        }
    };

    let program = program::read_hex_program(&policy.hex);

    let trace_label = policy.trace.display().to_string();
    let hex_label = policy.hex.display().to_string();
    let ctx = ReportContext {
        trace_label: &trace_label,
        hex_label: &hex_label,
        entries: &entries,
        program: &program,
        metrics: metrics::aggregate(&entries),
    };

    Ok(report::render(&ctx))
}

/// Writes the report, creating the parent directory on demand
pub fn write_report(report: &str, path: &Path) -> AnalyzerResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AnalyzerError::ReportWriteError(path.to_path_buf(), e)
            })?;
        }
    }
    std::fs::write(path, report)
        .map_err(|e| AnalyzerError::ReportWriteError(path.to_path_buf(), e))
}
