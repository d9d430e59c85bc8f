use std::process;

use analyzer_lib::error::AnalyzerResult;
use analyzer_lib::metrics;
use analyzer_lib::trace::parser;

fn main() {
    if let Err(e) = run_eval() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_eval() -> AnalyzerResult<()> {
    let traces: Vec<String> = std::env::args().skip(1).collect();
    if traces.is_empty() {
        return Err(analyzer_lib::error::AnalyzerError::IoError(
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "You should specify at least one trace file",
            ),
        ));
    }

    let output_path = "eval/batch_eval.csv".to_string();
    std::fs::create_dir_all("eval")?;
    let mut writer = csv::Writer::from_path(&output_path).map_err(|e| {
        analyzer_lib::error::AnalyzerError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create CSV file '{}': {}", output_path, e),
        ))
    })?;

    writer
        .write_record([
            "Trace",
            "Cycles",
            "Instructions",
            "CPI",
            "IPC",
            "Stall cycles",
            "Forwarding cycles",
        ])
        .map_err(|e| {
            analyzer_lib::error::AnalyzerError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to write header to CSV: {}", e),
            ))
        })?;

    for trace in &traces {
        eprintln!("Analyzing trace: {}", trace);

        match parser::parse_trace_file(trace) {
            Ok(entries) => {
                let m = metrics::aggregate(&entries);
                writer
                    .write_record([
                        trace.as_str(),
                        &m.total_cycles.to_string(),
                        &m.retired.to_string(),
                        &format!("{:.3}", m.cpi),
                        &format!("{:.3}", m.ipc),
                        &m.stall_cycles.to_string(),
                        &m.forwarding_cycles.to_string(),
                    ])
                    .map_err(|e| {
                        analyzer_lib::error::AnalyzerError::IoError(
                            std::io::Error::new(
                                std::io::ErrorKind::Other,
                                format!(
                                    "Failed to write record to CSV: {}",
                                    e
                                ),
                            ),
                        )
                    })?;
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to analyze trace '{}': {}",
                    trace, e
                );
                writer
                    .write_record([
                        trace.as_str(),
                        "Error",
                        "Error",
                        "Error",
                        "Error",
                        "Error",
                        "Error",
                    ])
                    .map_err(|e| {
                        analyzer_lib::error::AnalyzerError::IoError(
                            std::io::Error::new(
                                std::io::ErrorKind::Other,
                                format!(
                                    "Failed to write record to CSV: {}",
                                    e
                                ),
                            ),
                        )
                    })?;
            }
        }
    }

    Ok(())
}
