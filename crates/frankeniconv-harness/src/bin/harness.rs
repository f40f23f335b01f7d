//! CLI entrypoint for the frankeniconv conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parking_lot::Mutex;

use frankeniconv_harness::report::FixtureDigest;
use frankeniconv_harness::structured_log::{self, LogEmitter, LogEntry, LogLevel};
use frankeniconv_harness::{ConformanceReport, TestRunner, VerificationSummary, fixtures};

/// Conformance tooling for frankeniconv.
#[derive(Debug, Parser)]
#[command(name = "frankeniconv-harness")]
#[command(about = "Conformance testing harness for frankeniconv")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the engine against fixture sets.
    Verify {
        /// Fixture JSON file, or a directory of them.
        #[arg(long, default_value = "tests/conformance/fixtures")]
        fixture: PathBuf,
        /// Output report path (markdown); a `.json` sibling is written too.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Worker threads per fixture set.
        #[arg(long, default_value_t = 4)]
        workers: usize,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Validate a structured JSONL log against the schema.
    ValidateLog {
        #[arg(long)]
        log: PathBuf,
    },
    /// List the canonical names of supported charsets.
    Charsets,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            log,
            workers,
            timestamp,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let loaded = fixtures::load_fixtures(&fixture)?;

            let run_id = format!("run-{}", std::process::id());
            let emitter = log
                .as_deref()
                .map(|path| LogEmitter::to_file(path, "iconv-verify", &run_id))
                .transpose()?
                .map(Mutex::new);

            if let Some(emitter) = &emitter {
                let mut emitter = emitter.lock();
                emitter.emit_entry(
                    LogEntry::new(String::new(), LogLevel::Info, "run_start").with_details(
                        serde_json::json!({
                            "fixtures": loaded.iter().map(|f| f.sha256.as_str()).collect::<Vec<_>>(),
                            "workers": workers,
                        }),
                    ),
                )?;
            }

            let runner = TestRunner::new("fixture-verify", workers);
            let mut results = Vec::new();
            for fixture in &loaded {
                results.extend(runner.run(&fixture.set, emitter.as_ref())?);
            }

            let summary = VerificationSummary::from_results(results);
            if let Some(emitter) = &emitter {
                let mut emitter = emitter.lock();
                emitter.emit_entry(
                    LogEntry::new(String::new(), LogLevel::Info, "run_end").with_details(
                        serde_json::json!({
                            "total": summary.total,
                            "passed": summary.passed,
                            "failed": summary.failed,
                        }),
                    ),
                )?;
                emitter.flush()?;
            }

            let report_doc = ConformanceReport {
                title: String::from("frankeniconv Conformance Report"),
                timestamp: timestamp.unwrap_or_else(structured_log::now_utc),
                fixtures: loaded.iter().map(FixtureDigest::from).collect(),
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );

            if let Some(report_path) = report {
                if let Some(parent) = report_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(&report_path, report_doc.to_markdown())?;
                std::fs::write(report_path.with_extension("json"), report_doc.to_json())?;
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = structured_log::validate_log_file(&log)?;
            for error in &errors {
                eprintln!("{error}");
            }
            eprintln!("{lines} line(s), {} error(s)", errors.len());
            if !errors.is_empty() {
                return Err(format!("Log validation failed for {}", log.display()).into());
            }
        }
        Command::Charsets => {
            for name in frankeniconv_core::supported_charsets() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
