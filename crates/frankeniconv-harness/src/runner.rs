//! Test execution engine.

use std::time::Instant;

use frankeniconv_core::{FallbackPolicy, IconvDescriptor, IconvError, conv_detailed};
use parking_lot::Mutex;

use crate::error::HarnessError;
use crate::fixtures::{FixtureCase, FixtureOperation, FixtureSet, hex_lower};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::{Observation, VerificationResult};

/// Runs fixture sets on a pool of scoped worker threads.
///
/// Each case gets its own descriptor; workers share nothing but the
/// optional log emitter.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Worker thread count (at least 1).
    pub workers: usize,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>, workers: usize) -> Self {
        Self {
            campaign: campaign.into(),
            workers: workers.max(1),
        }
    }

    /// Run all cases in a set. Results keep fixture order.
    ///
    /// A malformed case (bad hex, unknown operation) aborts the run.
    pub fn run(
        &self,
        fixture_set: &FixtureSet,
        log: Option<&Mutex<LogEmitter>>,
    ) -> Result<Vec<VerificationResult>, HarnessError> {
        let cases = &fixture_set.cases;
        let workers = self.workers.min(cases.len()).max(1);

        let mut indexed: Vec<(usize, Result<VerificationResult, HarnessError>)> =
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..workers)
                    .map(|worker| {
                        scope.spawn(move || {
                            cases
                                .iter()
                                .enumerate()
                                .skip(worker)
                                .step_by(workers)
                                .map(|(index, case)| {
                                    (index, self.run_case(&fixture_set.family, case, log))
                                })
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .flat_map(|handle| match handle.join() {
                        Ok(results) => results,
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect()
            });

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    fn run_case(
        &self,
        family: &str,
        case: &FixtureCase,
        log: Option<&Mutex<LogEmitter>>,
    ) -> Result<VerificationResult, HarnessError> {
        let operation = case.operation()?;
        let chunks = case.input_chunks()?;
        let expected = Observation {
            output: hex_lower(&case.expected_bytes()?),
            error: case.expected_error.clone(),
            errno: case.expected_errno,
            non_reversible: case.expected_non_reversible,
        };

        let started = Instant::now();
        let actual = execute_case(case, operation, &chunks);
        let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let result =
            VerificationResult::compare(&case.name, family, case.charset_pair(), &expected, &actual);

        if let Some(log) = log {
            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Warn, Outcome::Fail)
            };
            let entry = LogEntry::new(String::new(), level, "case_result")
                .with_symbol(operation.as_str())
                .with_charset_pair(case.charset_pair())
                .with_outcome(outcome)
                .with_errno(actual.errno)
                .with_latency_ns(latency_ns)
                .with_details(serde_json::json!({
                    "campaign": self.campaign,
                    "family": family,
                    "case": case.name,
                    "error": actual.error,
                }));
            log.lock().emit_entry(entry)?;
        }
        Ok(result)
    }
}

fn execute_case(case: &FixtureCase, operation: FixtureOperation, chunks: &[Vec<u8>]) -> Observation {
    let mut output = Vec::new();
    let mut non_reversible = 0;
    let outcome = match operation {
        FixtureOperation::Stream => stream(case, chunks, &mut output, &mut non_reversible),
        FixtureOperation::OneShot => {
            conv_detailed(&case.to, &case.from, &chunks.concat()).map(|result| {
                output = result.output;
                non_reversible = result.non_reversible;
            })
        }
    };
    let error = outcome.err();
    Observation {
        output: hex_lower(&output),
        errno: error.as_ref().map_or(0, IconvError::errno),
        error: error.as_ref().map(|err| err.kind().to_string()),
        non_reversible: Some(non_reversible),
    }
}

/// Feeds each chunk to `convert`, carrying unconsumed bytes of an
/// incomplete call into the next one, then closes.
fn stream(
    case: &FixtureCase,
    chunks: &[Vec<u8>],
    output: &mut Vec<u8>,
    non_reversible: &mut usize,
) -> Result<(), IconvError> {
    let mut cd = IconvDescriptor::open(&case.to, &case.from)?;
    if let Some(policy) = &case.fallback {
        cd = cd.with_fallback(FallbackPolicy::from_str_loose(policy));
    }

    let mut pending: Vec<u8> = Vec::new();
    let mut stalled = None;
    for chunk in chunks {
        pending.extend_from_slice(chunk);
        match cd.convert(&pending) {
            Ok(result) => {
                output.extend(result.output);
                *non_reversible += result.non_reversible;
                pending.clear();
                stalled = None;
            }
            Err(IconvError::IncompleteSequence { consumed, partial }) => {
                output.extend(partial.output);
                *non_reversible += partial.non_reversible;
                pending.drain(..consumed);
                stalled = Some(IconvError::IncompleteSequence {
                    consumed,
                    partial: Default::default(),
                });
            }
            Err(err) => return Err(err),
        }
    }
    if let Some(err) = stalled {
        return Err(err);
    }
    output.extend(cd.close()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cases: &str) -> FixtureSet {
        FixtureSet::from_json(&format!(
            r#"{{"version":"v1","family":"smoke","cases":[{cases}]}}"#
        ))
        .expect("valid fixture json")
    }

    #[test]
    fn stream_case_resubmits_unconsumed_tail() {
        let fixture = set(
            r#"{"name":"split","from":"EUC-JP","to":"ISO-2022-JP","chunks":["b4c1bb","fa"],"expected_output":"1b244234413b7a1b2842"}"#,
        );
        let results = TestRunner::new("smoke", 1).run(&fixture, None).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{:?}", results[0].diff);
    }

    #[test]
    fn trailing_truncation_is_reported() {
        let fixture = set(
            r#"{"name":"cut","from":"UTF-8","to":"UTF-16LE","chunks":["41e381"],"expected_output":"4100","expected_error":"IncompleteSequence","expected_errno":22}"#,
        );
        let results = TestRunner::new("smoke", 1).run(&fixture, None).unwrap();
        assert!(results[0].passed, "{:?}", results[0].diff);
    }

    #[test]
    fn fallback_override_applies_to_stream_cases() {
        let fixture = set(
            r#"{"name":"strict","from":"UTF-8","to":"US-ASCII","fallback":"strict","chunks":["61c3a9"],"expected_output":"","expected_error":"InvalidSequence","expected_errno":84}"#,
        );
        let results = TestRunner::new("smoke", 1).run(&fixture, None).unwrap();
        assert!(results[0].passed, "{:?}", results[0].diff);
    }

    #[test]
    fn results_keep_fixture_order_across_workers() {
        let cases: Vec<String> = (0..16)
            .map(|i| {
                format!(
                    r#"{{"name":"c{i:02}","operation":"oneshot","from":"ISO-8859-1","to":"UTF-8","chunks":["{:02x}"],"expected_output":"{:02x}"}}"#,
                    0x30 + i,
                    0x30 + i
                )
            })
            .collect();
        let fixture = set(&cases.join(","));
        let (emitter, buffer) = LogEmitter::to_buffer("iconv", "order");
        let log = Mutex::new(emitter);
        let results = TestRunner::new("smoke", 4).run(&fixture, Some(&log)).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.case_name.as_str()).collect();
        let expected: Vec<String> = (0..16).map(|i| format!("c{i:02}")).collect();
        assert_eq!(names, expected);
        assert!(results.iter().all(|r| r.passed));
        assert_eq!(buffer.contents().lines().count(), 16);
    }

    #[test]
    fn malformed_case_aborts_run() {
        let fixture = set(
            r#"{"name":"bad","from":"UTF-8","to":"UTF-8","chunks":["4"],"expected_output":""}"#,
        );
        assert!(matches!(
            TestRunner::new("smoke", 2).run(&fixture, None),
            Err(HarnessError::BadHex { .. })
        ));
    }
}
