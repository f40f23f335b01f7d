//! Output comparison and verification.

use serde::{Deserialize, Serialize};

/// Observable outcome of one case: output hex plus error kind and errno.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub errno: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_reversible: Option<usize>,
}

impl Observation {
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("output={}", self.output);
        if let Some(error) = &self.error {
            out.push_str(&format!(" error={error}"));
        }
        out.push_str(&format!(" errno={}", self.errno));
        if let Some(count) = self.non_reversible {
            out.push_str(&format!(" non_reversible={count}"));
        }
        out
    }
}

/// Result of verifying a single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Name of the test case.
    pub case_name: String,
    /// Fixture family.
    pub family: String,
    /// `"<from> -> <to>"`.
    pub charset_pair: String,
    /// Whether the case passed.
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    /// Line diff if the case failed.
    pub diff: Option<String>,
}

impl VerificationResult {
    /// Compares an observation against the expectation.
    ///
    /// `non_reversible` is compared only when the expectation carries it.
    #[must_use]
    pub fn compare(
        case_name: &str,
        family: &str,
        charset_pair: String,
        expected: &Observation,
        actual: &Observation,
    ) -> Self {
        let count_matches =
            expected.non_reversible.is_none() || expected.non_reversible == actual.non_reversible;
        let passed = expected.output == actual.output
            && expected.error == actual.error
            && expected.errno == actual.errno
            && count_matches;
        let (expected, actual) = (expected.render(), actual.render());
        let diff = (!passed).then(|| render_diff(&expected, &actual));
        Self {
            case_name: case_name.to_string(),
            family: family.to_string(),
            charset_pair,
            passed,
            expected,
            actual,
            diff,
        }
    }
}

/// Render a field-wise diff between expected and actual renderings.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }
    let mut out = String::from("--- expected\n+++ actual\n");
    for (e, a) in expected.split(' ').zip(actual.split(' ')) {
        if e != a {
            out.push_str(&format!("-{e}\n+{a}\n"));
        }
    }
    out
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    /// Build a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total,
            passed,
            failed: total - passed,
            results,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
