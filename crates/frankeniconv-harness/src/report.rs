//! Report generation for conformance results.

use serde::{Deserialize, Serialize};

use crate::fixtures::LoadedFixture;
use crate::verify::VerificationSummary;

/// Provenance of one fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDigest {
    pub path: String,
    pub family: String,
    pub sha256: String,
}

impl From<&LoadedFixture> for FixtureDigest {
    fn from(fixture: &LoadedFixture) -> Self {
        Self {
            path: fixture.path.display().to_string(),
            family: fixture.set.family.clone(),
            sha256: fixture.sha256.clone(),
        }
    }
}

/// A conformance report: fixture provenance plus verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    pub fixtures: Vec<FixtureDigest>,
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        for fixture in &self.fixtures {
            out.push_str(&format!(
                "- Fixture: `{}` ({}) sha256 `{}`\n",
                fixture.path, fixture.family, fixture.sha256
            ));
        }
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Case | Family | Conversion | Status |\n");
        out.push_str("|------|--------|------------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                r.case_name, r.family, r.charset_pair, status
            ));
        }

        let failures: Vec<_> = self.summary.results.iter().filter(|r| !r.passed).collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {}\n\n```diff\n", r.case_name));
                out.push_str(r.diff.as_deref().unwrap_or_default());
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}
