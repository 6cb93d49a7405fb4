//! Conformance report rendering.

use serde::{Deserialize, Serialize};

use crate::verify::VerificationResult;

/// Summary of one verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    pub campaign: String,
    pub family: String,
    pub timestamp: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<VerificationResult>,
}

impl ConformanceReport {
    /// Build a report from runner results.
    #[must_use]
    pub fn new(
        campaign: impl Into<String>,
        family: impl Into<String>,
        timestamp: impl Into<String>,
        results: Vec<VerificationResult>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            title: "axshim conformance report".to_string(),
            campaign: campaign.into(),
            family: family.into(),
            timestamp: timestamp.into(),
            total: results.len(),
            passed,
            failed: results.len() - passed,
            results,
        }
    }

    /// True when every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Render as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Campaign: {}\n", self.campaign));
        out.push_str(&format!("- Family: {}\n", self.family));
        out.push_str(&format!("- Generated: {}\n", self.timestamp));
        out.push_str(&format!(
            "- Result: {}/{} passed\n\n",
            self.passed, self.total
        ));
        out.push_str("| Case | Function | Reference | Status |\n");
        out.push_str("|---|---|---|---|\n");
        for r in &self.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {status} |\n",
                r.case_name, r.function, r.standard_ref
            ));
        }

        let failures: Vec<&VerificationResult> =
            self.results.iter().filter(|r| !r.passed).collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {}\n\n```diff\n", r.case_name));
                out.push_str(r.diff.as_deref().unwrap_or(""));
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, passed: bool) -> VerificationResult {
        VerificationResult {
            case_name: name.to_string(),
            function: "srand_rand".to_string(),
            standard_ref: "C11 7.22.2.2 srand".to_string(),
            passed,
            expected: "[0]".to_string(),
            actual: if passed { "[0]" } else { "[1]" }.to_string(),
            diff: (!passed).then(|| "   1 - [0]\n   1 + [1]\n".to_string()),
        }
    }

    #[test]
    fn counts_passes_and_failures() {
        let report = ConformanceReport::new(
            "c",
            "stdlib/random",
            "2026-10-17T00:00:00.000Z",
            vec![result("a", true), result("b", false)],
        );
        assert_eq!(report.total, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn markdown_lists_failures_with_diffs() {
        let report = ConformanceReport::new(
            "c",
            "stdlib/random",
            "2026-10-17T00:00:00.000Z",
            vec![result("good", true), result("bad", false)],
        );
        let md = report.to_markdown();
        assert!(md.contains("- Result: 1/2 passed"));
        assert!(md.contains("| good | srand_rand | C11 7.22.2.2 srand | PASS |"));
        assert!(md.contains("### bad"));
        assert!(md.contains("   1 + [1]"));
    }

    #[test]
    fn json_round_trips() {
        let report = ConformanceReport::new("c", "f", "t", vec![result("a", true)]);
        let parsed: ConformanceReport =
            serde_json::from_str(&report.to_json().expect("json")).expect("parse");
        assert_eq!(parsed.total, 1);
        assert!(parsed.all_passed());
    }
}
