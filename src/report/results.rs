use serde::Serialize;
use std::fmt;

/// Consolidated results of one Cypress run
///
/// Counts come straight from the summed stats blocks of the report files.
/// `tests` is not reconciled against `passes + failures`: pending and skipped
/// tests are counted in `tests` but in neither of the other two.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub tests: u32,
    pub passes: u32,
    pub failures: u32,
    pub suites: Vec<TestSuite>,
}

impl fmt::Display for TestResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cypress tests run: {}\nCypress tests passing: {}\nCypress tests failing: {}",
            self.tests, self.passes, self.failures
        )
    }
}

/// A named grouping of test cases as recorded by the test runner
///
/// Suites are kept in discovery order and never merged by title; two files
/// contributing a suite with the same title produce two entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuite {
    pub title: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tests: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub description: String,
    pub success: bool,
    /// Only present when the test failed and the runner recorded a message
    pub error_message: Option<String>,
    /// Only present when the test failed and the runner recorded a stack trace
    pub stack_trace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_counts() {
        let results = TestResults {
            tests: 60,
            passes: 57,
            failures: 3,
            suites: Vec::new(),
        };
        let rendered = results.to_string();
        assert!(rendered.contains("Cypress tests run: 60"));
        assert!(rendered.contains("Cypress tests passing: 57"));
        assert!(rendered.contains("Cypress tests failing: 3"));
    }
}
