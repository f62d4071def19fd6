use crate::error::{Error, Result};
use crate::report::results::{TestCase, TestResults, TestSuite};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// One Mochawesome report file, written per executed spec file
///
/// Only the fields modeled here are read; the report tool emits plenty more
/// and serde skips them.
#[derive(Debug, Deserialize)]
struct SpecRunReport {
    stats: Stats,
    #[serde(default)]
    results: Vec<ResultBlock>,
}

#[derive(Debug, Deserialize)]
struct Stats {
    tests: u32,
    passes: u32,
    failures: u32,
}

#[derive(Debug, Deserialize)]
struct ResultBlock {
    #[serde(default)]
    suites: Vec<SuiteBlock>,
}

#[derive(Debug, Deserialize)]
struct SuiteBlock {
    title: String,
    #[serde(default)]
    tests: Vec<TestBlock>,
}

#[derive(Debug, Deserialize)]
struct TestBlock {
    title: String,
    #[serde(default)]
    fail: bool,
    err: Option<ErrBlock>,
}

#[derive(Debug, Deserialize)]
struct ErrBlock {
    message: Option<String>,
    estack: Option<String>,
}

/// Read every `*.json` report in the directory and fold them into one result
///
/// Each file is parsed into an immutable intermediate first; a single
/// unreadable or malformed file aborts the whole aggregation. File enumeration
/// order determines suite order and nothing else.
pub fn gather(reports_path: &Path) -> Result<TestResults> {
    log::debug!(
        "reading mochawesome report files from {}",
        reports_path.display()
    );

    let entries = fs::read_dir(reports_path).map_err(|source| Error::Io {
        path: reports_path.to_path_buf(),
        source,
    })?;

    let mut reports = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: reports_path.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let contents = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let report: SpecRunReport =
            serde_json::from_str(&contents).map_err(|source| Error::Parse { path, source })?;
        reports.push(report);
    }

    Ok(reports.into_iter().fold(TestResults::default(), fold_report))
}

fn fold_report(mut results: TestResults, report: SpecRunReport) -> TestResults {
    results.tests += report.stats.tests;
    results.passes += report.stats.passes;
    results.failures += report.stats.failures;
    for block in report.results {
        results.suites.extend(block.suites.into_iter().map(convert_suite));
    }
    results
}

fn convert_suite(suite: SuiteBlock) -> TestSuite {
    TestSuite {
        title: suite.title,
        tests: suite.tests.into_iter().map(convert_test).collect(),
    }
}

fn convert_test(test: TestBlock) -> TestCase {
    let (error_message, stack_trace) = match test.err {
        Some(err) => (err.message, err.estack),
        None => (None, None),
    };
    TestCase {
        description: test.title,
        success: !test.fail,
        error_message,
        stack_trace,
    }
}

/// Delete everything under (and including) the reports directory, deepest
/// first. A nonexistent path is a silent no-op so cleanup stays idempotent.
pub fn clean(reports_path: &Path) -> Result<()> {
    if !reports_path.exists() {
        return Ok(());
    }
    for entry in WalkDir::new(reports_path).contents_first(true) {
        let entry = entry.map_err(|source| Error::Io {
            path: reports_path.to_path_buf(),
            source: source.into(),
        })?;
        let remove = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        remove.map_err(|source| Error::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_report(dir: &Path, name: &str, contents: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    const REPORT_A: &str = r#"{
        "stats": { "tests": 2, "passes": 1, "failures": 1, "pending": 0, "duration": 1200 },
        "results": [
            { "suites": [
                { "title": "todo list",
                  "tests": [
                    { "title": "adds a todo", "fail": false, "err": {} },
                    { "title": "removes a todo", "fail": true,
                      "err": { "message": "expected 0 to equal 1",
                               "estack": "AssertionError: expected 0 to equal 1\n    at Context.<anonymous>" } }
                  ] }
            ] }
        ],
        "copyrightYear": 2020
    }"#;

    const REPORT_B: &str = r#"{
        "stats": { "tests": 1, "passes": 1, "failures": 0 },
        "results": [
            { "suites": [
                { "title": "login",
                  "tests": [ { "title": "logs in", "fail": false } ] }
            ] }
        ]
    }"#;

    #[test]
    fn test_gather_sums_stats_and_unions_suites() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "todos.spec.js.json", REPORT_A);
        write_report(dir.path(), "login.spec.js.json", REPORT_B);

        let results = gather(dir.path()).unwrap();
        assert_eq!(results.tests, 3);
        assert_eq!(results.passes, 2);
        assert_eq!(results.failures, 1);
        assert_eq!(results.suites.len(), 2);
        let mut titles: Vec<&str> = results.suites.iter().map(|s| s.title.as_str()).collect();
        titles.sort_unstable();
        assert_eq!(titles, vec!["login", "todo list"]);
    }

    #[test]
    fn test_failing_test_carries_error_detail() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "todos.spec.js.json", REPORT_A);

        let results = gather(dir.path()).unwrap();
        let suite = &results.suites[0];
        assert_eq!(suite.title, "todo list");

        let passing = &suite.tests[0];
        assert!(passing.success);
        assert!(passing.error_message.is_none());
        assert!(passing.stack_trace.is_none());

        let failing = &suite.tests[1];
        assert!(!failing.success);
        assert_eq!(failing.error_message.as_deref(), Some("expected 0 to equal 1"));
        assert!(failing.stack_trace.as_deref().unwrap().starts_with("AssertionError"));
    }

    #[test]
    fn test_non_json_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "login.spec.js.json", REPORT_B);
        write_report(dir.path(), "notes.txt", "not a report");

        let results = gather(dir.path()).unwrap();
        assert_eq!(results.tests, 1);
        assert_eq!(results.suites.len(), 1);
    }

    #[test]
    fn test_malformed_file_aborts_aggregation() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "login.spec.js.json", REPORT_B);
        write_report(dir.path(), "broken.json", "{ not json");

        let err = gather(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_missing_stats_block_aborts_aggregation() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "no-stats.json", r#"{ "results": [] }"#);

        let err = gather(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_unreadable_directory_is_an_io_error() {
        let err = gather(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_clean_removes_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("mochawesome");
        fs::create_dir_all(reports.join("assets")).unwrap();
        write_report(&reports, "todos.spec.js.json", REPORT_A);
        write_report(&reports.join("assets"), "app.css.json", REPORT_B);

        clean(&reports).unwrap();
        assert!(!reports.exists());
    }

    #[test]
    fn test_clean_on_missing_directory_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        clean(&missing).unwrap();
        clean(&missing).unwrap();
    }
}
