use crate::error::{Error, Result};
use crate::report::GatherStrategy;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_IMAGE: &str = "cypress/included:4.5.0";
const DEFAULT_BASE_URL: &str = "http://host.testcontainers.internal";
const DEFAULT_PORT: u16 = 8080;

/// Mount point of the cypress project inside the container, also the working directory
pub const CONTAINER_PROJECT_PATH: &str = "/e2e";

/// Run options for a Cypress container
///
/// Built once with the `with_*` setters and immutable after the container
/// starts. Every optional string setter rejects blank values up front rather
/// than silently ignoring them.
#[derive(Debug, Clone)]
pub struct CypressConfig {
    pub image: String,
    pub base_url: String,
    pub browser: Option<String>,
    pub spec: Option<String>,
    pub record: bool,
    pub record_key: Option<String>,
    pub npm_install_args: Option<String>,
    pub auto_clean_reports: bool,
    pub max_total_test_duration: Duration,
    /// Host directory holding the cypress project (where cypress.json lives),
    /// bound read-write at [`CONTAINER_PROJECT_PATH`]
    pub project_path: PathBuf,
    pub gather_strategy: GatherStrategy,
}

impl Default for CypressConfig {
    fn default() -> Self {
        let project_path = PathBuf::from("e2e");
        let gather_strategy = GatherStrategy::mochawesome(
            project_path.join("cypress").join("reports").join("mochawesome"),
        );
        Self {
            image: DEFAULT_IMAGE.to_string(),
            base_url: format!("{}:{}", DEFAULT_BASE_URL, DEFAULT_PORT),
            browser: None,
            spec: None,
            record: false,
            record_key: None,
            npm_install_args: None,
            auto_clean_reports: true,
            max_total_test_duration: Duration::from_secs(10 * 60),
            project_path,
            gather_strategy,
        }
    }
}

impl CypressConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container image to run
    pub fn with_image(mut self, image: impl Into<String>) -> Result<Self> {
        self.image = non_blank(image, "image")?;
        Ok(self)
    }

    /// Set the full server URL used as the Cypress base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        self.base_url = non_blank(base_url, "baseUrl")?;
        Ok(self)
    }

    /// Set the port where the server under test is running. Uses
    /// `http://host.testcontainers.internal` as hostname with the given port
    /// as the Cypress base URL.
    pub fn with_local_server_port(mut self, port: i32) -> Result<Self> {
        if port <= 0 {
            return Err(Error::Configuration(format!(
                "port should be a positive integer, but was {}",
                port
            )));
        }
        self.base_url = format!("{}:{}", DEFAULT_BASE_URL, port);
        Ok(self)
    }

    /// Set the browser to use when running the tests (e.g. chrome, firefox, electron)
    pub fn with_browser(mut self, browser: impl Into<String>) -> Result<Self> {
        self.browser = Some(non_blank(browser, "browser")?);
        Ok(self)
    }

    /// Set the test(s) to run, a single spec file or a glob. By default all
    /// tests are run.
    pub fn with_spec(mut self, spec: impl Into<String>) -> Result<Self> {
        self.spec = Some(non_blank(spec, "spec")?);
        Ok(self)
    }

    /// Record the run to the Cypress dashboard
    pub fn with_record(mut self) -> Self {
        self.record = true;
        self
    }

    /// Record the run to the Cypress dashboard using the given record key.
    /// Implies [`with_record`](Self::with_record).
    pub fn with_record_key(mut self, key: impl Into<String>) -> Result<Self> {
        self.record_key = Some(non_blank(key, "record key")?);
        self.record = true;
        Ok(self)
    }

    /// Extra arguments appended verbatim to `npm install`
    pub fn with_npm_install_args(mut self, args: impl Into<String>) -> Result<Self> {
        self.npm_install_args = Some(non_blank(args, "npm install arguments")?);
        Ok(self)
    }

    /// Set if the report directory should be deleted before each run. The
    /// default is `true`.
    pub fn with_auto_clean_reports(mut self, auto_clean: bool) -> Self {
        self.auto_clean_reports = auto_clean;
        self
    }

    /// Maximum time to wait for the Cypress tests to finish. The default is
    /// 10 minutes.
    pub fn with_max_total_test_duration(mut self, duration: Duration) -> Self {
        self.max_total_test_duration = duration;
        self
    }

    /// Set the host directory holding the cypress project
    pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = path.into();
        self
    }

    /// Set the strategy used for gathering the test results
    pub fn with_gather_strategy(mut self, strategy: GatherStrategy) -> Self {
        self.gather_strategy = strategy;
        self
    }

    /// Shorthand for a Mochawesome strategy reading reports at the given host path
    pub fn with_mochawesome_reports_at(self, path: impl Into<PathBuf>) -> Self {
        self.with_gather_strategy(GatherStrategy::mochawesome(path))
    }

    /// Host-side path where the report files are expected
    pub fn reports_path(&self) -> &Path {
        self.gather_strategy.reports_path()
    }
}

fn non_blank(value: impl Into<String>, name: &str) -> Result<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(Error::Configuration(format!("{} should not be blank", name)));
    }
    Ok(value)
}
