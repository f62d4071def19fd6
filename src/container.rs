use crate::command::build_entrypoint;
use crate::config::{CypressConfig, CONTAINER_PROJECT_PATH};
use crate::error::{Error, Result};
use crate::report::TestResults;
use crate::runtime::{BindMount, ContainerRuntime, ContainerSpec};
use crate::scanner::OutputScanner;
use crate::signal::CompletionSignal;
use std::sync::Arc;

/// One Cypress run in one container
///
/// Configure-then-start-then-await: build a [`CypressConfig`], `start()` the
/// container, then block on [`test_results`](Self::test_results) until the run
/// finishes or the configured maximum duration elapses.
pub struct CypressContainer {
    config: CypressConfig,
    runtime: Box<dyn ContainerRuntime>,
    signal: Arc<CompletionSignal>,
}

impl CypressContainer {
    pub fn new(config: CypressConfig, runtime: Box<dyn ContainerRuntime>) -> Self {
        Self {
            config,
            runtime,
            signal: Arc::new(CompletionSignal::new()),
        }
    }

    pub fn config(&self) -> &CypressConfig {
        &self.config
    }

    /// Start the container and attach the output scanner
    ///
    /// When auto-clean is enabled the host-side report directory is removed
    /// before the container starts, so stale reports from a previous run can
    /// never be misattributed to this one.
    pub async fn start(&mut self) -> Result<()> {
        let binds = vec![BindMount::new(
            self.config.project_path.clone(),
            CONTAINER_PROJECT_PATH,
        )];
        let entrypoint = build_entrypoint(&self.config, &binds)?;

        if self.config.auto_clean_reports {
            self.config.gather_strategy.clean()?;
        }

        let spec = ContainerSpec {
            image: self.config.image.clone(),
            working_dir: CONTAINER_PROJECT_PATH.to_string(),
            env: vec![("CYPRESS_baseUrl".to_string(), self.config.base_url.clone())],
            binds,
            entrypoint: vec!["bash".to_string(), "-c".to_string(), entrypoint],
        };

        let output = self.runtime.start(&spec).await.map_err(Error::Runtime)?;
        OutputScanner::new(self.signal.clone()).spawn(output);
        Ok(())
    }

    /// Wait until the Cypress tests are done and return the results
    ///
    /// Fails with [`Error::Timeout`] when the run-finished sentinel does not
    /// appear within the configured maximum duration; no aggregation is
    /// attempted in that case.
    pub async fn test_results(&self) -> Result<TestResults> {
        let timeout = self.config.max_total_test_duration;
        if !self.signal.wait(timeout).await {
            log::warn!("cypress tests did not finish within {:?}", timeout);
            return Err(Error::Timeout(timeout));
        }

        let results = self.config.gather_strategy.gather()?;
        log::info!("{}", results);
        if results.failures > 0 {
            log::warn!("there was a failure running the cypress tests!\n\n{}", results);
        }
        Ok(results)
    }

    /// Stop and remove the container
    pub async fn stop(&mut self) -> Result<()> {
        self.runtime.stop().await.map_err(Error::Runtime)
    }
}
