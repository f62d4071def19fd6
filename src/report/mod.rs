pub mod mochawesome;
pub mod results;

pub use results::{TestCase, TestResults, TestSuite};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// How test results are gathered after a run
///
/// A tagged capability rather than a trait object: each variant carries its
/// own configuration and future report formats become additional variants
/// selected through [`CypressConfig`](crate::CypressConfig).
#[derive(Debug, Clone)]
pub enum GatherStrategy {
    /// Read the Mochawesome JSON reports from a host directory
    Mochawesome { reports_path: PathBuf },
}

impl GatherStrategy {
    pub fn mochawesome(reports_path: impl Into<PathBuf>) -> Self {
        Self::Mochawesome {
            reports_path: reports_path.into(),
        }
    }

    /// Host-side directory the report files are written to
    pub fn reports_path(&self) -> &Path {
        match self {
            Self::Mochawesome { reports_path } => reports_path,
        }
    }

    /// Aggregate the on-disk reports into one consolidated result
    pub fn gather(&self) -> Result<TestResults> {
        match self {
            Self::Mochawesome { reports_path } => mochawesome::gather(reports_path),
        }
    }

    /// Delete any reports left over from a previous run
    pub fn clean(&self) -> Result<()> {
        match self {
            Self::Mochawesome { reports_path } => mochawesome::clean(reports_path),
        }
    }
}
