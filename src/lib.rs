pub mod command;
pub mod config;
pub mod container;
pub mod docker;
pub mod error;
pub mod report;
pub mod runtime;
pub mod scanner;
pub mod signal;

// Re-export common items
pub use config::CypressConfig;
pub use container::CypressContainer;
pub use error::{Error, Result};
pub use report::{GatherStrategy, TestCase, TestResults, TestSuite};
pub use runtime::{BindMount, ContainerRuntime, ContainerSpec};
