use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// A host-directory-to-container-path mapping active for a running container
#[derive(Debug, Clone)]
pub struct BindMount {
    pub host_path: PathBuf,
    pub container_path: PathBuf,
}

impl BindMount {
    pub fn new(host_path: impl Into<PathBuf>, container_path: impl Into<PathBuf>) -> Self {
        Self {
            host_path: host_path.into(),
            container_path: container_path.into(),
        }
    }
}

/// Everything the runtime needs to launch the single container of a run
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub image: String,
    pub working_dir: String,
    pub env: Vec<(String, String)>,
    pub binds: Vec<BindMount>,
    /// Entrypoint argv, e.g. `["bash", "-c", "<command>"]`
    pub entrypoint: Vec<String>,
}

/// Container runtime collaborator
///
/// Implementations own image management, mount wiring and process supervision.
/// Output chunks are delivered to the returned channel, one line per message,
/// for as long as the container runs.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Start the container and return its combined output stream
    async fn start(&mut self, spec: &ContainerSpec) -> Result<mpsc::Receiver<String>>;

    /// Stop and remove the container
    async fn stop(&mut self) -> Result<()>;
}
