use crate::runtime::{ContainerRuntime, ContainerSpec};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Container runtime backed by the `docker` CLI
///
/// Runs `docker run --rm` as a child process and streams its merged
/// stdout/stderr, one line per channel message.
pub struct DockerCliRuntime {
    container_name: String,
    child: Option<Child>,
}

impl DockerCliRuntime {
    pub fn new() -> Self {
        Self {
            container_name: format!("cypress-{}", Uuid::new_v4()),
            child: None,
        }
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }
}

impl Default for DockerCliRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerRuntime for DockerCliRuntime {
    async fn start(&mut self, spec: &ContainerSpec) -> Result<mpsc::Receiver<String>> {
        let docker = which::which("docker").context("docker binary not found in PATH")?;

        let mut command = Command::new(docker);
        command
            .arg("run")
            .arg("--rm")
            .arg("--name")
            .arg(&self.container_name)
            .arg("-w")
            .arg(&spec.working_dir);

        for (key, value) in &spec.env {
            command.arg("-e").arg(format!("{}={}", key, value));
        }

        for bind in &spec.binds {
            // Docker requires an absolute host path
            let host = std::fs::canonicalize(&bind.host_path).with_context(|| {
                format!("bind mount host path {} not found", bind.host_path.display())
            })?;
            command
                .arg("-v")
                .arg(format!("{}:{}", host.display(), bind.container_path.display()));
        }

        let (program, args) = spec
            .entrypoint
            .split_first()
            .context("entrypoint must not be empty")?;
        command
            .arg("--entrypoint")
            .arg(program)
            .arg(&spec.image)
            .args(args);

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        log::debug!("starting container {} from {}", self.container_name, spec.image);
        let mut child = command.spawn().context("failed to spawn docker run")?;
        let stdout = child.stdout.take().context("missing stdout pipe")?;
        let stderr = child.stderr.take().context("missing stderr pipe")?;
        self.child = Some(child);

        let (tx, rx) = mpsc::channel(256);
        spawn_line_reader(stdout, tx.clone());
        spawn_line_reader(stderr, tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        let docker = which::which("docker").context("docker binary not found in PATH")?;
        let output = Command::new(docker)
            .arg("rm")
            .arg("-f")
            .arg(&self.container_name)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("failed to remove container {}", self.container_name))?;

        // The container may already be gone thanks to --rm
        if !output.status.success() {
            log::debug!(
                "docker rm {}: {}",
                self.container_name,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        if let Some(mut child) = self.child.take() {
            let _ = child.wait().await;
        }
        Ok(())
    }
}

fn spawn_line_reader(reader: impl AsyncRead + Unpin + Send + 'static, tx: mpsc::Sender<String>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
}
