//! Launch a containerized Ollama server for a role via podman.
//!
//! Fire-and-forget: the container is started detached on the role's port
//! with a persistent volume, then the role's model is pulled inside it.
//! Every failure, including "a container with that name already exists" and
//! "podman is not installed", collapses into `false`; the container layer
//! keeps the details.

use tokio::process::Command;
use tracing::warn;

use registry::RoleTable;

const DEFAULT_PROGRAM: &str = "podman";
const DEFAULT_IMAGE: &str = "quay.io/ollama/ollama";
const DEFAULT_VOLUME: &str = "ollama:/root/.ollama";

/// Starts Ollama containers for roles using an external container runtime.
pub struct Launcher {
    program: String,
    image: String,
    volume: String,
}

impl Launcher {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
            image: DEFAULT_IMAGE.into(),
            volume: DEFAULT_VOLUME.into(),
        }
    }

    /// Override the container runtime binary. Also the seam tests use to
    /// substitute a recording stub.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = volume.into();
        self
    }

    /// Start a detached server container for `role` and pull its model.
    ///
    /// The container name defaults to `ollama-{role}`. There is no check
    /// for an existing container with that name; re-running against one
    /// fails at the container layer and comes back as `false` like every
    /// other failure.
    pub async fn start_local(
        &self,
        table: &RoleTable,
        role: &str,
        container_name: Option<&str>,
    ) -> bool {
        let Some(spec) = table.get(role) else {
            warn!(role, "cannot launch unknown role");
            return false;
        };
        let name = container_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("ollama-{role}"));
        let port = spec.port;

        let run = self
            .run_command([
                "run",
                "-d",
                "--name",
                &name,
                "-p",
                &format!("{port}:{port}"),
                "-v",
                &self.volume,
                "-e",
                &format!("OLLAMA_HOST=0.0.0.0:{port}"),
                &self.image,
                "serve",
            ])
            .await;
        if !run {
            return false;
        }

        self.run_command(["exec", &name, "ollama", "pull", &spec.model])
            .await
    }

    async fn run_command<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> bool {
        let args: Vec<&str> = args.into_iter().collect();
        match Command::new(&self.program).args(&args).status().await {
            Ok(status) if status.success() => true,
            Ok(status) => {
                warn!(program = %self.program, ?args, code = status.code(), "container command failed");
                false
            }
            Err(err) => {
                warn!(program = %self.program, ?args, %err, "container command could not run");
                false
            }
        }
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}
