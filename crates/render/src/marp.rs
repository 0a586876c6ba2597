//! Marp CLI render backend.
//!
//! Each export writes the document to a scratch directory, runs the Marp
//! command line once, and reads the produced file back. Runs are one-shot:
//! no retries, and a run that exceeds the timeout is killed.

use crate::format::ExportFormat;
use crate::renderer::Renderer;
use deck_core::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running render is checked for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Settings for the Marp backend.
#[derive(Debug, Clone)]
pub struct MarpConfig {
    /// Program and leading arguments, e.g. `["npx", "@marp-team/marp-cli"]`.
    pub command: Vec<String>,

    /// Kill the tool after this long.
    pub timeout: Duration,

    /// PPTX and PDF need a headless browser; deployments without one turn
    /// this off so binary exports fail fast.
    pub can_render_binary: bool,

    /// Let slides reference local images.
    pub allow_local_files: bool,
}

impl Default for MarpConfig {
    fn default() -> Self {
        Self {
            command: vec!["npx".to_string(), "@marp-team/marp-cli".to_string()],
            timeout: Duration::from_secs(120),
            can_render_binary: true,
            allow_local_files: false,
        }
    }
}

impl MarpConfig {
    /// Parse a whitespace-separated command line.
    pub fn with_command_line(mut self, command_line: &str) -> Result<Self> {
        let command: Vec<String> = command_line.split_whitespace().map(str::to_string).collect();
        if command.is_empty() {
            return Err(Error::Config("render command is empty".to_string()));
        }
        self.command = command;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_binary_rendering(mut self, enabled: bool) -> Self {
        self.can_render_binary = enabled;
        self
    }

    pub fn with_local_files(mut self, allowed: bool) -> Self {
        self.allow_local_files = allowed;
        self
    }
}

/// Renders documents by invoking the Marp CLI.
#[derive(Debug, Clone, Default)]
pub struct MarpRenderer {
    config: MarpConfig,
}

impl MarpRenderer {
    pub fn new(config: MarpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarpConfig {
        &self.config
    }

    /// Build the tool invocation for one export.
    fn command(&self, input: &Path, output: &Path, format: ExportFormat) -> Result<Command> {
        let (program, leading) = self
            .config
            .command
            .split_first()
            .ok_or_else(|| Error::Config("render command is empty".to_string()))?;

        let mut command = Command::new(program);
        command.args(leading).arg(input);
        if let Some(flag) = format.marp_flag() {
            command.arg(flag);
        }
        if self.config.allow_local_files {
            command.arg("--allow-local-files");
        }
        command
            .arg("-o")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        Ok(command)
    }

    /// Wait for the child, killing it once the timeout passes.
    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus> {
        let deadline = Instant::now() + self.config.timeout;

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                log::warn!("Render exceeded {:?}; killing tool", self.config.timeout);
                // The process may already be gone.
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::RenderTimeout(self.config.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Drain a pipe on a background thread so the tool never blocks on a full buffer.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            let mut bytes = Vec::new();
            if pipe.read_to_end(&mut bytes).is_ok() {
                text = String::from_utf8_lossy(&bytes).into_owned();
            }
        }
        text
    })
}

impl Renderer for MarpRenderer {
    fn render(&self, document: &str, format: ExportFormat) -> Result<Vec<u8>> {
        if format.is_binary() && !self.config.can_render_binary {
            return Err(Error::CapabilityUnavailable(format!(
                "{} export is disabled in this environment",
                format
            )));
        }

        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("slides.md");
        let output = workdir.path().join(format!("slides.{}", format.extension()));
        fs::write(&input, document)?;

        let mut command = self.command(&input, &output, format)?;
        log::info!("Rendering {} with {:?}", format, self.config.command);

        let mut child = command.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::CapabilityUnavailable(format!(
                "render tool '{}' not found",
                self.config.command.first().map(String::as_str).unwrap_or_default()
            )),
            _ => Error::Io(e),
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = self.wait_with_timeout(&mut child)?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let diagnostics = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(Error::Render {
                status: status.code(),
                diagnostics: diagnostics.trim().to_string(),
            });
        }

        match fs::read(&output) {
            Ok(bytes) => {
                log::debug!("Rendered {} bytes of {}", bytes.len(), format);
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::Render {
                status: status.code(),
                diagnostics: format!("tool exited without writing {}", output.display()),
            }),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn can_render_binary(&self) -> bool {
        self.config.can_render_binary
    }
}
