use super::ProcessResult;
use crate::{Error, Result, config::GeneratorConfig};
use async_trait::async_trait;
use std::{
    ffi::OsString,
    path::PathBuf,
    process::Stdio,
    time::{Duration, Instant},
};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

/// Runs the generator once with the given arguments and reports what it printed.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<ProcessResult>;
}

/// Spawns a real child process per call, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    base_args: Vec<OsString>,
    working_dir: Option<PathBuf>,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            working_dir: None,
            timeout,
        }
    }

    /// Interpreter as the program, script path as its first argument.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut runner = Self::new(config.interpreter.clone(), config.timeout())
            .with_base_args([config.script.clone().into_os_string()]);
        runner.working_dir = config.working_dir.clone();
        runner
    }

    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_inner(&self, args: &[String]) -> Result<ProcessResult> {
        debug!("Spawning {} with args {:?}", self.program, args);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        // Own group, so anything the script leaves behind can be killed with it.
        #[cfg(unix)]
        cmd.process_group(0);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let started = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| Error::launch(format!("failed to start '{}': {}", self.program, e)))?;
        let pid = child.id();

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::internal("child stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::internal("child stderr was not captured"))?;

        // Both pipes are drained while waiting so a chatty child cannot stall on a full buffer.
        let collected = tokio::time::timeout(self.timeout, async {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let (out_read, err_read, status) = tokio::join!(
                stdout.read_to_end(&mut out),
                stderr.read_to_end(&mut err),
                child.wait()
            );
            out_read?;
            err_read?;
            Ok::<_, std::io::Error>((status?, out, err))
        })
        .await;

        match collected {
            Ok(Ok((status, out, err))) => {
                let result = ProcessResult::new(status.code(), out, err);
                debug!(
                    exit_code = ?result.exit_code,
                    stdout_bytes = result.stdout.len(),
                    stderr_bytes = result.stderr.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generator process finished"
                );
                Ok(result)
            }
            Ok(Err(e)) => {
                warn!("Failed to collect output from {}: {}", self.program, e);
                self.terminate(&mut child, pid).await;
                Err(Error::Io(e))
            }
            Err(_) => {
                warn!(
                    "{} did not finish within {:?}, killing it",
                    self.program, self.timeout
                );
                self.terminate(&mut child, pid).await;
                Err(Error::Timeout(self.timeout))
            }
        }
    }

    /// Kills the child's process group, then the child itself unless it was
    /// already reaped.
    async fn terminate(&self, child: &mut Child, pid: Option<u32>) {
        #[cfg(unix)]
        if let Some(pid) = pid {
            kill_process_group(pid);
        }
        #[cfg(not(unix))]
        let _ = pid;

        match child.try_wait() {
            Ok(Some(status)) => debug!("{} already exited with {}", self.program, status),
            _ => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", self.program, e);
                }
            }
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(pgid) = i32::try_from(pid) else {
        warn!(pid = pid, "PID exceeds i32::MAX, cannot signal its process group");
        return;
    };

    // ESRCH just means every member is already gone.
    if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        debug!(pgid = pgid, error = %e, "killpg did not deliver SIGKILL");
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn run(&self, args: &[String]) -> Result<ProcessResult> {
        let span = info_span!("generator", invocation_id = %Uuid::new_v4());
        self.run_inner(args).instrument(span).await
    }
}
