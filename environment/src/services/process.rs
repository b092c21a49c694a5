//! Child process supervision for the managed services
//!
//! Spawns a service's start script, forwards its output into tracing, waits
//! until the service answers its readiness probe, and terminates it
//! gracefully on stop.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use shared::{service_debug, service_error, service_warn, ServiceId};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{EnvironmentError, EnvironmentResult};

const PROBE_INTERVAL: Duration = Duration::from_millis(250);
const HTTP_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// How to tell that a spawned service accepts connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessProbe {
    /// A TCP connect to `host:port` succeeds
    Tcp(String),
    /// A GET on the URL answers with a success status
    Http(String),
}

impl ReadinessProbe {
    pub async fn check(&self) -> bool {
        match self {
            ReadinessProbe::Tcp(address) => TcpStream::connect(address.as_str()).await.is_ok(),
            ReadinessProbe::Http(url) => {
                let client = match reqwest::Client::builder().timeout(HTTP_PROBE_TIMEOUT).build() {
                    Ok(client) => client,
                    Err(_) => return false,
                };
                match client.get(url).send().await {
                    Ok(response) => response.status().is_success(),
                    Err(_) => false,
                }
            }
        }
    }
}

/// One supervised child process
pub struct ManagedProcess {
    id: ServiceId,
    probe: ReadinessProbe,
    startup_timeout: Duration,
    shutdown_grace: Duration,
    child: Mutex<Option<Child>>,
}

impl ManagedProcess {
    pub fn new(id: ServiceId, probe: ReadinessProbe, startup_timeout: Duration, shutdown_grace: Duration) -> Self {
        Self {
            id,
            probe,
            startup_timeout,
            shutdown_grace,
            child: Mutex::new(None),
        }
    }

    pub fn probe(&self) -> &ReadinessProbe {
        &self.probe
    }

    /// Check if the process is still running
    pub async fn is_running(&self) -> bool {
        let mut guard = self.child.lock().await;
        match guard.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(_)) | Err(_) => {
                    *guard = None;
                    false
                }
            },
            None => false,
        }
    }

    /// Spawn `command` and wait until the readiness probe succeeds
    ///
    /// Does nothing when the process is already running. A process that
    /// exits early or misses the startup timeout is killed and reported as
    /// an error.
    pub async fn spawn(&self, mut command: Command) -> EnvironmentResult<()> {
        let mut guard = self.child.lock().await;
        if let Some(child) = guard.as_mut() {
            if let Ok(None) = child.try_wait() {
                return Ok(());
            }
        }

        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| EnvironmentError::start(self.id, format!("spawn failed: {e}")))?;

        service_debug!(self.id, "Spawned process (PID: {})", child.id().unwrap_or(0));

        if let Some(stdout) = child.stdout.take() {
            forward_output(self.id, stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_output(self.id, stderr);
        }

        match self.wait_ready(&mut child).await {
            Ok(()) => {
                *guard = Some(child);
                Ok(())
            }
            Err(e) => {
                service_error!(self.id, "❌ Startup failed: {}", e);
                let _ = child.kill().await;
                Err(e)
            }
        }
    }

    async fn wait_ready(&self, child: &mut Child) -> EnvironmentResult<()> {
        let deadline = Instant::now() + self.startup_timeout;

        loop {
            if let Some(status) = child.try_wait()? {
                let reason = format!("exited during startup ({})", describe_exit(status));
                return Err(EnvironmentError::start(self.id, reason));
            }
            if self.probe.check().await {
                service_debug!(self.id, "Ready ({:?})", self.probe);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(EnvironmentError::StartupTimeout {
                    service: self.id,
                    timeout: self.startup_timeout,
                });
            }
            sleep(PROBE_INTERVAL).await;
        }
    }

    /// Terminate the process: SIGTERM first, kill after the grace period
    ///
    /// Does nothing when no process is running.
    pub async fn terminate(&self) -> EnvironmentResult<()> {
        let Some(mut child) = self.child.lock().await.take() else {
            return Ok(());
        };

        if child.try_wait()?.is_some() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            if let Err(e) = terminate_gracefully(&child) {
                service_warn!(self.id, "⚠️ Failed to terminate gracefully: {}", e);
            }
        }

        match tokio::time::timeout(self.shutdown_grace, child.wait()).await {
            Ok(Ok(status)) => {
                service_debug!(self.id, "Process exited ({})", status);
                Ok(())
            }
            Ok(Err(e)) => {
                service_error!(self.id, "❌ Waiting for exit failed: {}", e);
                Err(EnvironmentError::stop(self.id, e.to_string()))
            }
            Err(_) => {
                service_warn!(self.id, "🔨 Force killing after {:?}", self.shutdown_grace);
                child
                    .kill()
                    .await
                    .map_err(|e| EnvironmentError::stop(self.id, e.to_string()))
            }
        }
    }
}

#[cfg(unix)]
fn terminate_gracefully(child: &Child) -> nix::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM),
        None => Ok(()),
    }
}

/// Forward child output line by line at debug level
///
/// Also keeps the child from blocking on a full pipe.
fn forward_output<R>(id: ServiceId, stream: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            service_debug!(id, "{}", line);
        }
    });
}

/// Human readable exit status
pub fn describe_exit(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
