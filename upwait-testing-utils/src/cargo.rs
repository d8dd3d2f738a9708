use nix::{
    sys::signal::{self, Signal},
    unistd::{self, Pid},
};
use std::{
    path::PathBuf,
    process::{ExitStatus, Stdio},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
    task::JoinHandle,
};
use tracing::{debug, info};

type SharedPid = Arc<Mutex<Option<Pid>>>;
type SharedLines = Arc<Mutex<Vec<String>>>;

/// Runs a workspace binary through `cargo run`, collecting its stdout.
pub struct CargoBinaryRunner {
    pid: SharedPid,
    stdout: SharedLines,
    handle: Option<JoinHandle<Option<ExitStatus>>>,
}

impl CargoBinaryRunner {
    pub fn new(binary: &str, args: &[&str]) -> Self {
        let pid = SharedPid::default();
        let stdout = SharedLines::default();

        let mut workspace_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        workspace_dir.pop();

        let handle = {
            let name = binary.to_string();
            let binary = binary.to_string();
            let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();

            let pid = pid.clone();
            let stdout_lines = stdout.clone();

            Some(tokio::spawn(async move {
                let mut cargo_process = unsafe {
                    Command::new("cargo")
                        .current_dir(workspace_dir)
                        // Run the specified binary
                        .arg("run")
                        .arg("--quiet")
                        .arg("--bin")
                        .arg(binary)
                        // With the specified arguments
                        .arg("--")
                        .args(args)
                        // Do nothing with stdin
                        .stdin(Stdio::null())
                        // Capture stdout and stderr
                        .stdout(Stdio::piped())
                        .stderr(Stdio::piped())
                        // Call setsid, required for correct exit signal handling
                        .pre_exec(|| {
                            unistd::setsid()?;
                            Ok(())
                        })
                        .spawn()
                        .expect("process should be started")
                };

                // Get and store the PID
                *pid.lock().unwrap() = Some(Pid::from_raw(
                    cargo_process.id().expect("process should have a PID") as i32,
                ));

                let stdout = cargo_process.stdout.take().unwrap();
                let stderr = cargo_process.stderr.take().unwrap();

                let mut stdout_reader = BufReader::new(stdout).lines();
                let mut stderr_reader = BufReader::new(stderr).lines();

                let mut stdout_open = true;
                let mut stderr_open = true;

                // Drain both pipes before reaping so no trailing output is lost
                while stdout_open || stderr_open {
                    tokio::select! {
                        line = stdout_reader.next_line(), if stdout_open => {
                            match line {
                                Ok(Some(line)) => {
                                    debug!("{name} stdout: {line}");
                                    stdout_lines.lock().unwrap().push(line);
                                }
                                _ => stdout_open = false,
                            }
                        }
                        line = stderr_reader.next_line(), if stderr_open => {
                            match line {
                                Ok(Some(line)) => debug!("{name} stderr: {line}"),
                                _ => stderr_open = false,
                            }
                        }
                    }
                }

                let result = cargo_process.wait().await;
                info!("{name} cargo exited, status={result:?}");
                *pid.lock().unwrap() = None;

                result.ok()
            }))
        };

        Self {
            pid,
            stdout,
            handle,
        }
    }

    /// Lines written to stdout so far.
    pub fn stdout(&self) -> Vec<String> {
        self.stdout.lock().unwrap().clone()
    }

    pub fn is_running(&self) -> bool {
        self.pid.lock().unwrap().is_some()
    }

    pub fn stop(&self) {
        const EXIT_SIGNAL: Signal = Signal::SIGINT;

        // Request process to terminate
        if let Some(pid) = *self.pid.lock().unwrap() {
            info!("Sending {} to process", EXIT_SIGNAL);
            let _ = signal::kill(pid, EXIT_SIGNAL);
        }
    }

    /// Wait for the process to exit, giving up after `timeout`.
    pub async fn wait(&mut self, timeout: Duration) -> Option<ExitStatus> {
        let handle = self.handle.as_mut()?;

        let status = tokio::time::timeout(timeout, handle)
            .await
            .expect("process should exit before the timeout")
            .expect("runner task should not panic");

        self.handle = None;
        status
    }
}

impl Drop for CargoBinaryRunner {
    fn drop(&mut self) {
        self.stop();
    }
}
