// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job supervisor (component D): spawns the external pipeline script as a
//! supervised child, enforces the concurrency cap, and delivers terminal
//! status. All-async scheduling model (per the redesign directive to pick
//! one and stick to it): `tokio::process::Command` for the child,
//! `tokio::select!`-free sequential draining of its piped stdout/stderr
//! into a single log file and the progress tracker, generalized from the
//! teacher's tmux-pane watcher to a direct pipe consumer.

use crate::allocator::RunNumberAllocator;
use crate::error::SupervisorError;
use crate::tracker::{JobProgressState, ProgressTracker};
use megarg_core::{classify, Clock, Job, JobConfig, JobId, JobOptions, JobStatus};
use megarg_storage::JobStore;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::{HashMap, VecDeque};
use std::os::unix::process::CommandExt as _;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Semaphore};

/// Number of trailing stderr lines kept for a FAILED job's `error_message`.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub script_path: PathBuf,
    pub max_concurrent_jobs: usize,
    pub stop_grace_period: Duration,
}

/// Bookkeeping for a job the supervisor currently owns a child process for.
/// Looked up by [`Supervisor::stop`] to signal the right process group.
struct RunningJob {
    pid: u32,
    stop_requested: AtomicBool,
}

/// Owns every in-flight child process. One instance per daemon process,
/// shared with the HTTP surface behind an `Arc`.
pub struct Supervisor {
    store: Arc<JobStore>,
    allocator: Arc<RunNumberAllocator>,
    clock: Arc<dyn Clock>,
    config: SupervisorConfig,
    tracker: ProgressTracker,
    admission: Arc<Semaphore>,
    running: Arc<std::sync::Mutex<HashMap<String, Arc<RunningJob>>>>,
}

impl Supervisor {
    pub fn new(
        store: Arc<JobStore>,
        allocator: Arc<RunNumberAllocator>,
        clock: Arc<dyn Clock>,
        config: SupervisorConfig,
    ) -> Self {
        let admission = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));
        Self {
            store,
            allocator,
            clock,
            config,
            tracker: ProgressTracker::new(),
            admission,
            running: Arc::new(std::sync::Mutex::new(HashMap::new())),
        }
    }

    /// Spec §4.D `launch`: classify, admit, write the PENDING row, spawn the
    /// child, and transition to RUNNING, all before returning — the caller
    /// sees `status: "RUNNING"` in the same response (S1).
    pub async fn launch(&self, sample_id: String, options: JobOptions) -> Result<Job, SupervisorError> {
        let input_type = classify(&sample_id)
            .ok_or_else(|| SupervisorError::InvalidInput(sample_id.clone()))?;

        let permit = Arc::clone(&self.admission)
            .try_acquire_owned()
            .map_err(|_| SupervisorError::TooManyJobs)?;

        let job = self.store.create_job(JobConfig {
            sample_id,
            input_type,
            options,
        })?;

        match self.spawn_child(&job).await {
            Ok((pid, run_number, output_dir, child, log_path)) => {
                self.store.update_status(
                    &job.id,
                    JobStatus::Running,
                    Some(pid),
                    Some(run_number),
                    Some(output_dir),
                    None,
                    None,
                )?;

                let running_job = Arc::new(RunningJob {
                    pid,
                    stop_requested: AtomicBool::new(false),
                });
                self.running
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .insert(job.id.as_str().to_string(), Arc::clone(&running_job));

                self.spawn_watcher(job.id.clone(), child, log_path, running_job, permit);

                self.store
                    .get(job.id.as_str())
                    .ok_or_else(|| SupervisorError::NotFound(job.id.to_string()))
            }
            Err(spawn_err) => {
                self.store.update_status(
                    &job.id,
                    JobStatus::Failed,
                    None,
                    None,
                    None,
                    None,
                    Some(spawn_err.to_string()),
                )?;
                Err(spawn_err)
            }
        }
    }

    /// Spec §4.D spawn protocol steps 1-3: allocate the run directory,
    /// compose the argument vector, and start the child in its own process
    /// group with stdout/stderr piped.
    async fn spawn_child(
        &self,
        job: &Job,
    ) -> Result<(u32, u32, PathBuf, Child, PathBuf), SupervisorError> {
        let (run_number, output_dir) = self
            .allocator
            .next_run_number(&job.sample_id)
            .map_err(SupervisorError::Spawn)?;

        let logs_dir = output_dir.join("logs");
        std::fs::create_dir_all(&logs_dir).map_err(SupervisorError::Spawn)?;
        let log_path = logs_dir.join(format!("pipeline_{}.log", self.clock.epoch_ms()));

        let script_dir = self
            .config
            .script_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut cmd = Command::new(&self.config.script_path);
        cmd.current_dir(script_dir)
            .arg(&job.sample_id)
            .arg("--prokka-mode")
            .arg(&job.prokka_mode)
            .arg("-t")
            .arg(job.threads.to_string());
        if let Some(genus) = &job.prokka_genus {
            cmd.arg("--prokka-genus").arg(genus);
        }
        if let Some(species) = &job.prokka_species {
            cmd.arg("--prokka-species").arg(species);
        }
        if job.force {
            cmd.arg("--force");
        }
        cmd.process_group(0)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(SupervisorError::Spawn)?;
        let pid = child
            .id()
            .ok_or_else(|| SupervisorError::Spawn(std::io::Error::other("child has no pid")))?;

        Ok((pid, run_number, output_dir, child, log_path))
    }

    /// Spec §4.D spawn protocol steps 3-5, generalized per the redesign
    /// directive: read both piped streams directly (no file-watcher
    /// indirection), mirroring every line into the log file and the
    /// progress tracker, then reap the child and record its terminal
    /// status. Holds no lock across the exit wait.
    fn spawn_watcher(
        &self,
        job_id: JobId,
        mut child: Child,
        log_path: PathBuf,
        running_job: Arc<RunningJob>,
        permit: tokio::sync::OwnedSemaphorePermit,
    ) {
        let store = Arc::clone(&self.store);
        let tracker = self.tracker;
        let running_table = Arc::clone(&self.running);

        tokio::spawn(async move {
            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            let (tx, mut rx) = mpsc::unbounded_channel::<String>();
            if let Some(stdout) = stdout {
                let tx = tx.clone();
                tokio::spawn(drain_lines(stdout, tx));
            }
            if let Some(stderr) = stderr {
                let tx = tx.clone();
                tokio::spawn(drain_lines(stderr, tx));
            }
            drop(tx);

            let mut log_file = match tokio::fs::File::create(&log_path).await {
                Ok(f) => Some(f),
                Err(e) => {
                    tracing::warn!(job_id = %job_id, error = %e, "failed to create pipeline log file");
                    None
                }
            };

            let mut progress = JobProgressState::default();
            let mut stderr_tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);

            while let Some(line) = rx.recv().await {
                if stderr_tail.len() >= STDERR_TAIL_LINES {
                    stderr_tail.pop_front();
                }
                stderr_tail.push_back(line.clone());

                if let Some(file) = log_file.as_mut() {
                    let _ = file.write_all(line.as_bytes()).await;
                    let _ = file.write_all(b"\n").await;
                }

                let (percent, step) = progress.observe_line(&tracker, &line);
                let _ = store.update_progress(&job_id, percent, step, Some(line));
            }
            if let Some(mut file) = log_file {
                let _ = file.flush().await;
            }

            let wait_result = child.wait().await;
            running_table
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .remove(job_id.as_str());
            drop(permit);

            let stop_requested = running_job.stop_requested.load(Ordering::SeqCst);
            match wait_result {
                Ok(status) => {
                    // A process killed by a signal reports no exit code via
                    // `code()`; fall back to the negated signal number, the
                    // common Unix convention (spec §8 S4: "exit_code is the
                    // signal-derived value").
                    let exit_code = status.code().or_else(|| exit_signal(&status));
                    if stop_requested {
                        let _ = store.update_status(
                            &job_id,
                            JobStatus::Stopped,
                            None,
                            None,
                            None,
                            exit_code,
                            Some("stopped by request".to_string()),
                        );
                    } else if exit_code == Some(0) {
                        let _ = store.update_status(
                            &job_id,
                            JobStatus::Completed,
                            None,
                            None,
                            None,
                            exit_code,
                            None,
                        );
                    } else {
                        let message = if stderr_tail.is_empty() {
                            format!("child exited with status: {status}")
                        } else {
                            stderr_tail.iter().cloned().collect::<Vec<_>>().join("\n")
                        };
                        let _ = store.update_status(
                            &job_id,
                            JobStatus::Failed,
                            None,
                            None,
                            None,
                            exit_code,
                            Some(message),
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(job_id = %job_id, error = %e, "failed to reap child");
                    let _ = store.update_status(
                        &job_id,
                        JobStatus::Failed,
                        None,
                        None,
                        None,
                        None,
                        Some(format!("failed to reap child: {e}")),
                    );
                }
            }
        });
    }

    /// Spec §4.D `stop`: idempotent graceful-then-forceful termination of
    /// a RUNNING job's process group.
    pub async fn stop(&self, job_id: &str) -> Result<(), SupervisorError> {
        let job = self
            .store
            .get(job_id)
            .ok_or_else(|| SupervisorError::NotFound(job_id.to_string()))?;

        if job.status.is_terminal() {
            return Err(SupervisorError::AlreadyTerminal);
        }

        let running_job = {
            let table = self
                .running
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            table.get(job.id.as_str()).cloned()
        };

        let Some(running_job) = running_job else {
            // RUNNING in the store but we hold no child handle for it (e.g.
            // after a restart without reconciliation having run yet). Leave
            // reconciliation to do its job; nothing to signal here.
            return Ok(());
        };

        if running_job.stop_requested.swap(true, Ordering::SeqCst) {
            return Ok(()); // already in progress, converges to STOPPED once
        }

        let pgid = Pid::from_raw(-(running_job.pid as i32));
        let _ = signal::kill(pgid, Signal::SIGTERM);

        let grace_period = self.config.stop_grace_period;
        tokio::spawn(async move {
            tokio::time::sleep(grace_period).await;
            // Signal 0 probes liveness without actually sending a signal.
            if signal::kill(pgid, None).is_ok() {
                let _ = signal::kill(pgid, Signal::SIGKILL);
            }
        });

        Ok(())
    }

    /// Service shutdown (spec §5 "Cancellation"): send every currently
    /// running job a graceful termination signal, wait up to `drain` for
    /// them to reap, then force-kill any survivors so the process can exit.
    /// Orphans left behind are cleaned up by `reconcile_on_startup` on next
    /// boot.
    pub async fn shutdown(&self, drain: Duration) {
        let job_ids: Vec<String> = {
            let table = self
                .running
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            table.keys().cloned().collect()
        };

        if job_ids.is_empty() {
            return;
        }

        let pgids: Vec<Pid> = {
            let table = self
                .running
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            job_ids
                .iter()
                .filter_map(|id| table.get(id.as_str()))
                .map(|rj| Pid::from_raw(-(rj.pid as i32)))
                .collect()
        };

        for pgid in &pgids {
            let _ = signal::kill(*pgid, Signal::SIGTERM);
        }

        let deadline = tokio::time::Instant::now() + drain;
        loop {
            let remaining = {
                let table = self
                    .running
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                job_ids.iter().any(|id| table.contains_key(id.as_str()))
            };
            if !remaining || tokio::time::Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        for pgid in &pgids {
            if signal::kill(*pgid, None).is_ok() {
                let _ = signal::kill(*pgid, Signal::SIGKILL);
            }
        }
    }
}

/// Negated signal number that terminated `status`, or `None` if it exited
/// normally (the common Unix convention for a signal-derived exit code).
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| -sig)
}

/// Read `reader` line by line, forwarding each to `tx`, until EOF.
async fn drain_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Ok(None) | Err(_) => break,
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
