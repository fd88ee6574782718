use std::{
    path::{Path, PathBuf},
    process::{Child, ExitStatus},
};

use crate::{process_control, BackendError, BackendResult, LaunchPlan};

#[derive(Debug)]
struct TrackedChild {
    child: Child,
    pid: u32,
    program: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinderState {
    Idle,
    Running { pid: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    NotRunning,
    Terminated { pid: u32 },
    /// The child had already exited before `stop` was called.
    AlreadyExited { pid: u32, status: ExitStatus },
    /// The kill request failed. The handle is released anyway.
    TerminationFailed { pid: u32, reason: String },
}

/// Owns the single backend child process of a desktop session.
///
/// `start` launches the companion headless and keeps its handle; `stop`
/// force-terminates it and releases the handle. A binder dropped while a
/// child is tracked stops that child.
#[derive(Debug, Default)]
pub struct BackendBinder {
    child: Option<TrackedChild>,
}

impl BackendBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BinderState {
        match &self.child {
            Some(tracked) => BinderState::Running { pid: tracked.pid },
            None => BinderState::Idle,
        }
    }

    pub fn tracked_program(&self) -> Option<&Path> {
        self.child.as_ref().map(|tracked| tracked.program.as_path())
    }

    /// Launches `plan` and tracks the new child.
    ///
    /// While a tracked child is still alive the call is rejected with
    /// [`BackendError::AlreadyRunning`] and the existing handle is kept. A
    /// tracked child that already exited on its own is reaped and replaced.
    pub fn start(&mut self, plan: &LaunchPlan) -> BackendResult<u32> {
        if let Some(tracked) = self.child.as_mut() {
            match tracked.child.try_wait() {
                Ok(Some(_)) => {
                    self.child = None;
                }
                Ok(None) | Err(_) => {
                    return Err(BackendError::AlreadyRunning { pid: tracked.pid });
                }
            }
        }

        let child = process_control::spawn_headless(plan)?;
        let pid = child.id();
        self.child = Some(TrackedChild {
            child,
            pid,
            program: plan.program.clone(),
        });
        Ok(pid)
    }

    /// Force-terminates the tracked child, if any, and returns to `Idle`.
    ///
    /// The child is reaped only after a successful kill request so a process
    /// that refused to die cannot block shutdown.
    pub fn stop(&mut self) -> StopOutcome {
        let Some(mut tracked) = self.child.take() else {
            return StopOutcome::NotRunning;
        };
        let pid = tracked.pid;

        if let Ok(Some(status)) = tracked.child.try_wait() {
            return StopOutcome::AlreadyExited { pid, status };
        }

        match process_control::terminate_child(&mut tracked.child) {
            Ok(()) => {
                let _ = tracked.child.wait();
                StopOutcome::Terminated { pid }
            }
            Err(error) => StopOutcome::TerminationFailed {
                pid,
                reason: error.to_string(),
            },
        }
    }
}

impl Drop for BackendBinder {
    fn drop(&mut self) {
        self.stop();
    }
}
