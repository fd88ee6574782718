use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use crate::{BackendBinder, BackendConfig, BackendResult, BinderState, LaunchPlan, StopOutcome};

/// Ties a [`BackendBinder`] to the host application's startup and shutdown
/// events. Shutdown stops the backend once, however many exit events arrive.
#[derive(Debug, Default)]
pub struct RunLoopBinding {
    binder: Mutex<BackendBinder>,
    shutdown_done: AtomicBool,
}

impl RunLoopBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BinderState {
        self.lock_binder().state()
    }

    /// Best-effort backend launch. Every failure is logged and swallowed so
    /// the UI starts regardless.
    pub fn on_startup<F>(&self, config: &BackendConfig, log: F) -> Option<u32>
    where
        F: Fn(&str),
    {
        if !config.auto_start {
            log("backend auto-start is disabled; skipping backend launch");
            return None;
        }

        let plan = match LaunchPlan::resolve(config) {
            Ok(plan) => plan,
            Err(error) => {
                log(&format!("backend launch skipped: {error}"));
                return None;
            }
        };
        self.start_plan(&plan, log).ok()
    }

    /// Starts `plan`. A successful start re-arms shutdown, so a backend
    /// launched after an earlier shutdown is still stopped by the next one.
    pub fn start_plan<F>(&self, plan: &LaunchPlan, log: F) -> BackendResult<u32>
    where
        F: Fn(&str),
    {
        log(&format!("starting backend: {:?}", plan.debug_command()));
        let result = {
            let mut binder = self.lock_binder();
            let result = binder.start(plan);
            if result.is_ok() {
                self.shutdown_done.store(false, Ordering::Release);
            }
            result
        };
        match &result {
            Ok(pid) => log(&format!("backend started (pid {pid})")),
            Err(error) => log(&format!("backend start failed: {error}")),
        }
        result
    }

    /// Stops the backend on the first call after a start and returns `None`
    /// afterwards.
    pub fn on_shutdown<F>(&self, log: F) -> Option<StopOutcome>
    where
        F: Fn(&str),
    {
        if self.shutdown_done.swap(true, Ordering::AcqRel) {
            return None;
        }

        let outcome = self.lock_binder().stop();
        match &outcome {
            StopOutcome::NotRunning => log("no backend process to stop"),
            StopOutcome::Terminated { pid } => log(&format!("backend terminated (pid {pid})")),
            StopOutcome::AlreadyExited { pid, status } => log(&format!(
                "backend had already exited before shutdown (pid {pid}): {status}"
            )),
            StopOutcome::TerminationFailed { pid, reason } => log(&format!(
                "failed to terminate backend (pid {pid}): {reason}"
            )),
        }
        Some(outcome)
    }

    fn lock_binder(&self) -> MutexGuard<'_, BackendBinder> {
        self.binder.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct ShutdownGuard<'a, F>
where
    F: Fn(&str) + Copy,
{
    binding: &'a RunLoopBinding,
    log: F,
}

impl<F> Drop for ShutdownGuard<'_, F>
where
    F: Fn(&str) + Copy,
{
    fn drop(&mut self) {
        self.binding.on_shutdown(self.log);
    }
}

/// Starts the backend, runs `run_loop`, then stops the backend.
///
/// The stop also happens when `run_loop` unwinds.
pub fn run_bound<F, L, R>(binding: &RunLoopBinding, plan: &LaunchPlan, log: L, run_loop: F) -> R
where
    F: FnOnce() -> R,
    L: Fn(&str) + Copy,
{
    let _ = binding.start_plan(plan, log);
    let _guard = ShutdownGuard { binding, log };
    run_loop()
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf};

    use super::*;

    fn disabled_config() -> BackendConfig {
        BackendConfig {
            auto_start: false,
            path_override: Some(PathBuf::from("/definitely/not/here/memordo_ai_backend")),
            extra_args: Vec::new(),
            cwd: None,
            capture_output: false,
            root_dir: None,
        }
    }

    #[test]
    fn on_startup_respects_disabled_auto_start() {
        let binding = RunLoopBinding::new();
        let lines = RefCell::new(Vec::new());

        let pid = binding.on_startup(&disabled_config(), |line| {
            lines.borrow_mut().push(line.to_string())
        });

        assert_eq!(pid, None);
        assert_eq!(binding.state(), BinderState::Idle);
        assert!(lines.borrow()[0].contains("auto-start is disabled"));
    }

    #[test]
    fn on_startup_swallows_spawn_failure() {
        let binding = RunLoopBinding::new();
        let mut config = disabled_config();
        config.auto_start = true;
        let lines = RefCell::new(Vec::new());

        let pid = binding.on_startup(&config, |line| lines.borrow_mut().push(line.to_string()));

        assert_eq!(pid, None);
        assert_eq!(binding.state(), BinderState::Idle);
        assert!(lines
            .borrow()
            .iter()
            .any(|line| line.starts_with("backend start failed")));
    }

    #[test]
    fn on_shutdown_runs_exactly_once() {
        let binding = RunLoopBinding::new();

        assert_eq!(binding.on_shutdown(|_| {}), Some(StopOutcome::NotRunning));
        assert_eq!(binding.on_shutdown(|_| {}), None);
        assert_eq!(binding.on_shutdown(|_| {}), None);
    }

    #[test]
    fn run_bound_stops_after_run_loop_even_when_start_failed() {
        let binding = RunLoopBinding::new();
        let plan = LaunchPlan::new("/definitely/not/here/memordo_ai_backend");

        let state_inside = run_bound(&binding, &plan, |_| {}, || binding.state());

        assert_eq!(state_inside, BinderState::Idle);
        assert_eq!(binding.on_shutdown(|_| {}), None);
    }

    #[cfg(unix)]
    mod unix {
        use std::panic::{self, AssertUnwindSafe};

        use super::*;
        use crate::process_control::tests::is_process_alive;

        fn sleeper() -> LaunchPlan {
            LaunchPlan::new("sleep").with_args(["30"])
        }

        #[test]
        fn run_bound_starts_before_run_loop_and_stops_after() {
            let binding = RunLoopBinding::new();

            let pid = run_bound(&binding, &sleeper(), |_| {}, || match binding.state() {
                BinderState::Running { pid } => {
                    assert!(is_process_alive(pid));
                    pid
                }
                BinderState::Idle => panic!("backend should be running inside the run loop"),
            });

            assert_eq!(binding.state(), BinderState::Idle);
            assert!(!is_process_alive(pid));
            assert_eq!(binding.on_shutdown(|_| {}), None);
        }

        #[test]
        fn run_bound_stops_backend_when_run_loop_panics() {
            let binding = RunLoopBinding::new();
            let observed_pid = std::sync::Mutex::new(None);

            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                run_bound(&binding, &sleeper(), |_| {}, || {
                    if let BinderState::Running { pid } = binding.state() {
                        *observed_pid.lock().expect("pid lock") = Some(pid);
                    }
                    panic!("run loop crashed");
                })
            }));

            assert!(result.is_err());
            let pid = observed_pid
                .lock()
                .expect("pid lock")
                .expect("backend was running inside the run loop");
            assert_eq!(binding.state(), BinderState::Idle);
            assert!(!is_process_alive(pid));
        }

        #[test]
        fn backend_started_after_shutdown_is_stopped_by_next_shutdown() {
            let binding = RunLoopBinding::new();
            assert_eq!(binding.on_shutdown(|_| {}), Some(StopOutcome::NotRunning));

            let pid = binding
                .start_plan(&sleeper(), |_| {})
                .expect("sleep should start after shutdown");

            assert_eq!(
                binding.on_shutdown(|_| {}),
                Some(StopOutcome::Terminated { pid })
            );
            assert_eq!(binding.state(), BinderState::Idle);
            assert!(!is_process_alive(pid));
            assert_eq!(binding.on_shutdown(|_| {}), None);
        }

        #[test]
        fn failed_start_after_shutdown_keeps_shutdown_done() {
            let binding = RunLoopBinding::new();
            binding.on_shutdown(|_| {});

            binding
                .start_plan(
                    &LaunchPlan::new("/definitely/not/here/memordo_ai_backend"),
                    |_| {},
                )
                .expect_err("missing program cannot start");

            assert_eq!(binding.on_shutdown(|_| {}), None);
        }

        #[test]
        fn on_startup_logs_pid_of_started_backend() {
            let binding = RunLoopBinding::new();
            let config = BackendConfig {
                auto_start: true,
                path_override: Some(PathBuf::from("sleep")),
                extra_args: vec!["30".to_string()],
                cwd: None,
                capture_output: false,
                root_dir: None,
            };
            let lines = RefCell::new(Vec::new());

            let pid = binding
                .on_startup(&config, |line| lines.borrow_mut().push(line.to_string()))
                .expect("sleep should start");

            assert!(lines
                .borrow()
                .contains(&format!("backend started (pid {pid})")));
            assert_eq!(
                binding.on_shutdown(|_| {}),
                Some(StopOutcome::Terminated { pid })
            );
        }

        #[test]
        fn on_shutdown_terminates_started_backend() {
            let binding = RunLoopBinding::new();
            let pid = binding
                .start_plan(&sleeper(), |_| {})
                .expect("sleep should start");

            assert_eq!(
                binding.on_shutdown(|_| {}),
                Some(StopOutcome::Terminated { pid })
            );
            assert!(!is_process_alive(pid));
        }
    }
}
