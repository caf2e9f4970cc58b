// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Serializes switch, test and cancel requests from every trigger source.
//!
//! All decisions about `pending` happen inside one mutex. The countdown
//! thread only reads the cancellation token while ticking and takes the
//! mutex again solely to roll back after an abort.


use crate::cancellation::CancellationToken;
use crate::commit::CommitAction;
use crate::config::ModeSwitchConfig;
use crate::countdown::{CancellableCountdown, CountdownOutcome};
use crate::error::{ModeSwitchError, Result};
use crate::mode::Mode;
use crate::presenter::{FeedbackPresenter, TEST_LABEL};
use crate::signals::{TriggerEvent, TriggerKind};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const COUNTDOWN_THREAD_NAME: &str = "modeswitch-countdown";
const SHUTDOWN_ORIGIN: &str = "Shutdown";

/// Receives trigger events and answers with a status line.
pub trait TriggerHandler: Send + Sync {
    fn handle(&self, event: TriggerEvent) -> String;
}

#[derive(Debug, Default)]
struct SwitchState {
    pending: bool,
    test_running: bool,
    current_mode: Option<Mode>,
    countdown: Option<JoinHandle<CountdownOutcome>>,
}

struct Shared {
    state: Mutex<SwitchState>,
    cancel: CancellationToken,
    presenter: Arc<dyn FeedbackPresenter>,
    commit: Arc<dyn CommitAction>,
    restart_delay_secs: f64,
    steps: u64,
    tick: Duration,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, SwitchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Undo a switch whose countdown was aborted.
    fn rollback(&self) {
        let mut state = self.lock_state();
        self.presenter.restore();
        state.pending = false;
    }
}

/// Clears `test_running` however the UI test ends.
struct TestCycle<'a> {
    shared: &'a Shared,
}

impl Drop for TestCycle<'_> {
    fn drop(&mut self) {
        self.shared.lock_state().test_running = false;
    }
}

/// Coordinates mode switches for one device. Clones share the same state.
#[derive(Clone)]
pub struct ModeSwitchCoordinator {
    inner: Arc<Shared>,
}

impl ModeSwitchCoordinator {
    /// Fails with [`ModeSwitchError::InvalidConfig`] when the delay or tick
    /// rate cannot drive a countdown.
    pub fn new(
        config: &ModeSwitchConfig,
        presenter: Arc<dyn FeedbackPresenter>,
        commit: Arc<dyn CommitAction>,
    ) -> Result<Self> {
        config.validate()?;

        let state = SwitchState {
            current_mode: config.mode,
            ..Default::default()
        };
        Ok(Self {
            inner: Arc::new(Shared {
                state: Mutex::new(state),
                cancel: CancellationToken::new(),
                presenter,
                commit,
                restart_delay_secs: config.restart_delay,
                steps: config.countdown_steps(),
                tick: config.tick_interval(),
            }),
        })
    }

    /// Records the mode the host reports once it is ready.
    pub fn on_ready(&self, mode: Mode) {
        info!("Host ready in {mode} mode");
        self.inner.lock_state().current_mode = Some(mode);
    }

    pub fn current_mode(&self) -> Option<Mode> {
        self.inner.lock_state().current_mode
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock_state().pending
    }

    pub fn is_test_running(&self) -> bool {
        self.inner.lock_state().test_running
    }

    /// Starts the countdown to the other mode.
    ///
    /// Of any number of concurrent callers exactly one succeeds; the rest
    /// get [`ModeSwitchError::AlreadyPending`] immediately.
    pub fn request_switch(&self, origin: &str) -> Result<String> {
        let mut state = self.inner.lock_state();
        let current = state.current_mode.ok_or(ModeSwitchError::NotReady)?;
        if state.pending {
            return Err(ModeSwitchError::AlreadyPending);
        }
        if state.test_running {
            return Err(ModeSwitchError::TestInProgress);
        }

        state.pending = true;
        self.inner.cancel.reset();

        let target = current.other();
        let delay = self.inner.restart_delay_secs;
        info!("[{origin}] Switching {current} -> {target} in {delay}s");

        self.inner.presenter.show_transient(target.as_str());

        let countdown = CancellableCountdown::new(
            self.inner.steps,
            self.inner.tick,
            self.inner.cancel.clone(),
        );
        let shared = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name(COUNTDOWN_THREAD_NAME.to_string())
            .spawn(move || {
                countdown.run(|| shared.commit.commit(target), || shared.rollback())
            });

        match spawned {
            Ok(handle) => {
                state.countdown = Some(handle);
                Ok(format!(
                    "Restarting into {target} in {delay} seconds... (Trigger 'cancel' to abort)"
                ))
            }
            Err(e) => {
                error!("[{origin}] Could not start countdown: {e}");
                self.inner.presenter.restore();
                state.pending = false;
                Err(ModeSwitchError::CountdownSpawn(e))
            }
        }
    }

    /// Shows the transient view for the configured delay, then restores it.
    ///
    /// Blocks the caller for the whole delay and cannot be cancelled.
    pub fn request_test(&self, origin: &str) -> Result<String> {
        let _cycle = {
            let mut state = self.inner.lock_state();
            if state.pending {
                return Err(ModeSwitchError::SwitchInProgress);
            }
            if state.test_running {
                return Err(ModeSwitchError::TestInProgress);
            }
            state.test_running = true;
            TestCycle {
                shared: &*self.inner,
            }
        };

        info!("[{origin}] Running UI Test...");
        self.inner.presenter.show_transient(TEST_LABEL);
        thread::sleep(Duration::from_secs_f64(self.inner.restart_delay_secs));
        self.inner.presenter.restore();

        Ok("Test complete. Restoring UI.".to_string())
    }

    /// Asks the running countdown to abort. Harmless to repeat.
    pub fn request_cancel(&self, origin: &str) -> Result<String> {
        let state = self.inner.lock_state();
        if !state.pending {
            return Ok("Nothing to cancel.".to_string());
        }

        info!("[{origin}] Cancel signal received! Aborting restart.");
        self.inner.cancel.cancel();
        Ok("Cancellation signal sent.".to_string())
    }

    /// Maps a webhook-style command path to a request.
    pub fn handle_command(&self, command: &str, origin: &str) -> String {
        match TriggerKind::from_command(command) {
            Some(kind) => self.handle(TriggerEvent::new(kind, origin)),
            None => "Unknown command.".to_string(),
        }
    }

    /// Waits for the current countdown thread, if one was started and not yet joined.
    pub fn wait_for_countdown(&self) -> Option<CountdownOutcome> {
        let handle = self.inner.lock_state().countdown.take()?;
        match handle.join() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                error!("Countdown thread panicked");
                None
            }
        }
    }

    /// Aborts a pending switch and joins its countdown, so the display is
    /// restored before the process exits. A countdown that already
    /// completed is only joined.
    pub fn shutdown(&self) -> Option<CountdownOutcome> {
        match self.request_cancel(SHUTDOWN_ORIGIN) {
            Ok(status) => debug!("[{SHUTDOWN_ORIGIN}] {status}"),
            Err(e) => warn!("[{SHUTDOWN_ORIGIN}] cancel failed: {e}"),
        }
        self.wait_for_countdown()
    }
}

impl TriggerHandler for ModeSwitchCoordinator {
    fn handle(&self, event: TriggerEvent) -> String {
        let TriggerEvent { kind, origin } = event;
        let result = match kind {
            TriggerKind::Switch => self.request_switch(&origin),
            TriggerKind::Test => self.request_test(&origin),
            TriggerKind::Cancel => self.request_cancel(&origin),
        };

        match result {
            Ok(message) => message,
            Err(e) if e.is_rejection() => {
                info!("[{origin}] {kind} rejected: {e}");
                e.to_string()
            }
            Err(e) => {
                warn!("[{origin}] {kind} failed: {e}");
                e.to_string()
            }
        }
    }
}
