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

use crate::cancellation::{CancellationToken, shutdown_token};
use crate::commit::{CommitAction, DryRunCommit, RestartCommit};
use crate::config::ModeSwitchConfig;
use crate::coordinator::ModeSwitchCoordinator;
use crate::error::Result;
use crate::mode::Mode;
use crate::presenter::{FeedbackPresenter, MemorySurface, SilentPresenter, SnapshotPresenter};
use crate::signals::FilesystemSignalSource;
use crate::watchdog::DebouncedWatchdog;
use log::{info, warn};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SHUTDOWN_CHECK_INTERVAL: Duration = Duration::from_millis(100);

pub struct RunCommand<'a> {
    config: &'a ModeSwitchConfig,
}

impl<'a> RunCommand<'a> {
    pub fn new(config: &'a ModeSwitchConfig) -> Result<Self> {
        Ok(Self { config })
    }

    /// Builds the coordinator for this run. `mode` overrides the configured mode.
    pub fn coordinator(
        &self,
        mode: Option<Mode>,
        dry_run: bool,
        headless: bool,
    ) -> Result<ModeSwitchCoordinator> {
        let presenter: Arc<dyn FeedbackPresenter> = if headless {
            Arc::new(SilentPresenter::new())
        } else {
            Arc::new(SnapshotPresenter::new(
                MemorySurface::new(),
                self.config.display.clone(),
            ))
        };
        let commit: Arc<dyn CommitAction> = if dry_run {
            Arc::new(DryRunCommit)
        } else {
            Arc::new(RestartCommit::new(self.config.commit.clone()))
        };

        let coordinator = ModeSwitchCoordinator::new(self.config, presenter, commit)?;
        match mode.or(self.config.mode) {
            Some(mode) => coordinator.on_ready(mode),
            None => warn!("Current mode unknown; switch requests will be rejected"),
        }
        Ok(coordinator)
    }

    pub fn execute(&self, mode: Option<Mode>, dry_run: bool, headless: bool) -> Result<()> {
        self.execute_until(mode, dry_run, headless, &shutdown_token())
    }

    /// Runs the watchdog until `shutdown` is cancelled.
    pub fn execute_until(
        &self,
        mode: Option<Mode>,
        dry_run: bool,
        headless: bool,
        shutdown: &CancellationToken,
    ) -> Result<()> {
        let coordinator = self.coordinator(mode, dry_run, headless)?;
        let source = Arc::new(FilesystemSignalSource::from_config(&self.config.watchdog));
        let watchdog = DebouncedWatchdog::new(
            source,
            Arc::new(coordinator.clone()),
            self.config.watchdog.poll_interval(),
        )
        .spawn()?;

        info!(
            "modeswitch {} running (restart delay {}s{})",
            env!("CARGO_PKG_VERSION"),
            self.config.restart_delay,
            if dry_run { ", dry run" } else { "" }
        );

        while !shutdown.is_cancelled() {
            thread::sleep(SHUTDOWN_CHECK_INTERVAL);
        }

        info!("Shutting down");
        watchdog.stop();
        if let Some(outcome) = coordinator.shutdown() {
            info!("Countdown ended during shutdown: {outcome:?}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModeSwitchError;
    use crate::signals::{SignalSource, TriggerKind};
    use std::time::Instant;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ModeSwitchConfig {
        let mut config = ModeSwitchConfig {
            restart_delay: 5.0,
            ..Default::default()
        };
        config.watchdog.poll_interval_ms = 20;
        config.watchdog.switch_trigger = dir.path().join("switch");
        config.watchdog.test_trigger = dir.path().join("test");
        config.watchdog.cancel_trigger = dir.path().join("cancel");
        config.commit.flag_dir = dir.path().join("flags");
        config
    }

    #[test]
    fn cli_mode_overrides_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.mode = Some(Mode::Auto);
        let command = RunCommand::new(&config).unwrap();

        let coordinator = command.coordinator(Some(Mode::Manual), true, true).unwrap();
        assert_eq!(coordinator.current_mode(), Some(Mode::Manual));

        let coordinator = command.coordinator(None, true, true).unwrap();
        assert_eq!(coordinator.current_mode(), Some(Mode::Auto));
    }

    #[test]
    fn daemon_consumes_triggers_until_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        let source = FilesystemSignalSource::from_config(&config.watchdog);
        source.assert(TriggerKind::Cancel).unwrap();

        let shutdown = CancellationToken::new();
        let stopper = shutdown.clone();
        let daemon = thread::spawn(move || {
            RunCommand::new(&config)
                .unwrap()
                .execute_until(Some(Mode::Auto), true, false, &shutdown)
        });

        let deadline = Instant::now() + Duration::from_secs(2);
        while source.is_asserted(TriggerKind::Cancel) {
            assert!(Instant::now() < deadline, "trigger never consumed");
            thread::sleep(Duration::from_millis(10));
        }

        stopper.cancel();
        daemon.join().unwrap().unwrap();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.watchdog.ticks_per_second = 0;

        let err = RunCommand::new(&config)
            .unwrap()
            .coordinator(Some(Mode::Auto), true, true)
            .err()
            .unwrap();
        assert!(matches!(err, ModeSwitchError::InvalidConfig(_)));
    }

    #[test]
    fn shutdown_aborts_a_pending_switch() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.restart_delay = 1.0;
        config.commit.restart_command = vec!["true".to_string()];
        let source = FilesystemSignalSource::from_config(&config.watchdog);
        let manual_flag = config.commit.flag_path(Mode::Manual);
        source.assert(TriggerKind::Switch).unwrap();

        let shutdown = CancellationToken::new();
        let stopper = shutdown.clone();
        let daemon = thread::spawn(move || {
            RunCommand::new(&config)
                .unwrap()
                .execute_until(Some(Mode::Auto), false, false, &shutdown)
        });

        let deadline = Instant::now() + Duration::from_secs(2);
        while source.is_asserted(TriggerKind::Switch) {
            assert!(Instant::now() < deadline, "trigger never consumed");
            thread::sleep(Duration::from_millis(10));
        }

        stopper.cancel();
        daemon.join().unwrap().unwrap();

        // Well past the countdown: an orphaned countdown would have committed by now.
        thread::sleep(Duration::from_millis(1500));
        assert!(!manual_flag.exists());
    }
}
