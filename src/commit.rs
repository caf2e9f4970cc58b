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

//! The irreversible step run when a countdown completes.

use crate::config::CommitConfig;
use crate::error::{ModeSwitchError, Result};
use crate::mode::Mode;
use log::{error, info};
use std::fs::{self, OpenOptions};
use std::process::{Command, Stdio};

/// Applies a mode. Expected to end the current process, so the caller never
/// waits for or inspects an outcome; implementations log their own failures.
pub trait CommitAction: Send + Sync {
    fn commit(&self, target: Mode);
}

impl<F> CommitAction for F
where
    F: Fn(Mode) + Send + Sync,
{
    fn commit(&self, target: Mode) {
        self(target)
    }
}

/// Writes the boot-mode flag file and restarts the host service.
#[derive(Debug, Clone)]
pub struct RestartCommit {
    config: CommitConfig,
}

impl RestartCommit {
    pub fn new(config: CommitConfig) -> Self {
        Self { config }
    }

    fn write_flag(&self, target: Mode) -> Result<()> {
        let path = self.config.flag_path(target);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        info!("Boot flag written to {}", path.display());
        Ok(())
    }

    fn spawn_restart(&self) -> Result<()> {
        let (program, args) = self
            .config
            .restart_command
            .split_first()
            .ok_or_else(|| ModeSwitchError::InvalidConfig("empty restart command".to_string()))?;

        let resolved = which::which(program).map_err(|e| {
            ModeSwitchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("restart program '{program}' not found: {e}"),
            ))
        })?;

        // Not waited on: the restart takes this process down with it.
        Command::new(&resolved)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        info!("Spawned {} {}", resolved.display(), args.join(" "));
        Ok(())
    }
}

impl CommitAction for RestartCommit {
    fn commit(&self, target: Mode) {
        if let Err(e) = self.write_flag(target) {
            // Restarting without the flag would boot back into the old mode.
            error!("Failed to write boot flag for {target}: {e}");
            return;
        }
        if let Err(e) = self.spawn_restart() {
            error!("Failed to restart into {target}: {e}");
        }
    }
}

/// Logs the target mode instead of restarting anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunCommit;

impl CommitAction for DryRunCommit {
    fn commit(&self, target: Mode) {
        info!("Dry run: would restart into {target}");
    }
}
