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

use crate::error::{ModeSwitchError, Result};
use crate::mode::Mode;
use crate::signals::TriggerKind;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "modeswitch";
const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "MODESWITCH";

pub const DEFAULT_RESTART_DELAY_SECS: f64 = 5.0;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_TICKS_PER_SECOND: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSwitchConfig {
    /// Seconds between an accepted switch and the restart.
    pub restart_delay: f64,

    /// Mode the host is running in when the daemon starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    pub watchdog: WatchdogConfig,
    pub display: DisplayConfig,
    pub commit: CommitConfig,
}

impl Default for ModeSwitchConfig {
    fn default() -> Self {
        Self {
            restart_delay: DEFAULT_RESTART_DELAY_SECS,
            mode: None,
            watchdog: WatchdogConfig::default(),
            display: DisplayConfig::default(),
            commit: CommitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    pub poll_interval_ms: u64,
    pub ticks_per_second: u32,
    pub switch_trigger: PathBuf,
    pub test_trigger: PathBuf,
    pub cancel_trigger: PathBuf,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            switch_trigger: PathBuf::from("/tmp/pwn_switch_request"),
            test_trigger: PathBuf::from("/tmp/pwn_ui_test"),
            cancel_trigger: PathBuf::from("/tmp/pwn_cancel"),
        }
    }
}

impl WatchdogConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn trigger_path(&self, kind: TriggerKind) -> &Path {
        match kind {
            TriggerKind::Switch => &self.switch_trigger,
            TriggerKind::Test => &self.test_trigger,
            TriggerKind::Cancel => &self.cancel_trigger,
        }
    }
}

/// Presentation parameters for the transient view. Passed through to the
/// presenter untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub face: String,
    pub face_x: i32,
    pub face_y: i32,
    pub face_size: u32,
    pub msg: String,
    pub msg_x: i32,
    pub msg_y: i32,
    pub msg_size: u32,
    pub abort_msg: String,
    pub abort_x: i32,
    pub abort_y: i32,
    pub abort_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            face: "( Z_Z )".to_string(),
            face_x: 55,
            face_y: 15,
            face_size: 35,
            msg: "REBOOTING TO\n    {mode}".to_string(),
            msg_x: 45,
            msg_y: 65,
            msg_size: 20,
            abort_msg: "Click again to Cancel".to_string(),
            abort_x: 50,
            abort_y: 105,
            abort_size: 12,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Directory holding the boot-mode flag files.
    pub flag_dir: PathBuf,
    pub auto_flag: String,
    pub manual_flag: String,
    /// Program and arguments that restart the host service.
    pub restart_command: Vec<String>,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            flag_dir: PathBuf::from("/root"),
            auto_flag: ".pwnagotchi-auto".to_string(),
            manual_flag: ".pwnagotchi-manu".to_string(),
            restart_command: vec![
                "systemctl".to_string(),
                "restart".to_string(),
                "pwnagotchi".to_string(),
            ],
        }
    }
}

impl CommitConfig {
    pub fn flag_path(&self, mode: Mode) -> PathBuf {
        let name = match mode {
            Mode::Auto => &self.auto_flag,
            Mode::Manual => &self.manual_flag,
        };
        self.flag_dir.join(name)
    }
}

/// Default location of the config file, `<config dir>/modeswitch/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl ModeSwitchConfig {
    /// Loads defaults, then the TOML file, then `MODESWITCH_*` environment
    /// variables (`__` separates nested keys, e.g. `MODESWITCH_WATCHDOG__POLL_INTERVAL_MS`).
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit_path {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (default_config_path(), false),
        };

        let mut builder = Config::builder();
        if let Some(path) = &path {
            log::debug!("Reading config from {path:?} (required: {required})");
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ModeSwitchConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.restart_delay.is_finite() || self.restart_delay < 0.0 {
            return Err(ModeSwitchError::InvalidConfig(format!(
                "restart_delay must be a non-negative number of seconds, got {}",
                self.restart_delay
            )));
        }
        if self.watchdog.ticks_per_second == 0 {
            return Err(ModeSwitchError::InvalidConfig(
                "watchdog.ticks_per_second must be at least 1".to_string(),
            ));
        }
        if self.watchdog.poll_interval_ms == 0 {
            return Err(ModeSwitchError::InvalidConfig(
                "watchdog.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.commit.restart_command.is_empty() {
            return Err(ModeSwitchError::InvalidConfig(
                "commit.restart_command must name a program".to_string(),
            ));
        }
        Ok(())
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs_f64(self.restart_delay)
    }

    /// Number of cancellation checks the countdown performs.
    pub fn countdown_steps(&self) -> u64 {
        (self.restart_delay * f64::from(self.watchdog.ticks_per_second)).floor() as u64
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.watchdog.ticks_per_second))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ModeSwitchError::ConfigError(format!("Failed to serialize config: {e}")))
    }
}
