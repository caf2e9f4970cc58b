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

//! Shared fixtures: an isolated directory holding trigger files, boot flags
//! and a config.toml that points at them.

use modeswitch::commit::CommitAction;
use modeswitch::mode::Mode;
use modeswitch::presenter::{ElementDefinition, MemorySurface};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[allow(dead_code)]
pub struct Sandbox {
    dir: TempDir,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create sandbox directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn trigger(&self, name: &str) -> PathBuf {
        self.path().join("triggers").join(name)
    }

    pub fn flags(&self) -> PathBuf {
        self.path().join("flags")
    }

    /// Writes config.toml with the given top-level settings plus sandboxed paths.
    pub fn write_config(&self, top_level: &str) -> PathBuf {
        let path = self.path().join("config.toml");
        let contents = format!(
            r#"{top_level}

[watchdog]
poll_interval_ms = 20
switch_trigger = "{switch}"
test_trigger = "{test}"
cancel_trigger = "{cancel}"

[commit]
flag_dir = "{flags}"
restart_command = ["true"]
"#,
            switch = toml_path(&self.trigger("switch")),
            test = toml_path(&self.trigger("test")),
            cancel = toml_path(&self.trigger("cancel")),
            flags = toml_path(&self.flags()),
        );
        fs::write(&path, contents).expect("Failed to write config.toml");
        path
    }
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

/// Commit action that only records the modes it was asked to apply.
#[allow(dead_code)]
#[derive(Default)]
pub struct CommitRecorder {
    calls: Mutex<Vec<Mode>>,
}

#[allow(dead_code)]
impl CommitRecorder {
    pub fn calls(&self) -> Vec<Mode> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommitAction for CommitRecorder {
    fn commit(&self, target: Mode) {
        self.calls.lock().unwrap().push(target);
    }
}

#[allow(dead_code)]
pub fn home_screen() -> MemorySurface {
    MemorySurface::with_elements([
        ("face", ElementDefinition::text("(◕‿‿◕)", (0, 40), 20)),
        ("name", ElementDefinition::text("pwnagotchi >", (5, 20), 10)),
        ("status", ElementDefinition::text("Zzzz...", (125, 20), 10)),
        ("mode", ElementDefinition::text("AUTO", (222, 109), 10)),
    ])
}

#[allow(dead_code)]
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while !condition() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(10));
    }
    true
}
