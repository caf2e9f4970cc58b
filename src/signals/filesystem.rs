use crate::config::WatchdogConfig;
use crate::error::{ModeSwitchError, Result};
use crate::signals::{SignalSource, TriggerKind};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Signals backed by flag files; a file's existence asserts its signal.
///
/// Hardware buttons drive this source through shell scripts that `touch`
/// the matching path.
#[derive(Debug, Clone)]
pub struct FilesystemSignalSource {
    switch: PathBuf,
    test: PathBuf,
    cancel: PathBuf,
}

impl FilesystemSignalSource {
    pub fn new(switch: PathBuf, test: PathBuf, cancel: PathBuf) -> Self {
        Self {
            switch,
            test,
            cancel,
        }
    }

    pub fn from_config(config: &WatchdogConfig) -> Self {
        Self::new(
            config.switch_trigger.clone(),
            config.test_trigger.clone(),
            config.cancel_trigger.clone(),
        )
    }

    pub fn path(&self, kind: TriggerKind) -> &Path {
        match kind {
            TriggerKind::Switch => &self.switch,
            TriggerKind::Test => &self.test,
            TriggerKind::Cancel => &self.cancel,
        }
    }
}

impl SignalSource for FilesystemSignalSource {
    fn origin(&self) -> &str {
        "Filesystem"
    }

    fn is_asserted(&self, kind: TriggerKind) -> bool {
        self.path(kind).exists()
    }

    fn assert(&self, kind: TriggerKind) -> Result<()> {
        let path = self.path(kind);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(())
    }

    fn clear(&self, kind: TriggerKind) -> Result<()> {
        let path = self.path(kind);
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            // Removed by someone else between the poll and the clear.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ModeSwitchError::SignalClear {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
