use crate::config::ModeSwitchConfig;
use crate::error::Result;
use crate::signals::{FilesystemSignalSource, SignalSource, TriggerKind};
use log::debug;

/// Asserts a flag file for a running daemon to pick up, the same way a
/// hardware button script does.
pub struct TriggerCommand<'a> {
    config: &'a ModeSwitchConfig,
}

impl<'a> TriggerCommand<'a> {
    pub fn new(config: &'a ModeSwitchConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, kind: TriggerKind) -> Result<()> {
        let source = FilesystemSignalSource::from_config(&self.config.watchdog);
        source.assert(kind)?;
        debug!("Asserted {}", source.path(kind).display());
        println!("Requested '{kind}' via {}", source.path(kind).display());
        Ok(())
    }
}
