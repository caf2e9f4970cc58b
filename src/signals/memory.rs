use crate::error::Result;
use crate::signals::{SignalSource, TriggerKind};
use std::sync::atomic::{AtomicBool, Ordering};

/// In-process signals, for embedding hosts and deterministic tests.
#[derive(Debug, Default)]
pub struct InMemorySignalSource {
    switch: AtomicBool,
    test: AtomicBool,
    cancel: AtomicBool,
}

impl InMemorySignalSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, kind: TriggerKind) -> &AtomicBool {
        match kind {
            TriggerKind::Switch => &self.switch,
            TriggerKind::Test => &self.test,
            TriggerKind::Cancel => &self.cancel,
        }
    }
}

impl SignalSource for InMemorySignalSource {
    fn origin(&self) -> &str {
        "Memory"
    }

    fn is_asserted(&self, kind: TriggerKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }

    fn assert(&self, kind: TriggerKind) -> Result<()> {
        self.flag(kind).store(true, Ordering::Release);
        Ok(())
    }

    fn clear(&self, kind: TriggerKind) -> Result<()> {
        self.flag(kind).store(false, Ordering::Release);
        Ok(())
    }
}
