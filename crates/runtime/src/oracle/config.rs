//! Settings oracle implementation for runtime.

use std::sync::atomic::{AtomicBool, Ordering};

use combat_core::SettingsOracle;

/// Runtime implementation of SettingsOracle.
///
/// The flag is toggled while the host is running; each scheduler evaluation
/// reads the value current at that moment.
#[derive(Debug, Default)]
pub struct SettingsOracleImpl {
    skip_defeated: AtomicBool,
}

impl SettingsOracleImpl {
    pub fn new(skip_defeated: bool) -> Self {
        Self {
            skip_defeated: AtomicBool::new(skip_defeated),
        }
    }

    pub fn set_skip_defeated(&self, skip_defeated: bool) {
        self.skip_defeated.store(skip_defeated, Ordering::Relaxed);
    }
}

impl SettingsOracle for SettingsOracleImpl {
    fn skip_defeated(&self) -> bool {
        self.skip_defeated.load(Ordering::Relaxed)
    }
}
