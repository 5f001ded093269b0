//! Settings oracle for exposing scheduling policy to the engine.

/// Provides access to session-level scheduling settings.
///
/// Values are read every time the scheduler evaluates the turn order, so an
/// implementation may change them between calls.
pub trait SettingsOracle: Send + Sync {
    /// Whether defeated combatants are excluded from the combatants left to act.
    fn skip_defeated(&self) -> bool;
}

/// Fixed settings, mostly useful for tests and offline tools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticSettings {
    pub skip_defeated: bool,
}

impl StaticSettings {
    pub const fn new(skip_defeated: bool) -> Self {
        Self { skip_defeated }
    }
}

impl SettingsOracle for StaticSettings {
    fn skip_defeated(&self) -> bool {
        self.skip_defeated
    }
}
