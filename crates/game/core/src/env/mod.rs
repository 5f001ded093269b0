//! Traits describing data the scheduler reads but does not own.
//!
//! Oracles expose piece capabilities (disposition, action budget, defeated
//! status) and scheduling settings. The [`Env`] aggregate bundles them so the
//! engine can access everything it needs without hard coupling to concrete
//! implementations.
mod config;
mod pieces;

pub use config::{SettingsOracle, StaticSettings};
pub use pieces::{PieceOracle, PieceProfile, PieceTable};

/// Aggregates read-only oracles required by the turn scheduler.
pub struct Env<'a, P, S>
where
    P: PieceOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
    pieces: &'a P,
    settings: &'a S,
}

impl<P, S> Clone for Env<'_, P, S>
where
    P: PieceOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, S> Copy for Env<'_, P, S>
where
    P: PieceOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
}

pub type CombatEnv<'a> = Env<'a, dyn PieceOracle + 'a, dyn SettingsOracle + 'a>;

impl<'a, P, S> Env<'a, P, S>
where
    P: PieceOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
    pub fn new(pieces: &'a P, settings: &'a S) -> Self {
        Self { pieces, settings }
    }

    pub fn pieces(&self) -> &'a P {
        self.pieces
    }

    pub fn settings(&self) -> &'a S {
        self.settings
    }
}

impl<'a, P, S> Env<'a, P, S>
where
    P: PieceOracle + 'a,
    S: SettingsOracle + 'a,
{
    /// Erases the concrete oracle types.
    pub fn into_combat_env(self) -> CombatEnv<'a> {
        Env {
            pieces: self.pieces as &'a dyn PieceOracle,
            settings: self.settings as &'a dyn SettingsOracle,
        }
    }
}
