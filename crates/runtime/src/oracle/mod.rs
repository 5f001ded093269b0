//! Runtime implementations of the `combat-core` oracles.
//!
//! These wrap piece capabilities and scheduling settings in shared,
//! interior-mutable storage and bundle them into an [`OracleManager`] so the
//! runtime can build [`combat_core::CombatEnv`] views on demand.
mod config;
mod pieces;

use std::sync::Arc;

use combat_core::{CombatEnv, Env};

pub use config::SettingsOracleImpl;
pub use pieces::PieceRegistry;

/// Manages all oracle implementations and provides unified access.
#[derive(Clone, Default)]
pub struct OracleManager {
    pub(crate) pieces: Arc<PieceRegistry>,
    pub(crate) settings: Arc<SettingsOracleImpl>,
}

impl OracleManager {
    pub fn new(pieces: Arc<PieceRegistry>, settings: Arc<SettingsOracleImpl>) -> Self {
        Self { pieces, settings }
    }

    /// Borrows the oracles as the environment the scheduler reads.
    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        Env::new(self.pieces.as_ref(), self.settings.as_ref()).into_combat_env()
    }

    pub fn pieces(&self) -> &PieceRegistry {
        &self.pieces
    }

    pub fn settings(&self) -> &SettingsOracleImpl {
        &self.settings
    }
}
