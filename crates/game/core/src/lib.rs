//! Deterministic two-sided combat turn scheduling.
//!
//! `combat-core` defines the canonical scheduling rules (factions, action
//! budgets, the per-round turn ledger) and exposes pure APIs that can be
//! reused by the authoritative runtime, observers, and offline tools. All
//! scheduling mutation flows through [`engine::TurnScheduler`]; data the
//! scheduler does not own is read through the oracles in [`env`].
pub mod engine;
pub mod env;
pub mod query;
pub mod state;

pub use engine::{
    CombatantRef, ExecutionOutcome, LifecycleEvent, LifecycleKind, SchedulerError, TurnAction,
    TurnScheduler, next_acting_faction,
};
pub use env::{
    CombatEnv, Env, PieceOracle, PieceProfile, PieceTable, SettingsOracle, StaticSettings,
};
pub use query::SessionView;
pub use state::{
    CombatSession, Combatant, CombatantId, Disposition, Faction, OwnerId, PieceId, SessionDelta,
    TurnLedger,
};
