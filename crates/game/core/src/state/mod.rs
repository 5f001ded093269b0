//! Authoritative combat session representation.
//!
//! This module owns the data structures that describe combatants, factions,
//! the per-round turn ledger and the session aggregate. Runtime layers clone
//! or query this state but mutate scheduling fields exclusively through the
//! engine.
pub mod delta;
pub mod types;

mod session;
mod turn;

pub use delta::SessionDelta;
pub use session::CombatSession;
pub use turn::TurnLedger;
pub use types::{Combatant, CombatantId, Disposition, Faction, OwnerId, PieceId};
