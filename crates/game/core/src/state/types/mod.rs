mod combatant;
mod common;
mod faction;

pub use combatant::Combatant;
pub use common::{CombatantId, OwnerId, PieceId};
pub use faction::{Disposition, Faction};
