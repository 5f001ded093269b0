use crate::env::CombatEnv;
use crate::state::{CombatantId, Faction, OwnerId, PieceId};

/// A scheduling participant wrapping a positioned piece.
///
/// The record only stores references. Faction, action budget and defeated
/// status are read through the environment on every call, never cached, since
/// unrelated gameplay can change them mid-encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub piece: PieceId,
    pub owner: Option<OwnerId>,
    pub name: String,
}

impl Combatant {
    /// Budget used when the piece adapter reports none (or zero).
    pub const DEFAULT_ACTION_BUDGET: u32 = 1;

    pub fn new(id: CombatantId, piece: PieceId) -> Self {
        Self {
            id,
            piece,
            owner: None,
            name: String::new(),
        }
    }

    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Side this combatant currently fights for.
    ///
    /// This is the only place faction is decided. Pieces the adapter does not
    /// know are treated as hostile.
    pub fn faction(&self, env: &CombatEnv<'_>) -> Faction {
        env.pieces()
            .disposition(self.piece)
            .map(Faction::from_disposition)
            .unwrap_or(Faction::Hostile)
    }

    /// Turns this combatant may take per round (always at least one).
    pub fn action_budget(&self, env: &CombatEnv<'_>) -> u32 {
        env.pieces()
            .action_budget(self.piece)
            .unwrap_or(Self::DEFAULT_ACTION_BUDGET)
            .max(Self::DEFAULT_ACTION_BUDGET)
    }

    pub fn is_defeated(&self, env: &CombatEnv<'_>) -> bool {
        env.pieces().is_defeated(self.piece).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Env, PieceProfile, PieceTable, StaticSettings};
    use crate::state::Disposition;

    #[test]
    fn faction_follows_current_disposition() {
        let mut pieces = PieceTable::new();
        pieces.insert(PieceId(7), PieceProfile::new(Disposition::Friendly));
        let settings = StaticSettings::default();
        let combatant = Combatant::new(CombatantId(1), PieceId(7));

        {
            let env = Env::new(&pieces, &settings).into_combat_env();
            assert_eq!(combatant.faction(&env), Faction::Friendly);
            assert_eq!(combatant.faction(&env), Faction::Friendly);
        }

        pieces.set_disposition(PieceId(7), Disposition::Hostile);
        let env = Env::new(&pieces, &settings).into_combat_env();
        assert_eq!(combatant.faction(&env), Faction::Hostile);
    }

    #[test]
    fn unknown_piece_uses_conservative_defaults() {
        let pieces = PieceTable::new();
        let settings = StaticSettings::default();
        let env = Env::new(&pieces, &settings).into_combat_env();
        let combatant = Combatant::new(CombatantId(1), PieceId(99));

        assert_eq!(combatant.faction(&env), Faction::Hostile);
        assert_eq!(combatant.action_budget(&env), 1);
        assert!(!combatant.is_defeated(&env));
    }

    #[test]
    fn zero_budget_is_clamped_to_one() {
        let mut pieces = PieceTable::new();
        pieces.insert(
            PieceId(1),
            PieceProfile::new(Disposition::Hostile).with_action_budget(0),
        );
        let settings = StaticSettings::default();
        let env = Env::new(&pieces, &settings).into_combat_env();

        let combatant = Combatant::new(CombatantId(1), PieceId(1));
        assert_eq!(combatant.action_budget(&env), 1);
    }
}
