//! Read-only query surface for presentation layers.

use crate::env::CombatEnv;
use crate::state::{CombatSession, CombatantId, Faction, TurnLedger};

/// Point-in-time projection of a session for rendering.
///
/// Everything here is recomputed from the session and the environment when
/// captured; nothing is stored alongside the session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionView {
    pub round: u32,
    pub turn: Option<u32>,
    pub first_acting_faction: Option<Faction>,
    pub acting_faction: Option<Faction>,
    pub ledger: TurnLedger,
    /// Combatants with unspent actions this round, in roster order.
    pub remaining: Vec<CombatantId>,
    /// Remaining combatants on the acting side.
    pub acting: Vec<CombatantId>,
}

impl SessionView {
    pub fn capture(session: &CombatSession, env: &CombatEnv<'_>) -> Self {
        Self {
            round: session.round(),
            turn: session.turn(),
            first_acting_faction: session.first_acting_faction(),
            acting_faction: session.current_acting_faction(),
            ledger: session.ledger().clone(),
            remaining: session.remaining(env).iter().map(|c| c.id).collect(),
            acting: session.acting(env).iter().map(|c| c.id).collect(),
        }
    }

    /// Entries of the current round's ledger.
    pub fn taken_this_round(&self) -> &[CombatantId] {
        self.ledger.entries(self.round)
    }

    pub fn is_started(&self) -> bool {
        self.round > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{TurnAction, TurnScheduler};
    use crate::env::{Env, PieceProfile, PieceTable, StaticSettings};
    use crate::state::{Combatant, Disposition, PieceId};

    #[test]
    fn view_tracks_remaining_and_acting() {
        let mut pieces = PieceTable::new();
        pieces.insert(PieceId(1), PieceProfile::new(Disposition::Friendly));
        pieces.insert(PieceId(2), PieceProfile::new(Disposition::Friendly));
        pieces.insert(PieceId(3), PieceProfile::new(Disposition::Secret));
        let settings = StaticSettings::default();
        let env = Env::new(&pieces, &settings).into_combat_env();

        let mut session = CombatSession::with_combatants(
            (1..=3).map(|i| Combatant::new(CombatantId(i), PieceId(i))),
        )
        .unwrap();

        let view = SessionView::capture(&session, &env);
        assert!(!view.is_started());
        assert_eq!(view.acting, Vec::<CombatantId>::new());

        let mut scheduler = TurnScheduler::new(&mut session, env);
        scheduler
            .execute(TurnAction::Start {
                first: Faction::Friendly,
            })
            .unwrap();
        scheduler
            .execute(TurnAction::MarkTurnTaken {
                combatant: CombatantId(1),
            })
            .unwrap();

        let view = SessionView::capture(&session, &env);
        assert_eq!(view.round, 1);
        assert_eq!(view.turn, Some(1));
        assert_eq!(view.acting_faction, Some(Faction::Hostile));
        assert_eq!(view.taken_this_round(), &[CombatantId(1)]);
        assert_eq!(view.remaining, vec![CombatantId(2), CombatantId(3)]);
        assert_eq!(view.acting, vec![CombatantId(3)]);
        assert_eq!(
            crate::engine::next_acting_faction(&session, &env),
            view.acting_faction
        );
    }
}
