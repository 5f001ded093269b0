use std::fmt;

use serde::{Deserialize, Serialize};

use combat_core::{SessionDelta, TurnAction};

/// Identifies one participant on the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub u32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer:{}", self.0)
    }
}

/// Change notice the host sends after a committed operation.
///
/// Notices carry no payload. Receivers re-read the authoritative session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplicationNotice {
    TurnChanged,
    RoundChanged,
}

impl ReplicationNotice {
    /// Notices announcing a committed delta, round first.
    pub fn from_delta(delta: &SessionDelta) -> Vec<Self> {
        let mut notices = Vec::with_capacity(2);
        if delta.round_changed {
            notices.push(ReplicationNotice::RoundChanged);
        }
        if delta.turn_changed || delta.ledger_changed {
            notices.push(ReplicationNotice::TurnChanged);
        }
        notices
    }
}

/// Scheduler operation an observer asks the host to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRequest {
    pub origin: PeerId,
    pub action: TurnAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CombatSession, Combatant, CombatantId, Faction, PieceId, PieceTable};
    use combat_core::{Env, StaticSettings, TurnScheduler};

    #[test]
    fn start_announces_round_then_turn() {
        let pieces = PieceTable::new();
        let settings = StaticSettings::default();
        let env = Env::new(&pieces, &settings).into_combat_env();
        let mut session =
            CombatSession::with_combatants([Combatant::new(CombatantId(1), PieceId(1))]).unwrap();

        let outcome = TurnScheduler::new(&mut session, env)
            .execute(TurnAction::Start {
                first: Faction::Hostile,
            })
            .unwrap();

        assert_eq!(
            ReplicationNotice::from_delta(&outcome.delta),
            vec![ReplicationNotice::RoundChanged, ReplicationNotice::TurnChanged]
        );
    }
}
