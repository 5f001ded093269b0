//! Next-acting-faction resolution.

use crate::env::CombatEnv;
use crate::state::{CombatSession, Faction};

/// Decides which side acts next from the current round's ledger.
///
/// - Nobody has acted yet this round: the first acting faction.
/// - Otherwise the side opposite the most recent actor, provided it still has
///   a combatant with unspent actions.
/// - Failing that, the most recent actor's side keeps going, so one side
///   running out early never stalls the round.
///
/// Returns `None` for a session that has not started.
pub fn next_acting_faction(session: &CombatSession, env: &CombatEnv<'_>) -> Option<Faction> {
    let first = session.first_acting_faction()?;
    let Some(last) = session.ledger().last(session.round()) else {
        return Some(first);
    };

    let last_faction = session
        .combatant(last)
        .map(|c| c.faction(env))
        .unwrap_or(first);
    let candidate = last_faction.opposite();

    let candidate_can_act = session
        .remaining(env)
        .iter()
        .any(|c| c.faction(env) == candidate);

    Some(if candidate_can_act {
        candidate
    } else {
        last_faction
    })
}
