use std::collections::BTreeMap;

use super::CombatantId;

/// Per-round append log of combatants that have already acted.
///
/// An id appears once per action it spent, so a combatant with a budget of two
/// can show up twice in the same round. The ledger does not enforce budgets;
/// the scheduler does, and it is the only writer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnLedger {
    rounds: BTreeMap<u32, Vec<CombatantId>>,
}

impl TurnLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries recorded for a round, oldest first.
    pub fn entries(&self, round: u32) -> &[CombatantId] {
        self.rounds.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of actions recorded in a round.
    pub fn len(&self, round: u32) -> usize {
        self.entries(round).len()
    }

    /// Most recent entry of a round.
    pub fn last(&self, round: u32) -> Option<CombatantId> {
        self.entries(round).last().copied()
    }

    /// How many actions `combatant` has spent in `round`.
    pub fn taken_count(&self, round: u32, combatant: CombatantId) -> u32 {
        self.entries(round)
            .iter()
            .filter(|&&id| id == combatant)
            .count() as u32
    }

    /// True when no round has any entry.
    pub fn is_empty(&self) -> bool {
        self.rounds.values().all(Vec::is_empty)
    }

    /// Iterates rounds that have a log, in ascending order.
    pub fn rounds(&self) -> impl Iterator<Item = (u32, &[CombatantId])> {
        self.rounds
            .iter()
            .map(|(&round, entries)| (round, entries.as_slice()))
    }

    pub(crate) fn append(&mut self, round: u32, combatant: CombatantId) {
        self.rounds.entry(round).or_default().push(combatant);
    }

    pub(crate) fn pop(&mut self, round: u32) -> Option<CombatantId> {
        let entries = self.rounds.get_mut(&round)?;
        let popped = entries.pop();
        if entries.is_empty() {
            self.rounds.remove(&round);
        }
        popped
    }

    pub(crate) fn discard(&mut self, round: u32) -> Vec<CombatantId> {
        self.rounds.remove(&round).unwrap_or_default()
    }

    pub(crate) fn clear(&mut self) {
        self.rounds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_repeated_entries_per_round() {
        let mut ledger = TurnLedger::new();
        ledger.append(1, CombatantId(1));
        ledger.append(1, CombatantId(2));
        ledger.append(1, CombatantId(1));
        ledger.append(2, CombatantId(1));

        assert_eq!(ledger.taken_count(1, CombatantId(1)), 2);
        assert_eq!(ledger.taken_count(1, CombatantId(2)), 1);
        assert_eq!(ledger.taken_count(2, CombatantId(1)), 1);
        assert_eq!(ledger.taken_count(3, CombatantId(1)), 0);
        assert_eq!(ledger.last(1), Some(CombatantId(1)));
    }

    #[test]
    fn pop_drops_emptied_rounds() {
        let mut ledger = TurnLedger::new();
        ledger.append(1, CombatantId(4));

        assert_eq!(ledger.pop(1), Some(CombatantId(4)));
        assert_eq!(ledger.pop(1), None);
        assert!(ledger.is_empty());
        assert_eq!(ledger.rounds().count(), 0);
    }

    #[test]
    fn discard_removes_whole_round() {
        let mut ledger = TurnLedger::new();
        ledger.append(1, CombatantId(1));
        ledger.append(2, CombatantId(2));
        ledger.append(2, CombatantId(3));

        assert_eq!(ledger.discard(2), vec![CombatantId(2), CombatantId(3)]);
        assert_eq!(ledger.entries(2), &[] as &[CombatantId]);
        assert_eq!(ledger.entries(1), &[CombatantId(1)]);
    }
}
