use crate::state::{CombatantId, Faction};

use super::{CombatantRef, LifecycleEvent, SchedulerError, TurnScheduler, next_acting_faction};

/// Turn scheduling operations for TurnScheduler.
impl TurnScheduler<'_, '_> {
    /// Begins combat with `first` acting first. Only valid in round 0.
    pub fn start(&mut self, first: Faction) -> Result<Vec<LifecycleEvent>, SchedulerError> {
        if self.session.is_started() {
            return Err(SchedulerError::InvalidState {
                round: self.session.round,
            });
        }

        self.session.first_acting_faction = Some(first);
        self.session.current_acting_faction = Some(first);
        self.session.round = 1;
        self.session.turn = self.round_start_turn();

        let mut events = vec![
            LifecycleEvent::CombatStarted { round: 1 },
            LifecycleEvent::RoundStarted { round: 1 },
        ];
        events.extend(self.turn_started_events(&[]));
        Ok(events)
    }

    /// Records that `combatant` finished acting, then advances.
    ///
    /// Emits turn-ended for the finisher, round-ended/round-started on
    /// rollover, and turn-started for every combatant that became current.
    pub fn mark_turn_taken(
        &mut self,
        combatant: CombatantId,
    ) -> Result<Vec<LifecycleEvent>, SchedulerError> {
        if !self.session.is_started() {
            return Err(SchedulerError::NotStarted);
        }

        let record = self
            .session
            .combatant(combatant)
            .ok_or(SchedulerError::UnknownCombatant { id: combatant })?;
        let budget = record.action_budget(&self.env);
        let round = self.session.round;
        if self.session.ledger.taken_count(round, combatant) >= budget {
            return Err(SchedulerError::BudgetExhausted {
                id: combatant,
                budget,
            });
        }
        let finished = CombatantRef::from(record);

        // The finisher's turn is over; if it is still current afterwards, that
        // is a new turn.
        let mut already_acting = self.acting_ids();
        already_acting.retain(|&id| id != combatant);

        self.session.ledger.append(round, combatant);
        self.session.current_acting_faction = self.next_acting_faction();

        let mut events = vec![LifecycleEvent::TurnEnded {
            round,
            combatant: finished,
        }];

        if self.advance() {
            events.push(LifecycleEvent::RoundEnded { round });
            events.push(LifecycleEvent::RoundStarted {
                round: self.session.round,
            });
            events.extend(self.turn_started_events(&[]));
        } else {
            events.extend(self.turn_started_events(&already_acting));
        }

        Ok(events)
    }

    /// Removes the latest ledger entry of the current round.
    ///
    /// With nothing recorded this round, steps back into the previous one so
    /// that undoing a turn which rolled the round over restores the exact
    /// prior position. Lifecycle events are not replayed.
    pub fn previous_turn(&mut self) -> Result<Vec<LifecycleEvent>, SchedulerError> {
        if !self.session.is_started() {
            return Err(SchedulerError::NotStarted);
        }

        let round = self.session.round;
        if self.session.ledger.len(round) == 0 {
            if round == 1 {
                return Err(SchedulerError::NothingToUndo);
            }
            return self.previous_round();
        }

        self.session.ledger.pop(round);
        self.session.current_acting_faction = self.next_acting_faction();
        self.session.turn = Some(self.session.ledger.len(round) as u32);

        Ok(Vec::new())
    }

    /// Discards the current round and removes the last turn of the one before.
    ///
    /// Stepping back from round 1 returns the session to the not-started state.
    pub fn previous_round(&mut self) -> Result<Vec<LifecycleEvent>, SchedulerError> {
        if !self.session.is_started() {
            return Err(SchedulerError::NotStarted);
        }

        let round = self.session.round;
        self.session.ledger.discard(round);

        if round == 1 {
            self.session.reset();
            return Ok(Vec::new());
        }

        let previous = round - 1;
        self.session.round = previous;
        self.session.ledger.pop(previous);
        self.session.current_acting_faction = self.next_acting_faction();
        self.session.turn = Some(self.session.ledger.len(previous) as u32);

        Ok(Vec::new())
    }

    /// Rolls over into the next round regardless of who has acted.
    pub fn next_round(&mut self) -> Result<Vec<LifecycleEvent>, SchedulerError> {
        if !self.session.is_started() {
            return Err(SchedulerError::NotStarted);
        }

        let round = self.session.round;
        self.advance_round();

        let mut events = vec![
            LifecycleEvent::RoundEnded { round },
            LifecycleEvent::RoundStarted {
                round: self.session.round,
            },
        ];
        events.extend(self.turn_started_events(&[]));
        Ok(events)
    }

    /// Ends the encounter, keeping the roster for a later restart.
    pub fn end_combat(&mut self) -> Result<Vec<LifecycleEvent>, SchedulerError> {
        if !self.session.is_started() {
            return Err(SchedulerError::NotStarted);
        }

        let round = self.session.round;
        self.session.reset();
        Ok(vec![LifecycleEvent::CombatEnded { round }])
    }

    /// Moves to the next turn within the round, or rolls the round over when
    /// nobody has anything left to do. Returns true on rollover.
    fn advance(&mut self) -> bool {
        self.session.current_acting_faction = self.next_acting_faction();

        let turns_taken = self.session.ledger.len(self.session.round);
        let nobody_left = self.session.remaining(&self.env).is_empty();

        if self.session.round == 0 || nobody_left {
            self.advance_round();
            true
        } else {
            self.session.turn = Some(turns_taken as u32);
            false
        }
    }

    fn advance_round(&mut self) {
        self.session.current_acting_faction = self.session.first_acting_faction;
        self.session.round += 1;
        self.session.turn = self.round_start_turn();
    }

    /// Turn pointer at the start of a round: `None` if nobody can act.
    fn round_start_turn(&self) -> Option<u32> {
        if self.session.remaining(&self.env).is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn next_acting_faction(&self) -> Option<Faction> {
        next_acting_faction(&*self.session, &self.env)
    }

    fn acting_ids(&self) -> Vec<CombatantId> {
        self.session
            .acting(&self.env)
            .iter()
            .map(|c| c.id)
            .collect()
    }

    fn turn_started_events(&self, already_acting: &[CombatantId]) -> Vec<LifecycleEvent> {
        let round = self.session.round;
        self.session
            .acting(&self.env)
            .into_iter()
            .filter(|c| !already_acting.contains(&c.id))
            .map(|c| LifecycleEvent::TurnStarted {
                round,
                combatant: CombatantRef::from(c),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ExecutionOutcome, LifecycleKind, TurnAction};
    use crate::env::{Env, PieceProfile, PieceTable, StaticSettings};
    use crate::state::{CombatSession, Combatant, Disposition, PieceId};

    struct Fixture {
        pieces: PieceTable,
        settings: StaticSettings,
        session: CombatSession,
    }

    impl Fixture {
        /// Each entry is (id, disposition, budget); piece ids mirror combatant ids.
        fn new(roster: &[(u32, Disposition, u32)]) -> Self {
            let mut pieces = PieceTable::new();
            let mut session = CombatSession::new();
            for &(id, disposition, budget) in roster {
                pieces.insert(
                    PieceId(id),
                    PieceProfile::new(disposition).with_action_budget(budget),
                );
                session
                    .add_combatant(Combatant::new(CombatantId(id), PieceId(id)))
                    .unwrap();
            }
            Self {
                pieces,
                settings: StaticSettings::default(),
                session,
            }
        }

        fn run(&mut self, action: TurnAction) -> Result<ExecutionOutcome, SchedulerError> {
            let env = Env::new(&self.pieces, &self.settings).into_combat_env();
            TurnScheduler::new(&mut self.session, env).execute(action)
        }

        fn start(&mut self, first: Faction) -> ExecutionOutcome {
            self.run(TurnAction::Start { first }).unwrap()
        }

        fn take(&mut self, id: u32) -> ExecutionOutcome {
            self.run(TurnAction::MarkTurnTaken {
                combatant: CombatantId(id),
            })
            .unwrap()
        }

        fn faction(&self) -> Option<Faction> {
            self.session.current_acting_faction()
        }

        fn ledger(&self) -> Vec<CombatantId> {
            self.session
                .ledger()
                .entries(self.session.round())
                .to_vec()
        }
    }

    use Disposition::{Friendly as F, Hostile as H};

    #[test]
    fn one_each_alternates_then_rolls_over() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);

        fx.start(Faction::Friendly);
        assert_eq!(fx.session.round(), 1);
        assert_eq!(fx.faction(), Some(Faction::Friendly));

        fx.take(1);
        assert_eq!(fx.ledger(), vec![CombatantId(1)]);
        assert_eq!(fx.faction(), Some(Faction::Hostile));
        assert_eq!(fx.session.turn(), Some(1));

        fx.take(2);
        assert_eq!(fx.session.round(), 2);
        assert_eq!(fx.faction(), Some(Faction::Friendly));
        assert_eq!(fx.session.turn(), Some(0));
        assert_eq!(
            fx.session.ledger().entries(1),
            &[CombatantId(1), CombatantId(2)]
        );
    }

    #[test]
    fn exhausted_side_hands_back_to_the_other() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, F, 1), (3, H, 1)]);
        fx.start(Faction::Friendly);

        fx.take(1);
        assert_eq!(fx.faction(), Some(Faction::Hostile));

        fx.take(3);
        assert_eq!(fx.faction(), Some(Faction::Friendly));
        assert_eq!(fx.session.round(), 1);

        fx.take(2);
        assert_eq!(fx.session.round(), 2);
        assert_eq!(fx.faction(), Some(Faction::Friendly));
    }

    #[test]
    fn alternates_while_both_sides_have_actions() {
        let mut fx = Fixture::new(&[(1, F, 3), (2, H, 3)]);
        fx.start(Faction::Hostile);

        let mut expected = Faction::Hostile;
        for id in [2, 1, 2, 1, 2] {
            assert_eq!(fx.faction(), Some(expected));
            fx.take(id);
            expected = expected.opposite();
        }
        assert_eq!(fx.faction(), Some(Faction::Friendly));
        assert_eq!(fx.session.round(), 1);
    }

    #[test]
    fn same_side_keeps_acting_once_the_other_is_spent() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 3)]);
        fx.start(Faction::Hostile);

        fx.take(2);
        assert_eq!(fx.faction(), Some(Faction::Friendly));
        fx.take(1);
        assert_eq!(fx.faction(), Some(Faction::Hostile));
        fx.take(2);
        assert_eq!(fx.faction(), Some(Faction::Hostile));
        assert_eq!(fx.session.round(), 1);

        fx.take(2);
        assert_eq!(fx.session.round(), 2);
        assert_eq!(fx.faction(), Some(Faction::Hostile));
    }

    #[test]
    fn rejects_turns_beyond_budget() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, F, 1), (3, H, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);

        let before = fx.session.clone();
        let err = fx
            .run(TurnAction::MarkTurnTaken {
                combatant: CombatantId(1),
            })
            .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::BudgetExhausted {
                id: CombatantId(1),
                budget: 1
            }
        );
        assert_eq!(fx.session, before);
    }

    #[test]
    fn rejects_unknown_combatant() {
        let mut fx = Fixture::new(&[(1, F, 1)]);
        fx.start(Faction::Friendly);

        let err = fx
            .run(TurnAction::MarkTurnTaken {
                combatant: CombatantId(42),
            })
            .unwrap_err();
        assert_eq!(err, SchedulerError::UnknownCombatant { id: CombatantId(42) });
    }

    #[test]
    fn mark_before_start_fails_without_mutation() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);

        let err = fx
            .run(TurnAction::MarkTurnTaken {
                combatant: CombatantId(1),
            })
            .unwrap_err();

        assert_eq!(err, SchedulerError::NotStarted);
        assert_eq!(fx.session.round(), 0);
        assert_eq!(fx.faction(), None);
        assert!(fx.session.ledger().is_empty());
    }

    #[test]
    fn start_twice_is_invalid() {
        let mut fx = Fixture::new(&[(1, F, 1)]);
        fx.start(Faction::Friendly);

        let err = fx
            .run(TurnAction::Start {
                first: Faction::Hostile,
            })
            .unwrap_err();
        assert_eq!(err, SchedulerError::InvalidState { round: 1 });
        assert_eq!(fx.session.first_acting_faction(), Some(Faction::Friendly));
    }

    #[test]
    fn previous_turn_restores_prior_position() {
        let mut fx = Fixture::new(&[(1, F, 2), (2, H, 1), (3, F, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);
        fx.take(2);

        for id in [1, 3] {
            let before = fx.session.clone();
            fx.take(id);
            let outcome = fx.run(TurnAction::PreviousTurn).unwrap();
            assert!(outcome.events.is_empty());
            assert_eq!(fx.session, before);
        }
    }

    #[test]
    fn previous_turn_undoes_a_rollover() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);

        let before = fx.session.clone();
        fx.take(2);
        assert_eq!(fx.session.round(), 2);

        fx.run(TurnAction::PreviousTurn).unwrap();
        assert_eq!(fx.session, before);
    }

    #[test]
    fn previous_turn_at_start_of_first_round_is_rejected() {
        let mut fx = Fixture::new(&[(1, F, 1)]);
        assert_eq!(
            fx.run(TurnAction::PreviousTurn).unwrap_err(),
            SchedulerError::NotStarted
        );

        fx.start(Faction::Friendly);
        let before = fx.session.clone();
        assert_eq!(
            fx.run(TurnAction::PreviousTurn).unwrap_err(),
            SchedulerError::NothingToUndo
        );
        assert_eq!(fx.session, before);
    }

    #[test]
    fn previous_round_from_first_round_resets() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);
        fx.start(Faction::Friendly);

        fx.run(TurnAction::PreviousRound).unwrap();

        assert_eq!(fx.session.round(), 0);
        assert_eq!(fx.session.turn(), None);
        assert_eq!(fx.faction(), None);
        assert!(!fx.session.is_started());
        assert_eq!(fx.session.combatants().len(), 2);
    }

    #[test]
    fn previous_round_pops_last_turn_of_prior_round() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);
        fx.take(2);
        fx.take(1);
        assert_eq!(fx.session.round(), 2);

        fx.run(TurnAction::PreviousRound).unwrap();

        assert_eq!(fx.session.round(), 1);
        assert_eq!(fx.ledger(), vec![CombatantId(1)]);
        assert_eq!(fx.faction(), Some(Faction::Hostile));
        assert_eq!(fx.session.turn(), Some(1));
        assert!(fx.session.ledger().entries(2).is_empty());
    }

    #[test]
    fn skip_defeated_excludes_defeated_from_remaining() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1), (3, H, 1)]);
        fx.pieces.set_defeated(PieceId(3), true);
        fx.settings.skip_defeated = true;
        fx.start(Faction::Friendly);

        fx.take(1);
        assert_eq!(fx.faction(), Some(Faction::Hostile));

        fx.take(2);
        assert_eq!(fx.session.round(), 2, "defeated #3 must not hold the round open");
    }

    #[test]
    fn defeated_still_counts_without_skip_policy() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1), (3, H, 1)]);
        fx.pieces.set_defeated(PieceId(3), true);
        fx.start(Faction::Friendly);

        fx.take(1);
        fx.take(2);
        assert_eq!(fx.session.round(), 1);
        assert_eq!(fx.faction(), Some(Faction::Hostile));
    }

    #[test]
    fn disposition_change_mid_round_is_observed() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1), (3, H, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);
        assert_eq!(fx.faction(), Some(Faction::Hostile));

        // #3 switches sides; #2 acting leaves only a friendly combatant.
        fx.pieces.set_disposition(PieceId(3), Disposition::Friendly);
        fx.take(2);
        assert_eq!(fx.faction(), Some(Faction::Friendly));
    }

    #[test]
    fn start_emits_combat_round_and_turn_events() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, F, 1), (3, H, 1)]);
        let outcome = fx.start(Faction::Friendly);

        let kinds: Vec<_> = outcome.events.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                LifecycleKind::CombatStarted,
                LifecycleKind::RoundStarted,
                LifecycleKind::TurnStarted,
                LifecycleKind::TurnStarted,
            ]
        );
        assert!(outcome.delta.round_changed);
        assert!(outcome.events.iter().all(|e| e.round() == 1));
    }

    #[test]
    fn rollover_emits_turn_and_round_boundaries() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);

        let outcome = fx.take(2);
        let kinds: Vec<_> = outcome.events.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                LifecycleKind::TurnEnded,
                LifecycleKind::RoundEnded,
                LifecycleKind::RoundStarted,
                LifecycleKind::TurnStarted,
            ]
        );
        assert_eq!(outcome.events[0].combatant().map(|c| c.id), Some(CombatantId(2)));
        assert_eq!(outcome.events[1].round(), 1);
        assert_eq!(outcome.events[2].round(), 2);
        assert_eq!(outcome.events[3].combatant().map(|c| c.id), Some(CombatantId(1)));
        assert!(outcome.delta.round_changed);
        assert!(outcome.delta.turn_changed);
    }

    #[test]
    fn turn_started_only_for_newly_current_combatants() {
        let mut fx = Fixture::new(&[(1, F, 2), (2, F, 1), (3, H, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);
        fx.take(3);

        // Friendly stays current: #1 is spent and #2 was already up.
        let outcome = fx.take(1);
        let started: Vec<_> = outcome
            .events
            .iter()
            .filter(|e| e.kind() == LifecycleKind::TurnStarted)
            .filter_map(|e| e.combatant().map(|c| c.id))
            .collect();
        assert_eq!(started, Vec::<CombatantId>::new());

        let outcome = fx.take(2);
        assert_eq!(fx.session.round(), 2);
        assert!(outcome.delta.round_changed);
    }

    #[test]
    fn next_round_forces_rollover() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);
        fx.start(Faction::Hostile);
        fx.take(2);

        let outcome = fx.run(TurnAction::NextRound).unwrap();
        assert_eq!(fx.session.round(), 2);
        assert_eq!(fx.faction(), Some(Faction::Hostile));
        assert_eq!(fx.session.turn(), Some(0));
        assert_eq!(outcome.events[0], LifecycleEvent::RoundEnded { round: 1 });
    }

    #[test]
    fn end_combat_resets_and_keeps_roster() {
        let mut fx = Fixture::new(&[(1, F, 1), (2, H, 1)]);
        fx.start(Faction::Friendly);
        fx.take(1);

        let outcome = fx.run(TurnAction::EndCombat).unwrap();
        assert_eq!(outcome.events, vec![LifecycleEvent::CombatEnded { round: 1 }]);
        assert!(!fx.session.is_started());
        assert!(fx.session.ledger().is_empty());
        assert_eq!(fx.session.combatants().len(), 2);

        assert_eq!(
            fx.run(TurnAction::EndCombat).unwrap_err(),
            SchedulerError::NotStarted
        );
    }

    #[test]
    fn empty_roster_starts_with_nobody_acting() {
        let mut fx = Fixture::new(&[]);
        fx.start(Faction::Friendly);
        assert_eq!(fx.session.round(), 1);
        assert_eq!(fx.session.turn(), None);
    }
}
