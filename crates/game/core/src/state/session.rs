use crate::engine::SchedulerError;
use crate::env::CombatEnv;

use super::{Combatant, CombatantId, Faction, TurnLedger};

/// Aggregate root of a single encounter.
///
/// Round, turn pointer, acting faction and ledger are private: only
/// [`crate::engine::TurnScheduler`] writes them. Readers get accessors and the
/// derived queries below, all recomputed on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub(crate) round: u32,
    pub(crate) turn: Option<u32>,
    pub(crate) first_acting_faction: Option<Faction>,
    pub(crate) current_acting_faction: Option<Faction>,
    pub(crate) ledger: TurnLedger,
    combatants: Vec<Combatant>,
}

impl CombatSession {
    /// Creates an empty, not-started session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a not-started session with the given roster.
    ///
    /// Returns an error if two combatants share an id.
    pub fn with_combatants(
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, SchedulerError> {
        let mut session = Self::new();
        for combatant in combatants {
            session.add_combatant(combatant)?;
        }
        Ok(session)
    }

    /// Adds a participant. Allowed at any point, including mid-combat.
    pub fn add_combatant(&mut self, combatant: Combatant) -> Result<(), SchedulerError> {
        if self.combatant(combatant.id).is_some() {
            return Err(SchedulerError::DuplicateCombatant { id: combatant.id });
        }
        self.combatants.push(combatant);
        Ok(())
    }

    /// Current round; 0 means combat has not started.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Ordinal position within the round, `None` when nobody is acting.
    pub fn turn(&self) -> Option<u32> {
        self.turn
    }

    pub fn first_acting_faction(&self) -> Option<Faction> {
        self.first_acting_faction
    }

    pub fn current_acting_faction(&self) -> Option<Faction> {
        self.current_acting_faction
    }

    pub fn ledger(&self) -> &TurnLedger {
        &self.ledger
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn is_started(&self) -> bool {
        self.round > 0
    }

    /// Combatants that still have unspent actions this round.
    ///
    /// Defeated combatants are left out when the skip-defeated setting is on,
    /// whatever their budget.
    pub fn remaining(&self, env: &CombatEnv<'_>) -> Vec<&Combatant> {
        let skip_defeated = env.settings().skip_defeated();
        self.combatants
            .iter()
            .filter(|c| self.ledger.taken_count(self.round, c.id) < c.action_budget(env))
            .filter(|c| !(skip_defeated && c.is_defeated(env)))
            .collect()
    }

    /// Remaining combatants belonging to the acting faction.
    pub fn acting(&self, env: &CombatEnv<'_>) -> Vec<&Combatant> {
        let Some(faction) = self.current_acting_faction else {
            return Vec::new();
        };
        self.remaining(env)
            .into_iter()
            .filter(|c| c.faction(env) == faction)
            .collect()
    }

    /// Resets everything except the roster back to the not-started state.
    pub(crate) fn reset(&mut self) {
        self.round = 0;
        self.turn = None;
        self.first_acting_faction = None;
        self.current_acting_faction = None;
        self.ledger.clear();
    }
}
