//! Encounter files: who fights, and what their pieces look like.
//!
//! An encounter seeds both halves of a session: the roster the scheduler
//! tracks and the piece capabilities the [`PieceRegistry`] serves. Files are
//! RON, for example:
//!
//! ```ron
//! (
//!     name: "Ambush at the ford",
//!     combatants: [
//!         (id: 1, piece: 10, owner: Some(1), name: "Aria", disposition: Friendly),
//!         (id: 2, piece: 20, name: "Ogre", disposition: Hostile, action_budget: 2),
//!     ],
//! )
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use combat_core::{Combatant, CombatantId, Disposition, OwnerId, PieceId, PieceProfile};

use crate::api::{Result, RuntimeError};
use crate::oracle::PieceRegistry;

/// One combatant entry of an encounter file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSpec {
    pub id: u32,
    pub piece: u32,
    #[serde(default)]
    pub owner: Option<u32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub disposition: Disposition,
    #[serde(default = "default_action_budget")]
    pub action_budget: u32,
    #[serde(default)]
    pub defeated: bool,
}

fn default_action_budget() -> u32 {
    Combatant::DEFAULT_ACTION_BUDGET
}

impl CombatantSpec {
    pub fn combatant(&self) -> Combatant {
        let combatant =
            Combatant::new(CombatantId(self.id), PieceId(self.piece)).with_name(&self.name);
        match self.owner {
            Some(owner) => combatant.with_owner(OwnerId(owner)),
            None => combatant,
        }
    }

    pub fn profile(&self) -> PieceProfile {
        PieceProfile::new(self.disposition)
            .with_action_budget(self.action_budget)
            .with_defeated(self.defeated)
    }
}

/// Encounter definition loaded from disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    #[serde(default)]
    pub name: String,
    pub combatants: Vec<CombatantSpec>,
}

impl Encounter {
    /// Parses an encounter from RON text.
    pub fn from_ron(content: &str) -> Result<Self> {
        let encounter: Encounter = ron::from_str(content).map_err(|e| {
            RuntimeError::InvalidConfig(format!("Failed to parse encounter RON: {}", e))
        })?;
        encounter.validate()?;
        Ok(encounter)
    }

    /// Loads an encounter from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::InvalidConfig(format!(
                "Failed to read encounter file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_ron(&content)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.combatants {
            if !seen.insert(spec.id) {
                return Err(RuntimeError::InvalidConfig(format!(
                    "combatant id {} appears more than once",
                    spec.id
                )));
            }
        }
        Ok(())
    }

    /// Registers every piece with `pieces` and returns the roster.
    pub fn install(&self, pieces: &PieceRegistry) -> Vec<Combatant> {
        self.combatants
            .iter()
            .map(|spec| {
                pieces.insert(PieceId(spec.piece), spec.profile());
                spec.combatant()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::PieceOracle;

    const AMBUSH: &str = r#"(
        name: "Ambush at the ford",
        combatants: [
            (id: 1, piece: 10, owner: Some(1), name: "Aria", disposition: Friendly),
            (id: 2, piece: 20, name: "Ogre", disposition: Hostile, action_budget: 2),
            (id: 3, piece: 30, name: "Shade", disposition: Secret, defeated: true),
        ],
    )"#;

    #[test]
    fn installs_pieces_and_roster() {
        let encounter = Encounter::from_ron(AMBUSH).unwrap();
        let pieces = PieceRegistry::new();

        let roster = encounter.install(&pieces);

        assert_eq!(encounter.name, "Ambush at the ford");
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].owner, Some(OwnerId(1)));
        assert_eq!(roster[1].name, "Ogre");
        assert_eq!(pieces.action_budget(PieceId(20)), Some(2));
        assert_eq!(pieces.action_budget(PieceId(10)), Some(1));
        assert_eq!(pieces.disposition(PieceId(30)), Some(Disposition::Secret));
        assert_eq!(pieces.is_defeated(PieceId(30)), Some(true));
    }

    #[test]
    fn missing_disposition_defaults_to_neutral() {
        let encounter = Encounter::from_ron("(combatants: [(id: 1, piece: 1)])").unwrap();
        assert_eq!(encounter.combatants[0].disposition, Disposition::Neutral);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Encounter::from_ron("(combatants: [(id: 1, piece: 1), (id: 1, piece: 2)])")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidConfig(_)));
    }

    #[test]
    fn reports_parse_errors() {
        let err = Encounter::from_ron("(combatants: oops)").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidConfig(_)));
    }
}
