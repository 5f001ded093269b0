//! Lifecycle events emitted for the rules-automation layer.

use crate::state::{Combatant, CombatantId, OwnerId, PieceId};

/// Identity of the combatant a turn-scoped event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantRef {
    pub id: CombatantId,
    pub piece: PieceId,
    pub owner: Option<OwnerId>,
}

impl From<&Combatant> for CombatantRef {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            piece: combatant.piece,
            owner: combatant.owner,
        }
    }
}

/// Coarse-grained kind of a [`LifecycleEvent`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleKind {
    CombatStarted,
    CombatEnded,
    RoundStarted,
    RoundEnded,
    TurnStarted,
    TurnEnded,
}

/// Boundary signal produced by a scheduler operation.
///
/// Consumers react to these but must never write scheduling state in
/// response; they go back through the scheduler like any other caller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleEvent {
    CombatStarted { round: u32 },
    CombatEnded { round: u32 },
    RoundStarted { round: u32 },
    RoundEnded { round: u32 },
    TurnStarted { round: u32, combatant: CombatantRef },
    TurnEnded { round: u32, combatant: CombatantRef },
}

impl LifecycleEvent {
    pub fn kind(&self) -> LifecycleKind {
        match self {
            Self::CombatStarted { .. } => LifecycleKind::CombatStarted,
            Self::CombatEnded { .. } => LifecycleKind::CombatEnded,
            Self::RoundStarted { .. } => LifecycleKind::RoundStarted,
            Self::RoundEnded { .. } => LifecycleKind::RoundEnded,
            Self::TurnStarted { .. } => LifecycleKind::TurnStarted,
            Self::TurnEnded { .. } => LifecycleKind::TurnEnded,
        }
    }

    /// Round number the event belongs to.
    pub fn round(&self) -> u32 {
        match self {
            Self::CombatStarted { round }
            | Self::CombatEnded { round }
            | Self::RoundStarted { round }
            | Self::RoundEnded { round }
            | Self::TurnStarted { round, .. }
            | Self::TurnEnded { round, .. } => *round,
        }
    }

    /// Acting combatant, for turn-scoped events.
    pub fn combatant(&self) -> Option<&CombatantRef> {
        match self {
            Self::TurnStarted { combatant, .. } | Self::TurnEnded { combatant, .. } => {
                Some(combatant)
            }
            _ => None,
        }
    }
}
