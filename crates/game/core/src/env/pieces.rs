//! Capability interface for the positioned pieces combatants wrap.
//!
//! The scheduler never owns piece data. Everything it needs to know about a
//! piece comes through [`PieceOracle`], which any board/token adapter
//! implements.

use std::collections::HashMap;

use crate::state::{Disposition, PieceId};

/// Capability set every positioned-piece adapter must provide.
///
/// Each method returns `None` when the adapter does not know the piece; the
/// engine then falls back to conservative defaults (see
/// [`crate::state::Combatant`]).
pub trait PieceOracle: Send + Sync {
    /// Current disposition of the piece.
    fn disposition(&self, piece: PieceId) -> Option<Disposition>;

    /// Number of turns the piece may take per round.
    fn action_budget(&self, piece: PieceId) -> Option<u32>;

    /// Whether the piece is currently defeated.
    fn is_defeated(&self, piece: PieceId) -> Option<bool>;
}

/// Capabilities of a single piece, as stored by [`PieceTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceProfile {
    pub disposition: Disposition,
    pub action_budget: u32,
    pub defeated: bool,
}

impl PieceProfile {
    pub const fn new(disposition: Disposition) -> Self {
        Self {
            disposition,
            action_budget: 1,
            defeated: false,
        }
    }

    pub const fn with_action_budget(mut self, action_budget: u32) -> Self {
        self.action_budget = action_budget;
        self
    }

    pub const fn with_defeated(mut self, defeated: bool) -> Self {
        self.defeated = defeated;
        self
    }
}

/// Plain in-memory piece oracle.
///
/// Holds owned profiles and hands them out by value. Mutation requires
/// `&mut self`; adapters that are shared across threads wrap their own
/// storage instead.
#[derive(Clone, Debug, Default)]
pub struct PieceTable {
    pieces: HashMap<PieceId, PieceProfile>,
}

impl PieceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the profile for a piece.
    pub fn insert(&mut self, piece: PieceId, profile: PieceProfile) {
        self.pieces.insert(piece, profile);
    }

    pub fn set_disposition(&mut self, piece: PieceId, disposition: Disposition) {
        if let Some(profile) = self.pieces.get_mut(&piece) {
            profile.disposition = disposition;
        }
    }

    pub fn set_defeated(&mut self, piece: PieceId, defeated: bool) {
        if let Some(profile) = self.pieces.get_mut(&piece) {
            profile.defeated = defeated;
        }
    }
}

impl PieceOracle for PieceTable {
    fn disposition(&self, piece: PieceId) -> Option<Disposition> {
        self.pieces.get(&piece).map(|p| p.disposition)
    }

    fn action_budget(&self, piece: PieceId) -> Option<u32> {
        self.pieces.get(&piece).map(|p| p.action_budget)
    }

    fn is_defeated(&self, piece: PieceId) -> Option<bool> {
        self.pieces.get(&piece).map(|p| p.defeated)
    }
}
