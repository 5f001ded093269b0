//! Shared piece registry backing [`PieceOracle`].

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use combat_core::{Disposition, PieceId, PieceOracle, PieceProfile};
use tracing::warn;

/// Thread-safe piece capabilities, mutable while the host is running.
///
/// Gameplay outside the scheduler (a charm spell, a knockout) updates pieces
/// here; the scheduler picks the change up on its next evaluation.
#[derive(Debug, Default)]
pub struct PieceRegistry {
    pieces: RwLock<HashMap<PieceId, PieceProfile>>,
}

impl PieceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Profiles are plain values written whole, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<PieceId, PieceProfile>> {
        self.pieces.read().unwrap_or_else(|poisoned| {
            warn!("piece registry lock poisoned; reading recovered data");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PieceId, PieceProfile>> {
        self.pieces.write().unwrap_or_else(|poisoned| {
            warn!("piece registry lock poisoned; writing recovered data");
            poisoned.into_inner()
        })
    }

    /// Inserts or replaces the profile for a piece.
    pub fn insert(&self, piece: PieceId, profile: PieceProfile) {
        self.write().insert(piece, profile);
    }

    /// Applies `update` to a known piece. Returns false if the piece is unknown.
    fn update(&self, piece: PieceId, update: impl FnOnce(&mut PieceProfile)) -> bool {
        match self.write().get_mut(&piece) {
            Some(profile) => {
                update(profile);
                true
            }
            None => false,
        }
    }

    pub fn set_disposition(&self, piece: PieceId, disposition: Disposition) -> bool {
        self.update(piece, |profile| profile.disposition = disposition)
    }

    pub fn set_defeated(&self, piece: PieceId, defeated: bool) -> bool {
        self.update(piece, |profile| profile.defeated = defeated)
    }

    pub fn set_action_budget(&self, piece: PieceId, action_budget: u32) -> bool {
        self.update(piece, |profile| profile.action_budget = action_budget)
    }

    pub fn profile(&self, piece: PieceId) -> Option<PieceProfile> {
        self.read().get(&piece).copied()
    }
}

impl PieceOracle for PieceRegistry {
    fn disposition(&self, piece: PieceId) -> Option<Disposition> {
        self.profile(piece).map(|p| p.disposition)
    }

    fn action_budget(&self, piece: PieceId) -> Option<u32> {
        self.profile(piece).map(|p| p.action_budget)
    }

    fn is_defeated(&self, piece: PieceId) -> Option<bool> {
        self.profile(piece).map(|p| p.defeated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_only_known_pieces() {
        let registry = PieceRegistry::new();
        registry.insert(PieceId(1), PieceProfile::new(Disposition::Friendly));

        assert!(registry.set_defeated(PieceId(1), true));
        assert!(!registry.set_defeated(PieceId(2), true));

        assert_eq!(registry.is_defeated(PieceId(1)), Some(true));
        assert_eq!(registry.is_defeated(PieceId(2)), None);
        assert_eq!(registry.disposition(PieceId(1)), Some(Disposition::Friendly));
    }

    #[test]
    fn poisoned_lock_keeps_recorded_profiles() {
        let registry = PieceRegistry::new();
        registry.insert(
            PieceId(1),
            PieceProfile::new(Disposition::Friendly).with_action_budget(3),
        );

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = registry.pieces.write().unwrap();
            panic!("writer panicked while holding the lock");
        }));
        assert!(poisoned.is_err());
        assert!(registry.pieces.is_poisoned());

        assert_eq!(registry.disposition(PieceId(1)), Some(Disposition::Friendly));
        assert_eq!(registry.action_budget(PieceId(1)), Some(3));
        assert!(registry.set_defeated(PieceId(1), true));
        assert_eq!(registry.is_defeated(PieceId(1)), Some(true));
    }
}
