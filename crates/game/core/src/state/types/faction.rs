/// Disposition of a positioned piece toward the players' side.
///
/// Disposition belongs to the piece, not to the scheduler, and may change at
/// any point during an encounter (charm effects, betrayal, a game master
/// flipping a token).
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Disposition {
    /// Allied with the players
    Friendly,
    /// Neither allied nor opposed
    #[default]
    Neutral,
    /// Opposed to the players
    Hostile,
    /// Hidden from players
    Secret,
}

/// One of the two sides of an encounter.
///
/// This is a strict two-sided scheduler: there is no third value.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    Friendly,
    Hostile,
}

impl Faction {
    /// Resolves the faction a piece with the given disposition fights for.
    ///
    /// Only [`Disposition::Friendly`] maps to [`Faction::Friendly`]; every other
    /// disposition lands on the hostile side.
    pub const fn from_disposition(disposition: Disposition) -> Self {
        match disposition {
            Disposition::Friendly => Self::Friendly,
            Disposition::Neutral | Disposition::Hostile | Disposition::Secret => Self::Hostile,
        }
    }

    /// Returns the opposing side.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Friendly => Self::Hostile,
            Self::Hostile => Self::Friendly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_friendly_disposition_is_friendly() {
        assert_eq!(
            Faction::from_disposition(Disposition::Friendly),
            Faction::Friendly
        );
        assert_eq!(
            Faction::from_disposition(Disposition::Neutral),
            Faction::Hostile
        );
        assert_eq!(
            Faction::from_disposition(Disposition::Hostile),
            Faction::Hostile
        );
        assert_eq!(
            Faction::from_disposition(Disposition::Secret),
            Faction::Hostile
        );
    }

    #[test]
    fn opposite_is_an_involution() {
        assert_eq!(Faction::Friendly.opposite(), Faction::Hostile);
        assert_eq!(Faction::Hostile.opposite(), Faction::Friendly);
        assert_eq!(Faction::Hostile.opposite().opposite(), Faction::Hostile);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HOSTILE".parse::<Faction>(), Ok(Faction::Hostile));
        assert_eq!("friendly".parse::<Disposition>(), Ok(Disposition::Friendly));
        assert!("neutral".parse::<Faction>().is_err());
    }
}
