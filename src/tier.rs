//! Subscription tiers
//!
//! CoinMarketCap plans are totally ordered by capability, so a key of a given
//! tier can call every endpoint gated at that tier or below.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CmcError;

/// API key subscription tier, ordered from least to most capable
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Basic,
    Hobbyist,
    Startup,
    Standard,
    Professional,
    Enterprise,
}

impl Tier {
    /// Every tier in ascending order
    pub const ALL: [Tier; 6] = [
        Tier::Basic,
        Tier::Hobbyist,
        Tier::Startup,
        Tier::Standard,
        Tier::Professional,
        Tier::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Hobbyist => "hobbyist",
            Tier::Startup => "startup",
            Tier::Standard => "standard",
            Tier::Professional => "professional",
            Tier::Enterprise => "enterprise",
        }
    }

    /// Whether a key of this tier may call an endpoint requiring `required`
    pub fn satisfies(&self, required: Tier) -> bool {
        *self >= required
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = CmcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CmcError::UnknownTier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Tier::Basic < Tier::Hobbyist);
        assert!(Tier::Hobbyist < Tier::Startup);
        assert!(Tier::Startup < Tier::Standard);
        assert!(Tier::Standard < Tier::Professional);
        assert!(Tier::Professional < Tier::Enterprise);

        let mut shuffled = vec![Tier::Enterprise, Tier::Basic, Tier::Standard, Tier::Startup];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Tier::Basic, Tier::Startup, Tier::Standard, Tier::Enterprise]
        );
    }

    #[test]
    fn test_satisfies() {
        assert!(Tier::Enterprise.satisfies(Tier::Basic));
        assert!(Tier::Startup.satisfies(Tier::Startup));
        assert!(!Tier::Hobbyist.satisfies(Tier::Startup));
        assert!(!Tier::Professional.satisfies(Tier::Enterprise));
    }

    #[test]
    fn test_parse_round_trips_display() {
        for tier in Tier::ALL {
            assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
        }
        assert_eq!(" Enterprise ".parse::<Tier>().unwrap(), Tier::Enterprise);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "platinum".parse::<Tier>().unwrap_err();
        assert!(matches!(err, CmcError::UnknownTier(ref s) if s == "platinum"));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Startup).unwrap(), "\"startup\"");
        let tier: Tier = serde_json::from_str("\"professional\"").unwrap();
        assert_eq!(tier, Tier::Professional);
    }
}
