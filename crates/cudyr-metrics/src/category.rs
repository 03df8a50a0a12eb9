//! The validated CUDYR category code
//!
//! A category combines a risk tier (`A` highest to `D` lowest) with a
//! dependency tier (`1` highest to `3` lowest) into a two-character code
//! such as `"B2"`. [`Category`] is well-formed by construction; parsing
//! rejects anything that does not match the exact `{A-D}{1-3}` shape.
//!
//! The derived `Ord` follows the fixed severity display ranking: `A1`
//! sorts first, `D3` last.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Risk tier of a category (first character, `A` = highest risk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    A,
    B,
    C,
    D,
}

impl RiskTier {
    /// Weight contributed to the complexity score (A=4, B=3, C=2, D=1).
    #[must_use]
    pub fn weight(self) -> u8 {
        match self {
            RiskTier::A => 4,
            RiskTier::B => 3,
            RiskTier::C => 2,
            RiskTier::D => 1,
        }
    }

    /// High risk covers tiers A and B.
    #[must_use]
    pub fn is_high_risk(self) -> bool {
        matches!(self, RiskTier::A | RiskTier::B)
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(RiskTier::A),
            'B' => Some(RiskTier::B),
            'C' => Some(RiskTier::C),
            'D' => Some(RiskTier::D),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            RiskTier::A => 'A',
            RiskTier::B => 'B',
            RiskTier::C => 'C',
            RiskTier::D => 'D',
        }
    }
}

/// Dependency tier of a category (second character, `1` = highest
/// dependency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DependencyTier {
    /// Digit `1`: total dependency.
    Total,
    /// Digit `2`: partial dependency.
    Partial,
    /// Digit `3`: minimal dependency.
    Minimal,
}

impl DependencyTier {
    /// Weight contributed to the complexity score (1=3, 2=2, 3=1).
    #[must_use]
    pub fn weight(self) -> u8 {
        match self {
            DependencyTier::Total => 3,
            DependencyTier::Partial => 2,
            DependencyTier::Minimal => 1,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(DependencyTier::Total),
            '2' => Some(DependencyTier::Partial),
            '3' => Some(DependencyTier::Minimal),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            DependencyTier::Total => '1',
            DependencyTier::Partial => '2',
            DependencyTier::Minimal => '3',
        }
    }
}

/// A well-formed two-character CUDYR category code.
///
/// # Examples
///
/// ```
/// use cudyr_metrics::category::Category;
///
/// let category: Category = "B1".parse().unwrap();
/// assert_eq!(category.complexity_score(), 6);
/// assert!(category.is_high_risk());
/// assert_eq!(category.to_string(), "B1");
///
/// assert!("X9".parse::<Category>().is_err());
/// assert!("A12".parse::<Category>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category {
    /// Risk tier (first character).
    pub risk: RiskTier,
    /// Dependency tier (second character).
    pub dependency: DependencyTier,
}

impl Category {
    /// The maximum-severity code, `A1`.
    pub const MAX_RISK: Category = Category {
        risk: RiskTier::A,
        dependency: DependencyTier::Total,
    };

    #[must_use]
    pub fn new(risk: RiskTier, dependency: DependencyTier) -> Self {
        Self { risk, dependency }
    }

    /// Composite severity score: risk weight plus dependency weight.
    ///
    /// Always in `[2, 7]` for a well-formed category; higher means more
    /// complex care.
    #[must_use]
    pub fn complexity_score(self) -> u8 {
        self.risk.weight() + self.dependency.weight()
    }

    /// Whether the risk tier is A or B.
    #[must_use]
    pub fn is_high_risk(self) -> bool {
        self.risk.is_high_risk()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.risk.as_char(), self.dependency.as_char())
    }
}

/// Error for a code that does not match the `{A-D}{1-3}` shape.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("malformed category code '{code}': expected a letter A-D followed by a digit 1-3")]
pub struct MalformedCategory {
    /// The offending code, as found in the source.
    pub code: String,
}

impl FromStr for Category {
    type Err = MalformedCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if let [letter, digit] = chars[..]
            && let Some(risk) = RiskTier::from_char(letter)
            && let Some(dependency) = DependencyTier::from_char(digit)
        {
            return Ok(Self { risk, dependency });
        }
        Err(MalformedCategory { code: s.to_owned() })
    }
}

// Serialized as the two-character code so categories read naturally in
// JSON output and can key JSON objects.
impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_well_formed_codes() {
        for letter in ['A', 'B', 'C', 'D'] {
            for digit in ['1', '2', '3'] {
                let code = format!("{letter}{digit}");
                let category: Category = code.parse().unwrap();
                assert_eq!(category.to_string(), code);
            }
        }
    }

    #[test]
    fn test_parse_rejects_malformed_codes() {
        for code in ["", "A", "1A", "E1", "A4", "A0", "a1", "A1 ", "A11"] {
            assert!(code.parse::<Category>().is_err(), "accepted {code:?}");
        }
    }

    #[test]
    fn test_complexity_score_range() {
        for letter in ['A', 'B', 'C', 'D'] {
            for digit in ['1', '2', '3'] {
                let category: Category = format!("{letter}{digit}").parse().unwrap();
                let score = category.complexity_score();
                assert!((2..=7).contains(&score), "{category} scored {score}");
            }
        }
        let a1: Category = "A1".parse().unwrap();
        let d3: Category = "D3".parse().unwrap();
        assert_eq!(a1.complexity_score(), 7);
        assert_eq!(d3.complexity_score(), 2);
    }

    #[test]
    fn test_high_risk_is_a_or_b() {
        assert!("A3".parse::<Category>().unwrap().is_high_risk());
        assert!("B2".parse::<Category>().unwrap().is_high_risk());
        assert!(!"C1".parse::<Category>().unwrap().is_high_risk());
        assert!(!"D1".parse::<Category>().unwrap().is_high_risk());
    }

    #[test]
    fn test_ordering_is_severity_rank() {
        let mut codes: Vec<Category> = ["C2", "A1", "D3", "B1", "A3"]
            .iter()
            .map(|c| c.parse().unwrap())
            .collect();
        codes.sort();
        let sorted: Vec<String> = codes.iter().map(Category::to_string).collect();
        assert_eq!(sorted, vec!["A1", "A3", "B1", "C2", "D3"]);
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let category: Category = "B3".parse().unwrap();
        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, "\"B3\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, category);
    }
}
