//! Priority level value object (1-5 scale).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A user-chosen importance or sensitivity between 1 and 5 inclusive.
///
/// Out-of-range input is clamped, never rejected. That holds for
/// deserialized values too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PriorityLevel(u8);

impl PriorityLevel {
    /// Lowest level.
    pub const MIN: Self = Self(1);

    /// Neutral level used for every context field by default.
    pub const NEUTRAL: Self = Self(3);

    /// Highest level.
    pub const MAX: Self = Self(5);

    /// Creates a new PriorityLevel, clamping to the valid range.
    pub fn new(value: i32) -> Self {
        Self(value.clamp(1, 5) as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the value as f64 for weighting.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for PriorityLevel {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl<'de> Deserialize<'de> for PriorityLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(|raw| Self(raw.clamp(1, 5) as u8))
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_valid_values() {
        for value in 1..=5 {
            assert_eq!(PriorityLevel::new(value).value(), value as u8);
        }
    }

    #[test]
    fn new_clamps_out_of_range() {
        assert_eq!(PriorityLevel::new(0), PriorityLevel::MIN);
        assert_eq!(PriorityLevel::new(-40), PriorityLevel::MIN);
        assert_eq!(PriorityLevel::new(6), PriorityLevel::MAX);
        assert_eq!(PriorityLevel::new(i32::MAX), PriorityLevel::MAX);
    }

    #[test]
    fn deserialize_clamps_out_of_range() {
        let low: PriorityLevel = serde_json::from_str("0").unwrap();
        let high: PriorityLevel = serde_json::from_str("200").unwrap();
        let huge: PriorityLevel = serde_json::from_str("-9000000000").unwrap();
        assert_eq!(low, PriorityLevel::MIN);
        assert_eq!(high, PriorityLevel::MAX);
        assert_eq!(huge, PriorityLevel::MIN);
        assert_eq!(serde_json::from_str::<PriorityLevel>("4").unwrap().value(), 4);
    }

    #[test]
    fn default_is_neutral() {
        assert_eq!(PriorityLevel::default().value(), 3);
    }

    #[test]
    fn displays_on_five_point_scale() {
        assert_eq!(format!("{}", PriorityLevel::new(4)), "4/5");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&PriorityLevel::new(2)).unwrap();
        assert_eq!(json, "2");
    }
}
