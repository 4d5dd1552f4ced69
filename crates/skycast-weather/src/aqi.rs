//! Air quality index as reported by `/air_pollution` (1 = good .. 5 = very poor).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AirQualityIndex {
    Good = 1,
    Fair = 2,
    Moderate = 3,
    Poor = 4,
    VeryPoor = 5,
}

impl AirQualityIndex {
    /// `None` for anything outside 1..=5, which the UI treats as unknown.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Good),
            2 => Some(Self::Fair),
            3 => Some(Self::Moderate),
            4 => Some(Self::Poor),
            5 => Some(Self::VeryPoor),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(AirQualityIndex::from_value(1), Some(AirQualityIndex::Good));
        assert_eq!(AirQualityIndex::from_value(3), Some(AirQualityIndex::Moderate));
        assert_eq!(AirQualityIndex::from_value(5), Some(AirQualityIndex::VeryPoor));
        assert_eq!(AirQualityIndex::Poor.value(), 4);
    }

    #[test]
    fn test_out_of_range_is_unknown() {
        assert_eq!(AirQualityIndex::from_value(0), None);
        assert_eq!(AirQualityIndex::from_value(6), None);
        assert_eq!(AirQualityIndex::from_value(-1), None);
    }
}
