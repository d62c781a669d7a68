//! Administrative districts a stop may belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::error::DomainError;

/// The fourteen districts of Kerala, numbered as persisted (1..=14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum District {
    Thiruvananthapuram = 1,
    Kollam = 2,
    Pathanamthitta = 3,
    Alappuzha = 4,
    Kottayam = 5,
    Idukki = 6,
    Ernakulam = 7,
    Thrissur = 8,
    Palakkad = 9,
    Malappuram = 10,
    Kozhikode = 11,
    Wayanad = 12,
    Kannur = 13,
    Kasaragod = 14,
}

const ALL: [District; 14] = [
    District::Thiruvananthapuram,
    District::Kollam,
    District::Pathanamthitta,
    District::Alappuzha,
    District::Kottayam,
    District::Idukki,
    District::Ernakulam,
    District::Thrissur,
    District::Palakkad,
    District::Malappuram,
    District::Kozhikode,
    District::Wayanad,
    District::Kannur,
    District::Kasaragod,
];

impl District {
    pub fn name(self) -> &'static str {
        match self {
            District::Thiruvananthapuram => "Thiruvananthapuram",
            District::Kollam => "Kollam",
            District::Pathanamthitta => "Pathanamthitta",
            District::Alappuzha => "Alappuzha",
            District::Kottayam => "Kottayam",
            District::Idukki => "Idukki",
            District::Ernakulam => "Ernakulam",
            District::Thrissur => "Thrissur",
            District::Palakkad => "Palakkad",
            District::Malappuram => "Malappuram",
            District::Kozhikode => "Kozhikode",
            District::Wayanad => "Wayanad",
            District::Kannur => "Kannur",
            District::Kasaragod => "Kasaragod",
        }
    }
}

impl FromStr for District {
    type Err = DomainError;

    /// Accepts either the district name (case-insensitive) or its number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| ALL.get(i).copied())
                .ok_or_else(|| DomainError::InvalidDistrict(s.to_string()));
        }
        ALL.iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidDistrict(s.to_string()))
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for District {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_name_and_number() {
        assert_eq!("Ernakulam".parse::<District>().unwrap(), District::Ernakulam);
        assert_eq!("kannur".parse::<District>().unwrap(), District::Kannur);
        assert_eq!("1".parse::<District>().unwrap(), District::Thiruvananthapuram);
        assert_eq!("14".parse::<District>().unwrap(), District::Kasaragod);
    }

    #[test]
    fn rejects_unknown() {
        assert!("0".parse::<District>().is_err());
        assert!("15".parse::<District>().is_err());
        assert!("Chennai".parse::<District>().is_err());
    }

    #[test]
    fn numbering_matches_discriminants() {
        for (i, d) in ALL.iter().enumerate() {
            assert_eq!(*d as usize, i + 1);
        }
    }
}
