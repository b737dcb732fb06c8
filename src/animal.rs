use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
};

/// One face of a Bầu Cua die. Declaration order is the catalog order and
/// decides card positions (crab is position 1, gourd is position 6).
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Animal {
    Crab,
    Fish,
    Shrimp,
    Deer,
    Rooster,
    Gourd,
}

impl Animal {
    pub const ALL: [Animal; 6] = [
        Animal::Crab,
        Animal::Fish,
        Animal::Shrimp,
        Animal::Deer,
        Animal::Rooster,
        Animal::Gourd,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Animal::Crab => "crab",
            Animal::Fish => "fish",
            Animal::Shrimp => "shrimp",
            Animal::Deer => "deer",
            Animal::Rooster => "rooster",
            Animal::Gourd => "gourd",
        }
    }

    pub fn vietnamese(self) -> &'static str {
        match self {
            Animal::Crab => "Cua",
            Animal::Fish => "Cá",
            Animal::Shrimp => "Tôm",
            Animal::Deer => "Nai",
            Animal::Rooster => "Gà",
            Animal::Gourd => "Bầu",
        }
    }

    /// Card position on the table, 1-based.
    pub fn position(self) -> u8 {
        match self {
            Animal::Crab => 1,
            Animal::Fish => 2,
            Animal::Shrimp => 3,
            Animal::Deer => 4,
            Animal::Rooster => 5,
            Animal::Gourd => 6,
        }
    }

    pub fn from_position(position: u8) -> Option<Animal> {
        match position {
            1..=6 => Some(Animal::ALL[usize::from(position) - 1]),
            _ => None,
        }
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown animal '{0}'")]
pub struct UnknownAnimal(pub String);

impl FromStr for Animal {
    type Err = UnknownAnimal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Animal::ALL
            .into_iter()
            .find(|a| a.id() == wanted)
            .ok_or_else(|| UnknownAnimal(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_catalog_order() {
        for (idx, animal) in Animal::ALL.iter().enumerate() {
            assert_eq!(usize::from(animal.position()), idx + 1);
            assert_eq!(Animal::from_position(animal.position()), Some(*animal));
        }
        assert_eq!(Animal::from_position(0), None);
        assert_eq!(Animal::from_position(7), None);
    }

    #[test]
    fn parses_ids_case_insensitively() {
        assert_eq!("Rooster".parse::<Animal>(), Ok(Animal::Rooster));
        assert_eq!(" gourd ".parse::<Animal>(), Ok(Animal::Gourd));
        assert!("dragon".parse::<Animal>().is_err());
    }
}
