use crate::err::ConfError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How much a run may trade faithfulness for readability.
///
/// Levels are cumulative: each one runs every transform of the levels below it, then its own.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Safety {
    #[value(alias = "0")]
    Useless,
    #[default]
    #[value(alias = "1")]
    Safe,
    #[value(alias = "2")]
    MostlySafe,
    #[value(alias = "3")]
    Unsafe,
    #[value(alias = "4")]
    WildlyUnsafe,
}

impl Safety {
    pub const ALL: [Safety; 5] =
        [Safety::Useless, Safety::Safe, Safety::MostlySafe, Safety::Unsafe, Safety::WildlyUnsafe];

    pub fn ordinal(self) -> u8 {
        self as u8
    }
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
    pub fn name(self) -> &'static str {
        match self {
            | Safety::Useless => "useless",
            | Safety::Safe => "safe",
            | Safety::MostlySafe => "mostly-safe",
            | Safety::Unsafe => "unsafe",
            | Safety::WildlyUnsafe => "wildly-unsafe",
        }
    }
    /// The transforms this level adds on top of the levels below it.
    pub fn own_transforms(self) -> &'static [&'static str] {
        match self {
            | Safety::Useless => &[],
            | Safety::Safe => &["normalize", "restructure", "eliminate-dead"],
            | Safety::MostlySafe => &[],
            | Safety::Unsafe => &["eliminate-unused"],
            | Safety::WildlyUnsafe => &["inline-constants", "partial-evaluate"],
        }
    }
    /// Every transform this level runs, lowest level first.
    pub fn transforms(self) -> Vec<&'static str> {
        Self::ALL
            .into_iter()
            .take_while(|level| *level <= self)
            .flat_map(|level| level.own_transforms().iter().copied())
            .collect()
    }
}

impl fmt::Display for Safety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Safety {
    type Err = ConfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ordinal) = s.parse::<u8>() {
            return Self::from_ordinal(ordinal).ok_or_else(|| ConfError::UnknownSafety(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfError::UnknownSafety(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_ordinals() {
        for level in Safety::ALL {
            assert_eq!(level.name().parse::<Safety>(), Ok(level));
            assert_eq!(level.ordinal().to_string().parse::<Safety>(), Ok(level));
        }
        assert_eq!("Wildly-Unsafe".parse::<Safety>(), Ok(Safety::WildlyUnsafe));
        assert_eq!("5".parse::<Safety>(), Err(ConfError::UnknownSafety("5".to_string())));
        assert_eq!("reckless".parse::<Safety>(), Err(ConfError::UnknownSafety("reckless".to_string())));
    }

    #[test]
    fn levels_accumulate() {
        assert!(Safety::Useless.transforms().is_empty());
        assert_eq!(Safety::Safe.transforms(), Safety::MostlySafe.transforms());
        assert_eq!(
            Safety::WildlyUnsafe.transforms(),
            [
                "normalize",
                "restructure",
                "eliminate-dead",
                "eliminate-unused",
                "inline-constants",
                "partial-evaluate",
            ]
        );
    }

    #[test]
    fn command_line_spelling() {
        assert_eq!(<Safety as ValueEnum>::from_str("mostly-safe", false), Ok(Safety::MostlySafe));
        assert_eq!(<Safety as ValueEnum>::from_str("3", false), Ok(Safety::Unsafe));
    }
}
