//! Festival identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a festival scene
///
/// The six festivals form a closed set; `Default` is the no-op fallback
/// used for identifiers outside that set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FestivalId {
    /// Diwali, festival of lights
    Diwali,
    /// Holi, festival of colours
    Holi,
    /// Navratri, nine nights of dance
    Navratri,
    /// Ganesh Chaturthi
    Ganesh,
    /// Dussehra, victory over Ravana
    Dussehra,
    /// Kumbh Mela, the holy dip
    Kumbh,
    /// Fallback stage for unknown identifiers
    Default,
}

/// Identifier outside the known set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown festival '{0}'")]
pub struct UnknownFestival(pub String);

impl FestivalId {
    /// Every real festival, in menu order
    pub const ALL: [FestivalId; 6] = [
        FestivalId::Diwali,
        FestivalId::Holi,
        FestivalId::Navratri,
        FestivalId::Ganesh,
        FestivalId::Dussehra,
        FestivalId::Kumbh,
    ];

    /// Stable selector string
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Diwali => "diwali",
            Self::Holi => "holi",
            Self::Navratri => "navratri",
            Self::Ganesh => "ganesh",
            Self::Dussehra => "dussehra",
            Self::Kumbh => "kumbh",
            Self::Default => "default",
        }
    }

    /// Name shown to people
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Diwali => "Diwali",
            Self::Holi => "Holi",
            Self::Navratri => "Navratri",
            Self::Ganesh => "Ganesh Chaturthi",
            Self::Dussehra => "Dussehra",
            Self::Kumbh => "Kumbh Mela",
            Self::Default => "Festivals of India",
        }
    }

    /// Resolve a selector, falling back to [`FestivalId::Default`]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|UnknownFestival(name)| {
            log::warn!("Unknown festival '{}', falling back to default scene", name);
            Self::Default
        })
    }
}

impl FromStr for FestivalId {
    type Err = UnknownFestival;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diwali" => Ok(Self::Diwali),
            "holi" => Ok(Self::Holi),
            "navratri" => Ok(Self::Navratri),
            "ganesh" => Ok(Self::Ganesh),
            "dussehra" => Ok(Self::Dussehra),
            "kumbh" => Ok(Self::Kumbh),
            "default" => Ok(Self::Default),
            _ => Err(UnknownFestival(s.to_string())),
        }
    }
}

impl fmt::Display for FestivalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
