use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Anime season enum for better type safety
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::AnimeSeason"]
pub enum Season {
    #[db_rename = "Spring"]
    Spring,
    #[db_rename = "Summer"]
    Summer,
    #[db_rename = "Fall"]
    Fall,
    #[db_rename = "Winter"]
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Winter => "Winter",
        }
    }

    /// Get season from month (1-12)
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Self::Winter),
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Fall),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = AppError;

    /// Case insensitive; "autumn" is accepted for Fall
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" | "autumn" => Ok(Self::Fall),
            "winter" => Ok(Self::Winter),
            other => Err(AppError::Validation(format!("Unknown season '{}'", other))),
        }
    }
}
