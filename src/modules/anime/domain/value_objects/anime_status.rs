use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::AnimeStatus"]
pub enum AnimeStatus {
    #[db_rename = "Ongoing"]
    Ongoing,
    #[db_rename = "Finished"]
    Finished,
    #[db_rename = "Upcoming"]
    Upcoming,
}

impl AnimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimeStatus::Ongoing => "Ongoing",
            AnimeStatus::Finished => "Finished",
            AnimeStatus::Upcoming => "Upcoming",
        }
    }

    /// Not yet released; allowed a later year and an unknown episode count.
    pub fn is_upcoming(&self) -> bool {
        matches!(self, AnimeStatus::Upcoming)
    }
}

impl fmt::Display for AnimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ongoing" | "airing" => Ok(AnimeStatus::Ongoing),
            "finished" => Ok(AnimeStatus::Finished),
            "upcoming" | "not yet aired" => Ok(AnimeStatus::Upcoming),
            other => Err(AppError::Validation(format!(
                "Unknown anime status '{}'",
                other
            ))),
        }
    }
}
