use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::AnimeType"]
pub enum AnimeType {
    #[db_rename = "TV"]
    #[serde(rename = "TV")]
    Tv,
    #[db_rename = "Movie"]
    Movie,
    #[db_rename = "OVA"]
    #[serde(rename = "OVA")]
    Ova,
    #[db_rename = "ONA"]
    #[serde(rename = "ONA")]
    Ona,
    #[db_rename = "Special"]
    Special,
}

impl AnimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimeType::Tv => "TV",
            AnimeType::Movie => "Movie",
            AnimeType::Ova => "OVA",
            AnimeType::Ona => "ONA",
            AnimeType::Special => "Special",
        }
    }
}

impl fmt::Display for AnimeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimeType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tv" => Ok(AnimeType::Tv),
            "movie" => Ok(AnimeType::Movie),
            "ova" => Ok(AnimeType::Ova),
            "ona" => Ok(AnimeType::Ona),
            "special" => Ok(AnimeType::Special),
            other => Err(AppError::Validation(format!(
                "Unknown anime type '{}'",
                other
            ))),
        }
    }
}
