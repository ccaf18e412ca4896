//! Sort tokens accepted by the anime listing
//!
//! Column names and the direction keyword cannot be bound as parameters, so
//! the listing only ever sees a `SortOrder` built from this safelist. An
//! unknown token is rejected here, before any SQL exists.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Id,
    Title,
    Year,
    Episodes,
    Duration,
    CreatedAt,
}

/// Token -> column. A leading `-` on the token selects descending order.
const SORT_SAFELIST: &[(&str, SortColumn)] = &[
    ("id", SortColumn::Id),
    ("title", SortColumn::Title),
    ("year", SortColumn::Year),
    ("episodes", SortColumn::Episodes),
    ("duration", SortColumn::Duration),
    ("created_at", SortColumn::CreatedAt),
];

impl SortColumn {
    /// Qualified column for ORDER BY
    pub fn column_sql(&self) -> &'static str {
        match self {
            SortColumn::Id => "a.id",
            SortColumn::Title => "a.title",
            SortColumn::Year => "a.year",
            SortColumn::Episodes => "a.episodes",
            SortColumn::Duration => "a.duration",
            SortColumn::CreatedAt => "a.created_at",
        }
    }

    pub fn token(&self) -> &'static str {
        SORT_SAFELIST
            .iter()
            .find(|(_, column)| column == self)
            .map(|(token, _)| *token)
            .unwrap_or("id")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl SortOrder {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Every token `parse` accepts, ascending then descending
    pub fn safelist() -> Vec<String> {
        SORT_SAFELIST
            .iter()
            .map(|(token, _)| token.to_string())
            .chain(SORT_SAFELIST.iter().map(|(token, _)| format!("-{}", token)))
            .collect()
    }

    pub fn parse(token: &str) -> Result<Self, AppError> {
        let (name, direction) = match token.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Desc),
            None => (token, SortDirection::Asc),
        };

        SORT_SAFELIST
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, column)| Self::new(*column, direction))
            .ok_or_else(|| AppError::Validation(format!("Invalid sort value '{}'", token)))
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => write!(f, "{}", self.column.token()),
            SortDirection::Desc => write!(f, "-{}", self.column.token()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ascending_and_descending_tokens() {
        assert_eq!(
            SortOrder::parse("title").unwrap(),
            SortOrder::new(SortColumn::Title, SortDirection::Asc)
        );
        assert_eq!(
            SortOrder::parse("-year").unwrap(),
            SortOrder::new(SortColumn::Year, SortDirection::Desc)
        );
    }

    #[test]
    fn rejects_tokens_outside_the_safelist() {
        for token in ["", "-", "rating", "Title", "title;DROP TABLE anime", "--id", "a.id"] {
            assert!(SortOrder::parse(token).is_err(), "token {:?} accepted", token);
        }
    }

    #[test]
    fn display_round_trips_every_safelisted_token() {
        for token in SortOrder::safelist() {
            assert_eq!(SortOrder::parse(&token).unwrap().to_string(), token);
        }
        assert_eq!(SortOrder::safelist().len(), 12);
    }

    #[test]
    fn default_sorts_by_id() {
        assert_eq!(SortOrder::default().to_string(), "id");
    }
}
