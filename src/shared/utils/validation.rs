use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{Datelike, Utc};
use regex::Regex;

use crate::shared::config::TagCase;
use crate::shared::errors::AppError;

pub const MAX_TITLE_BYTES: usize = 500;
pub const MIN_YEAR: i32 = 1917;
pub const MIN_TAGS: usize = 1;
pub const MAX_TAGS: usize = 15;
pub const MAX_TAG_BYTES: usize = 50;
pub const MAX_PAGE: u32 = 10_000_000;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Years past the current one a released title may claim
const RELEASED_YEAR_SLACK: i32 = 1;
/// Years past the current one an upcoming title may be announced for
const UPCOMING_YEAR_SLACK: i32 = 5;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} '\-]*$").expect("tag pattern is a valid regex")
    })
}

pub struct Validator;

impl Validator {
    pub fn validate_anime_title(title: &str) -> Result<(), AppError> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        if title.len() > MAX_TITLE_BYTES {
            return Err(AppError::Validation(format!(
                "Title too long (max {} bytes)",
                MAX_TITLE_BYTES
            )));
        }
        Ok(())
    }

    pub fn validate_positive(field: &str, value: Option<i32>) -> Result<(), AppError> {
        match value {
            Some(v) if v <= 0 => Err(AppError::Validation(format!(
                "{} must be a positive integer",
                field
            ))),
            _ => Ok(()),
        }
    }

    /// `upcoming` titles may be dated further into the future than released ones.
    pub fn validate_year(year: Option<i32>, upcoming: bool) -> Result<(), AppError> {
        let Some(year) = year else {
            return Ok(());
        };
        if year < MIN_YEAR {
            return Err(AppError::Validation(format!(
                "Year must be greater than or equal to {}",
                MIN_YEAR
            )));
        }

        let current = Utc::now().year();
        let latest = if upcoming {
            current + UPCOMING_YEAR_SLACK
        } else {
            current + RELEASED_YEAR_SLACK
        };
        if year > latest {
            return Err(AppError::Validation(format!(
                "Year must not be later than {}",
                latest
            )));
        }
        Ok(())
    }

    /// Check a tag list and return it normalized and sorted.
    ///
    /// Duplicates are detected after normalization, so "action" and "Action"
    /// collide.
    pub fn validate_tags(tags: &[String], case: TagCase) -> Result<Vec<String>, AppError> {
        if tags.len() < MIN_TAGS {
            return Err(AppError::Validation(format!(
                "At least {} tag is required",
                MIN_TAGS
            )));
        }
        if tags.len() > MAX_TAGS {
            return Err(AppError::Validation(format!(
                "No more than {} tags are allowed",
                MAX_TAGS
            )));
        }

        let mut seen = HashSet::with_capacity(tags.len());
        let mut normalized = Vec::with_capacity(tags.len());
        for raw in tags {
            let name = case.normalize(raw);
            Self::validate_tag_name(&name)?;
            if !seen.insert(name.clone()) {
                return Err(AppError::Validation(format!(
                    "Duplicate tag '{}'",
                    name
                )));
            }
            normalized.push(name);
        }
        normalized.sort();
        Ok(normalized)
    }

    pub fn validate_tag_name(name: &str) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::Validation("Tag cannot be empty".to_string()));
        }
        if name.len() > MAX_TAG_BYTES {
            return Err(AppError::Validation(format!(
                "Tag '{}' too long (max {} bytes)",
                name, MAX_TAG_BYTES
            )));
        }
        if !tag_pattern().is_match(name) {
            return Err(AppError::Validation(format!(
                "Tag '{}' contains invalid characters",
                name
            )));
        }
        Ok(())
    }

    /// Tag filters follow the same limits as stored tag sets, minus the minimum.
    pub fn validate_tag_filter(tags: &[String]) -> Result<(), AppError> {
        if tags.len() > MAX_TAGS {
            return Err(AppError::Validation(format!(
                "Cannot filter by more than {} tags",
                MAX_TAGS
            )));
        }
        Ok(())
    }

    pub fn validate_pagination(page: u32, page_size: u32) -> Result<(), AppError> {
        if page == 0 || page > MAX_PAGE {
            return Err(AppError::Validation(format!(
                "Page must be between 1 and {}",
                MAX_PAGE
            )));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    pub fn validate_id(id: i64) -> Result<(), AppError> {
        if id < 1 {
            return Err(AppError::NotFound(format!("anime {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn title_rules() {
        assert!(Validator::validate_anime_title("Moana").is_ok());
        assert!(Validator::validate_anime_title("   ").is_err());
        assert!(Validator::validate_anime_title(&"a".repeat(500)).is_ok());
        assert!(Validator::validate_anime_title(&"a".repeat(501)).is_err());
    }

    #[test]
    fn positive_fields_allow_absence() {
        assert!(Validator::validate_positive("episodes", None).is_ok());
        assert!(Validator::validate_positive("episodes", Some(12)).is_ok());
        assert!(Validator::validate_positive("episodes", Some(0)).is_err());
        assert!(Validator::validate_positive("duration", Some(-3)).is_err());
    }

    #[test]
    fn year_bounds_depend_on_status() {
        let current = Utc::now().year();
        assert!(Validator::validate_year(Some(1916), false).is_err());
        assert!(Validator::validate_year(Some(1917), false).is_ok());
        assert!(Validator::validate_year(Some(current + 1), false).is_ok());
        assert!(Validator::validate_year(Some(current + 3), false).is_err());
        assert!(Validator::validate_year(Some(current + 3), true).is_ok());
        assert!(Validator::validate_year(Some(current + 6), true).is_err());
        assert!(Validator::validate_year(None, true).is_ok());
    }

    #[test]
    fn tags_are_normalized_sorted_and_deduplicated() {
        let out = Validator::validate_tags(&tags(&["isekai", "Action"]), TagCase::Title).unwrap();
        assert_eq!(out, tags(&["Action", "Isekai"]));

        let dup = Validator::validate_tags(&tags(&["action", "ACTION"]), TagCase::Title);
        assert!(dup.is_err());
    }

    #[test]
    fn tag_count_limits() {
        assert!(Validator::validate_tags(&[], TagCase::Title).is_err());
        let many: Vec<String> = (0..16).map(|i| format!("Tag {}", i)).collect();
        assert!(Validator::validate_tags(&many, TagCase::Title).is_err());
        assert!(Validator::validate_tags(&many[..15], TagCase::Title).is_ok());
    }

    #[test]
    fn tag_names_reject_sql_punctuation() {
        assert!(Validator::validate_tag_name("Slice Of Life").is_ok());
        assert!(Validator::validate_tag_name("Sci-fi").is_ok());
        assert!(Validator::validate_tag_name("x'); DROP TABLE tags; --").is_err());
        assert!(Validator::validate_tag_name(&"a".repeat(51)).is_err());
    }

    #[test]
    fn pagination_bounds() {
        assert!(Validator::validate_pagination(1, 20).is_ok());
        assert!(Validator::validate_pagination(0, 20).is_err());
        assert!(Validator::validate_pagination(1, 0).is_err());
        assert!(Validator::validate_pagination(1, 101).is_err());
        assert!(Validator::validate_pagination(10_000_001, 10).is_err());
    }

    #[test]
    fn ids_below_one_are_not_found() {
        assert!(Validator::validate_id(0).unwrap_err().is_not_found());
        assert!(Validator::validate_id(1).is_ok());
    }
}
