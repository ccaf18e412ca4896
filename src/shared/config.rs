//! Catalog configuration
//!
//! Built once at start-up and handed to `Database::new` and the repository
//! constructor. Nothing in the crate reads configuration from globals.
use std::collections::BTreeSet;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::errors::{AppError, AppResult};

/// Case rule applied to tag names on write and on filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagCase {
    /// "slice of LIFE" -> "Slice Of Life"
    #[default]
    Title,
    /// "Slice of Life" -> "slice of life"
    Lower,
}

impl TagCase {
    pub fn normalize(&self, raw: &str) -> String {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        match self {
            TagCase::Lower => collapsed.to_lowercase(),
            TagCase::Title => collapsed
                .split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first
                            .to_uppercase()
                            .chain(chars.flat_map(|c| c.to_lowercase()))
                            .collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Normalize every name, drop blanks and duplicates, sort.
    pub fn normalize_all(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .map(|name| self.normalize(name))
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromStr for TagCase {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" | "title-case" | "title_case" => Ok(TagCase::Title),
            "lower" | "lower-case" | "lower_case" => Ok(TagCase::Lower),
            other => Err(AppError::Validation(format!(
                "Unknown tag case rule '{}' (expected 'title' or 'lower')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_size: u32,
    pub min_idle: u32,
    /// Time to wait for a connection from the pool
    pub connection_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        // Base pool size on CPU count, capped
        let max_size = std::cmp::min(cpu_count * 2, 20);
        let min_idle = std::cmp::max(2, max_size / 4);

        Self {
            max_size: max_size as u32,
            min_idle: min_idle as u32,
            connection_timeout: Duration::from_secs(2),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Upper bound on each repository operation, pool wait included.
#[derive(Debug, Clone)]
pub struct OperationTimeouts {
    pub read: Duration,
    pub list: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for OperationTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(3),
            list: Duration::from_secs(4),
            create: Duration::from_secs(6),
            update: Duration::from_secs(6),
            delete: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub database_url: String,
    pub pool: PoolConfig,
    pub timeouts: OperationTimeouts,
    pub tag_case: TagCase,
}

impl CatalogConfig {
    pub fn new(database_url: impl Into<String>) -> AppResult<Self> {
        let database_url = database_url.into();
        Self::validate_database_url(&database_url)?;

        Ok(Self {
            database_url,
            pool: PoolConfig::default(),
            timeouts: OperationTimeouts::default(),
            tag_case: TagCase::default(),
        })
    }

    /// Load configuration from the process environment (and `.env` if present)
    ///
    /// Recognised variables:
    /// - `DATABASE_URL` (required)
    /// - `ANIDEX_POOL_MAX_SIZE`, `ANIDEX_POOL_MIN_IDLE`
    /// - `ANIDEX_TAG_CASE` (`title` | `lower`)
    /// - `ANIDEX_TIMEOUT_{READ,LIST,CREATE,UPDATE,DELETE}_MS`
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| {
            AppError::Validation("DATABASE_URL environment variable not found".to_string())
        })?;
        let mut config = Self::new(database_url)?;

        if let Some(max_size) = Self::env_parse::<u32>("ANIDEX_POOL_MAX_SIZE")? {
            config.pool.max_size = max_size;
        }
        if let Some(min_idle) = Self::env_parse::<u32>("ANIDEX_POOL_MIN_IDLE")? {
            config.pool.min_idle = min_idle;
        }
        if let Ok(rule) = env::var("ANIDEX_TAG_CASE") {
            config.tag_case = rule.parse()?;
        }

        let timeouts = &mut config.timeouts;
        for (name, slot) in [
            ("ANIDEX_TIMEOUT_READ_MS", &mut timeouts.read),
            ("ANIDEX_TIMEOUT_LIST_MS", &mut timeouts.list),
            ("ANIDEX_TIMEOUT_CREATE_MS", &mut timeouts.create),
            ("ANIDEX_TIMEOUT_UPDATE_MS", &mut timeouts.update),
            ("ANIDEX_TIMEOUT_DELETE_MS", &mut timeouts.delete),
        ] {
            if let Some(ms) = Self::env_parse::<u64>(name)? {
                *slot = Duration::from_millis(ms);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_tag_case(mut self, tag_case: TagCase) -> Self {
        self.tag_case = tag_case;
        self
    }

    pub fn with_timeouts(mut self, timeouts: OperationTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        Self::validate_database_url(&self.database_url)?;

        if self.pool.max_size == 0 {
            return Err(AppError::Validation(
                "Pool max size must be positive".to_string(),
            ));
        }
        if self.pool.min_idle > self.pool.max_size {
            return Err(AppError::Validation(
                "Pool min idle cannot exceed max size".to_string(),
            ));
        }

        let t = &self.timeouts;
        if [t.read, t.list, t.create, t.update, t.delete]
            .iter()
            .any(|d| d.is_zero())
        {
            return Err(AppError::Validation(
                "Operation timeouts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Host part of the URL, safe to log
    pub fn redacted_url(&self) -> &str {
        self.database_url
            .rsplit('@')
            .next()
            .unwrap_or("unknown_host")
    }

    fn validate_database_url(url: &str) -> AppResult<()> {
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(AppError::Validation(
                "Invalid database URL format. Must start with postgres:// or postgresql://"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn env_parse<T: FromStr>(name: &str) -> AppResult<Option<T>> {
        match env::var(name) {
            Ok(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("Invalid value for {}: '{}'", name, raw))),
            Err(_) => Ok(None),
        }
    }
}
