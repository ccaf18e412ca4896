use crate::shared::config::CatalogConfig;
use crate::shared::errors::{AppError, AppResult, ErrorClassifier, ErrorKind};
use crate::shared::infrastructure::{PersistenceError, PersistenceResult};
use crate::shared::utils::logger::LogContext;
use crate::{log_info, trace_site};
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        config.validate()?;

        let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
        let pool_config = &config.pool;
        let pool = r2d2::Pool::builder()
            .max_size(pool_config.max_size)
            .min_idle(Some(pool_config.min_idle))
            .connection_timeout(pool_config.connection_timeout)
            .idle_timeout(Some(pool_config.idle_timeout))
            .max_lifetime(Some(pool_config.max_lifetime))
            // Connection health checks
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                ErrorClassifier::report(PersistenceError::Pool(e), trace_site!("database.connect"))
            })?;

        log_info!(
            "Database connection pool to {} initialized with max_size: {}, min_idle: {}",
            config.redacted_url(),
            pool.max_size(),
            pool_config.min_idle
        );

        Ok(Self { pool })
    }

    /// Borrow a pooled connection; failures are left for the caller to classify.
    pub fn get_connection(&self) -> PersistenceResult<DbConnection> {
        let start = std::time::Instant::now();
        let conn = self.pool.get()?;

        let duration = start.elapsed().as_millis() as u64;
        if duration > 100 {
            LogContext::performance_metric("db_connection_acquire", duration, Some("slow"));
        }
        Ok(conn)
    }

    /// Apply embedded migrations, returning the versions that ran.
    pub fn run_migrations(&self) -> AppResult<Vec<String>> {
        let mut conn = self.get_connection().map_err(|e| {
            ErrorClassifier::report(e, trace_site!("database.migrate"))
        })?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                kind: ErrorKind::Unknown,
                message: format!("Failed to run database migrations: {}", e),
            })?
            .into_iter()
            .map(|version| version.to_string())
            .collect::<Vec<_>>();

        log_info!("Database migrations completed ({} applied)", applied.len());
        Ok(applied)
    }

    /// Get pool statistics for monitoring
    pub fn pool_status(&self) -> PoolStatus {
        let state = self.pool.state();
        PoolStatus {
            connections: state.connections,
            idle_connections: state.idle_connections,
            max_size: self.pool.max_size(),
        }
    }
}

#[derive(Debug)]
pub struct PoolStatus {
    pub connections: u32,
    pub idle_connections: u32,
    pub max_size: u32,
}
