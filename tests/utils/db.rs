//! Database test utilities with singleton pattern
//!
//! Integration tests run against `TEST_DATABASE_URL`. When it is not set the
//! tests print a notice and return early instead of failing.
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use anidex::shared::config::PoolConfig;
use anidex::shared::utils::init_logger;
use anidex::{AnimeRepositoryImpl, CatalogConfig, Database};
use diesel::prelude::*;
use diesel::sql_types::BigInt;

static DATABASE: OnceLock<Option<(Arc<Database>, CatalogConfig)>> = OnceLock::new();

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Migrated database shared by every test in the binary
fn shared_database() -> Option<(Arc<Database>, CatalogConfig)> {
    DATABASE
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            init_logger();
            let url = std::env::var("TEST_DATABASE_URL").ok()?;

            let config = CatalogConfig::new(url)
                .expect("TEST_DATABASE_URL must be a postgres URL")
                .with_pool(PoolConfig {
                    max_size: 10,
                    min_idle: 1,
                    ..PoolConfig::default()
                });
            let database = Database::new(&config).expect("Failed to create test database pool");
            database
                .run_migrations()
                .expect("Failed to migrate test database");

            Some((Arc::new(database), config))
        })
        .clone()
}

/// Acquire test lock to ensure tests run serially
/// Returns a guard that releases the lock when dropped
pub fn acquire_test_lock() -> MutexGuard<'static, ()> {
    // Handle poisoned mutex by recovering from panic
    match TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Everything a repository test needs; holds the test lock while alive.
pub struct TestCatalog {
    pub db: Arc<Database>,
    pub config: CatalogConfig,
    pub repo: AnimeRepositoryImpl,
    _guard: MutexGuard<'static, ()>,
}

/// Lock, clean and hand out a fresh repository, or `None` without a test
/// database.
pub fn setup() -> Option<TestCatalog> {
    let Some((db, config)) = shared_database() else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let guard = acquire_test_lock();
    clean_test_db(&db);

    let repo = AnimeRepositoryImpl::new(Arc::clone(&db), &config);
    Some(TestCatalog {
        db,
        config,
        repo,
        _guard: guard,
    })
}

/// Clean all catalog tables
pub fn clean_test_db(db: &Database) {
    let mut conn = db.get_connection().expect("Failed to get DB connection");
    diesel::sql_query("TRUNCATE TABLE anime, tags RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean catalog tables");
}

#[derive(QueryableByName)]
struct Count {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

fn count(db: &Database, sql: &str) -> i64 {
    let mut conn = db.get_connection().expect("Failed to get DB connection");
    diesel::sql_query(sql)
        .get_result::<Count>(&mut conn)
        .expect("Failed to count rows")
        .count
}

pub fn anime_count(db: &Database) -> i64 {
    count(db, "SELECT count(*) AS count FROM anime")
}

pub fn tag_count(db: &Database) -> i64 {
    count(db, "SELECT count(*) AS count FROM tags")
}

pub fn link_count(db: &Database) -> i64 {
    count(db, "SELECT count(*) AS count FROM anime_tags")
}

/// Links whose anime no longer exists
pub fn orphan_link_count(db: &Database) -> i64 {
    count(
        db,
        "SELECT count(*) AS count FROM anime_tags l \
         LEFT JOIN anime a ON a.id = l.anime_id WHERE a.id IS NULL",
    )
}
