//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Tests run against the server named by `DATABASE_URL`. Each test gets a
//! throwaway database with every migration applied; without the variable
//! the tests return early.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use parcel_flow::{
    common::postgres::{PgPool, build_pool},
    config::DATABASE_URL_ENV,
};
use rstest::fixture;
use uuid::Uuid;

/// Error type for database setup failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Schema migrations in application order.
pub const MIGRATIONS: [&str; 3] = [
    include_str!("../../migrations/2026-10-01-000000_create_parcel_tables/up.sql"),
    include_str!("../../migrations/2026-10-01-000001_create_transport_tables/up.sql"),
    include_str!("../../migrations/2026-10-01-000002_create_delivery_tables/up.sql"),
];

/// A migrated database dropped when the handle goes out of scope.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    pool: PgPool,
}

impl TemporaryDatabase {
    /// Creates and migrates a fresh database on the server behind
    /// `admin_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or migrated.
    pub fn create(admin_url: &str) -> Result<Self, BoxError> {
        let name = format!("parcel_flow_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::establish(admin_url)?;
        diesel::sql_query(format!("CREATE DATABASE {}", quote_identifier(&name)))
            .execute(&mut admin)?;

        let url = with_database(admin_url, &name)?;
        let mut connection = PgConnection::establish(&url)?;
        for migration in MIGRATIONS {
            connection.batch_execute(migration)?;
        }
        let pool = build_pool(&url, 2)?;
        Ok(Self {
            admin_url: admin_url.to_owned(),
            name,
            pool,
        })
    }

    /// Returns a pool connected to the temporary database.
    #[must_use]
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let Ok(mut admin) = PgConnection::establish(&self.admin_url) else {
            return;
        };
        let sql = format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(&self.name)
        );
        drop(diesel::sql_query(sql).execute(&mut admin));
    }
}

/// Provides a migrated database, or `None` when `DATABASE_URL` is unset.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is set but the database cannot be prepared.
#[fixture]
pub fn database() -> Option<TemporaryDatabase> {
    let admin_url = std::env::var(DATABASE_URL_ENV).ok()?;
    match TemporaryDatabase::create(&admin_url) {
        Ok(database) => Some(database),
        Err(err) => panic!("failed to prepare PostgreSQL test database: {err}"),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn with_database(url: &str, database: &str) -> Result<String, BoxError> {
    let (base, query) = url
        .split_once('?')
        .map_or((url, None), |(base, query)| (base, Some(query)));
    let (scheme, rest) = base
        .split_once("://")
        .ok_or_else(|| format!("database URL has no scheme: {url}"))?;
    let authority = rest.split_once('/').map_or(rest, |(authority, _)| authority);
    Ok(query.map_or_else(
        || format!("{scheme}://{authority}/{database}"),
        |params| format!("{scheme}://{authority}/{database}?{params}"),
    ))
}
