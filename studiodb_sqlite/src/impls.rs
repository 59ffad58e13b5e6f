use sqlx::{
    migrate::MigrateDatabase,
    sqlite::SqlitePoolOptions,
    Sqlite,
};
use std::sync::Arc;
use studiocore::platform::{
    ConnectorOption,
    PlatformUrl,
};

use crate::SqliteBackend;

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn connect(opts: ConnectorOption) -> Result<SqliteBackend, sqlx::Error> {
        if opts.auto_create_db && !Sqlite::database_exists(&opts.url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", &opts.url);
            Sqlite::create_database(&opts.url).await?
        }

        // every connection to an in-memory database sees its own
        // database, so such a pool must hold exactly one for its lifetime
        let options = if opts.url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = options.connect(&opts.url).await?;
        Ok(SqliteBackend {
            pool: Arc::new(pool),
            url: opts.url,
        })
    }

    pub async fn migrate(self) -> Result<Self, sqlx::Error> {
        sqlx::migrate!("migrations/studio").run(&*self.pool).await?;
        Ok(self)
    }

    /// Connects to the database at `url`, creating it if needed, and
    /// runs all migrations.
    pub async fn from_url(url: &str) -> Result<Self, sqlx::Error> {
        SqliteBackend::connect(ConnectorOption::from(url).auto_create_db(true))
            .await?
            .migrate()
            .await
    }
}

mod employee;
mod record;
mod session;
