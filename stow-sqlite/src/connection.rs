use crate::{SqliteClient, SqliteDriver, SqliteNative, SqlitePrepared};
use std::sync::Arc;
use stow_core::{Connection, Result};

/// Creates SQLite statements sharing one native client.
pub struct SqliteConnection<C: SqliteClient = SqliteNative> {
    client: Arc<C>,
    driver: SqliteDriver<C>,
}

impl<C: SqliteClient> SqliteConnection<C> {
    pub fn new(client: C) -> Self {
        Self::from_client(Arc::new(client))
    }
    pub fn from_client(client: Arc<C>) -> Self {
        Self {
            client,
            driver: SqliteDriver::new(),
        }
    }
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }
}

impl SqliteConnection<SqliteNative> {
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(SqliteNative::open(url).await?))
    }
}

impl<C: SqliteClient> Connection for SqliteConnection<C> {
    type Driver = SqliteDriver<C>;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn create_prepared(&self) -> SqlitePrepared<C> {
        SqlitePrepared::new(self.client.clone())
    }
}
