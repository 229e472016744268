use crate::{PostgresDriver, PostgresNative, PostgresPool, PostgresPrepared};
use std::sync::Arc;
use stow_core::{Connection, Result};

/// Creates Postgres statements sharing one pool.
pub struct PostgresConnection<P: PostgresPool = PostgresNative> {
    pool: Arc<P>,
    driver: PostgresDriver<P>,
    id_column: Arc<str>,
}

impl<P: PostgresPool> PostgresConnection<P> {
    pub fn new(pool: P) -> Self {
        Self::from_pool(Arc::new(pool))
    }
    pub fn from_pool(pool: Arc<P>) -> Self {
        Self {
            pool,
            driver: PostgresDriver::new(),
            id_column: "id".into(),
        }
    }
    /// Column read from the first `RETURNING` row as the generated id, `id` by default.
    pub fn with_id_column(mut self, name: &str) -> Self {
        self.id_column = name.into();
        self
    }
    pub fn pool(&self) -> &Arc<P> {
        &self.pool
    }
}

impl PostgresConnection<PostgresNative> {
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(PostgresNative::connect(url).await?))
    }
}

impl<P: PostgresPool> Connection for PostgresConnection<P> {
    type Driver = PostgresDriver<P>;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn create_prepared(&self) -> PostgresPrepared<P> {
        PostgresPrepared::new(self.pool.clone(), self.id_column.clone())
    }
}
