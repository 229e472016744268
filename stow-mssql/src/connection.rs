use crate::{MssqlClient, MssqlDriver, MssqlPrepared};
use std::sync::Arc;
use stow_core::Connection;

/// Creates MSSQL statements over an injected client.
pub struct MssqlConnection<C: MssqlClient> {
    client: Arc<C>,
    driver: MssqlDriver<C>,
    id_column: Arc<str>,
}

impl<C: MssqlClient> MssqlConnection<C> {
    pub fn new(client: C) -> Self {
        Self::from_client(Arc::new(client))
    }
    pub fn from_client(client: Arc<C>) -> Self {
        Self {
            client,
            driver: MssqlDriver::new(),
            id_column: "id".into(),
        }
    }
    /// Column read from the first `OUTPUT` row as the generated id, `id` by default.
    pub fn with_id_column(mut self, name: &str) -> Self {
        self.id_column = name.into();
        self
    }
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }
}

impl<C: MssqlClient> Connection for MssqlConnection<C> {
    type Driver = MssqlDriver<C>;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn create_prepared(&self) -> MssqlPrepared<C> {
        MssqlPrepared::new(self.client.clone(), self.id_column.clone())
    }
}
