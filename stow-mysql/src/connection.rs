use crate::{MySqlClient, MySqlDriver, MySqlNative, MySqlPrepared};
use std::sync::Arc;
use stow_core::{Connection, Result};

/// Creates MySQL statements sharing one native client.
pub struct MySqlConnection<C: MySqlClient = MySqlNative> {
    client: Arc<C>,
    driver: MySqlDriver<C>,
}

impl<C: MySqlClient> MySqlConnection<C> {
    pub fn new(client: C) -> Self {
        Self::from_client(Arc::new(client))
    }
    pub fn from_client(client: Arc<C>) -> Self {
        Self {
            client,
            driver: MySqlDriver::new(),
        }
    }
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }
}

impl MySqlConnection<MySqlNative> {
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(MySqlNative::connect(url).await?))
    }
    pub async fn disconnect(&self) -> Result<()> {
        self.client.disconnect().await
    }
}

impl<C: MySqlClient> Connection for MySqlConnection<C> {
    type Driver = MySqlDriver<C>;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn create_prepared(&self) -> MySqlPrepared<C> {
        MySqlPrepared::new(self.client.clone())
    }
}
