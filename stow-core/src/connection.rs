use crate::{Driver, Statement};

/// A live handle to a database, shared by the statements it creates.
pub trait Connection: Send + Sync {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Creates the dialect side of a new statement, sharing the native client.
    fn create_prepared(&self) -> <Self::Driver as Driver>::Prepared;

    /// Placeholder of the parameter slot `index` in this connection's dialect.
    fn placeholder(&self, index: usize) -> String {
        self.driver().placeholder(index)
    }

    /// Creates an unprepared statement for `sql`.
    fn prepare(&self, sql: impl Into<String>) -> Statement<Self::Driver> {
        Statement::new(self.driver().clone(), self.create_prepared(), sql)
    }
}
