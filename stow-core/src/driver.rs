use crate::Prepared;

/// Static description of a SQL dialect.
pub trait Driver: Clone + Default + Send + Sync + 'static {
    /// Dialect side of a statement, wrapping the native client.
    type Prepared: Prepared;

    /// Scheme of the connection url.
    const NAME: &'static str;
    /// Tag used in logs and error messages.
    const DISPLAY_NAME: &'static str;
    /// Whether a placeholder names its slot and can appear more than once (`$1`, `@param0`).
    /// When false (`?`) the values are expanded per occurrence before execution.
    const NUMBERED_PLACEHOLDERS: bool;

    /// Placeholder referencing the parameter slot `index` (from 0).
    fn placeholder(&self, index: usize) -> String;
}
