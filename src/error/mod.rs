use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TpnError {
    /// A recalculation pass produced a non-finite value; the pass is
    /// discarded rather than committed
    #[error("recalculation produced a non-finite value for `{field}`")]
    NonFinite { field: &'static str },

    /// Iterating a constant input did not reach a fixed point within the
    /// allowed number of passes
    #[error("prescription did not settle within {passes} passes")]
    NotSettled { passes: usize },
}
