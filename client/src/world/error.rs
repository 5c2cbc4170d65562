use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The table is full; the entity was not inserted and nothing changed.
    #[error("{table} table is full ({capacity}), dropped {id}")]
    Capacity {
        table: &'static str,
        capacity: usize,
        id: String,
    },
}
