use std::collections::TryReserveError;
use thiserror::Error;

/// Failure to build a table's bucket array.
///
/// Duplicate inserts and lookup or erase misses are not errors; they are
/// reported through return values.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("no prime bucket count >= {requested} fits in usize")]
    CapacityOverflow { requested: usize },
    #[error("failed to allocate bucket array: {0}")]
    Alloc(#[from] TryReserveError),
}
