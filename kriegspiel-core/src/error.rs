//! Validation errors for engine inputs

/// Error types for snapshot validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid hex key: {0:?} (expected \"row,col\")")]
    InvalidHexKey(String),

    #[error("Unknown unit kind code: {0}")]
    UnknownUnitKind(i64),

    #[error("Unknown army color: {0:?}")]
    UnknownFaction(String),

    #[error("Terrain grid has {actual} rows, expected {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("Terrain row {row} has {actual} columns, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unit {id} at ({row},{col}) is off the map")]
    UnitOffMap { id: u32, row: i32, col: i32 },
}

pub type Result<T> = std::result::Result<T, CoreError>;
