use thiserror::Error;

pub type Result<T> = std::result::Result<T, CramerError>;

#[derive(Debug, Error)]
pub enum CramerError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid display configuration: {0}")]
    Config(String),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Precondition failures on matrix dimensions. Raised before any determinant is taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("matrix A must be square (got {rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },
    #[error("row count mismatch between A and b ({a_rows} vs {b_rows})")]
    RowMismatch { a_rows: usize, b_rows: usize },
    #[error("b must be a column vector (got {cols} columns)")]
    NotColumnVector { cols: usize },
    #[error("row {row} has {found} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("column {index} out of range for a matrix with {cols} columns")]
    ColumnOutOfRange { index: usize, cols: usize },
    #[error("cannot multiply a matrix with {left_cols} columns by one with {right_rows} rows")]
    ProductMismatch { left_cols: usize, right_rows: usize },
}
