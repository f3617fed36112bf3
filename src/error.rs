use thiserror::Error;

#[derive(Error, Debug)]
pub enum VendasError {
    #[error("Missing required column: {0}")]
    InvalidSchema(String),

    #[error("Could not parse file as tabular data: {0}")]
    Unparseable(String),

    #[error("Need at least two months of data to compute growth")]
    InsufficientData,

    #[error("No sales records in input")]
    EmptyInput,

    #[error("First-period revenue is zero; growth is undefined")]
    DivisionByZero,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VendasError>;
