use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The catalog header lacks a column needed for the requested lineages
    #[error("Catalog header is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed catalog row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Catalog position {pos} lies outside the reference (1..={len})")]
    PositionOutOfBounds { pos: u32, len: u32 },

    /// Reference, catalog or alignment could not be opened or read
    #[error("{0}")]
    UnreadableResource(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Output(String),
}

pub fn handle_error_and_exit(err: Error) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
