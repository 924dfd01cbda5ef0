use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell coordinates outside the grid")]
    InvalidCell,
    #[error("Grid dimensions must be positive")]
    EmptyGrid,
    #[error("Hazard count must be positive")]
    NoHazards,
    #[error("More hazards than grid cells")]
    TooManyHazards,
    #[error("Session already ended, no new moves are accepted")]
    SessionEnded,
}

pub type Result<T> = core::result::Result<T, GridError>;
