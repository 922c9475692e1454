use thiserror::Error;
use tile_core::SolveError;
use tile_rules::LoadError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rule File Error: {0}")]
    Rules(#[from] LoadError),

    #[error("Solver Error: {0}")]
    Solve(#[from] SolveError),

    #[error("Output Error: {0}")]
    Output(String),

    #[error("Cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
