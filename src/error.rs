//! Error types in sylva
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("Not enough samples to train a model")]
    NotEnoughSamples,
    #[error("prune ratio {ratio} leaves {prune} pruning and {train} construction instances")]
    EmptyPruneSet {
        ratio: f64,
        prune: usize,
        train: usize,
    },
    #[error("malformed model file at line {line}: {reason}")]
    ModelFormat { line: usize, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
