// error.rs - Crate-wide error kinds

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// External similarity scorer failed or produced malformed output.
    /// Fatal to the whole build: the coordinator cancels remaining work.
    #[error("comparator failure: {0}")]
    Comparator(String),

    #[error("guide FASTA file not found: {0}")]
    MissingGuideFile(PathBuf),

    #[error("guide file contains no sequences: {0}")]
    EmptyGuideSet(PathBuf),

    #[error("no sequence keys supplied")]
    EmptyInput,

    #[error("sequence key not found in store: {0}")]
    MissingSequence(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("FASTA error: {0}")]
    Fasta(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn comparator<S: Into<String>>(msg: S) -> Self {
        Error::Comparator(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn fasta<S: Into<String>>(msg: S) -> Self {
        Error::Fasta(msg.into())
    }
}
