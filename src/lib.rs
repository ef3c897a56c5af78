pub mod bio;
pub mod cli;
pub mod core;

pub use crate::bio::taxonomy::TaxonomyIndex;
pub use crate::core::registry::StrainRegistry;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxsplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TaxsplitError>;
