//! Error types for the cairn-seed crate.

use thiserror::Error;

use cairn_auth::AuthError;
use cairn_core::{ConfigError, PayloadError};
use cairn_graph::GraphError;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Error retrieving graph service client: {0}")]
    ClientAcquisition(#[source] GraphError),

    #[error("Could not obtain security token: {0}")]
    TokenAcquisition(#[source] AuthError),

    #[error("Graph step {step} failed: {source}")]
    WriteStep {
        step: &'static str,
        #[source]
        source: GraphError,
    },

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type Result<T> = std::result::Result<T, SeedError>;
