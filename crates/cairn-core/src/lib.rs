//! cairn-core: Shared types, configuration, and error handling for the cairn toolkit.
//!
//! This crate provides the foundational pieces used across all cairn components:
//! - Element types (Vertex, Edge, GraphPayload, etc.) exchanged with the graph service
//! - Schema types (PropertyKey, EdgeLabel, Index) for remote schema creation
//! - The security token record
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{CairnConfig, WritePolicy};
pub use error::{ConfigError, PayloadError};
pub use types::{
    DataType, Edge, EdgeLabel, ElementId, GraphName, GraphPayload, Index, IndexName, IndexTarget,
    Property, PropertyKey, PropertyValue, SecurityToken, Vertex, Visibility,
};
