//! The typed interface consumed by cairn tools.
//!
//! The graph service itself (storage engine, schema management, transaction
//! archive) lives outside this repository; implementations of this trait
//! only carry calls to it.

use async_trait::async_trait;

use cairn_core::{
    EdgeLabel, GraphName, GraphPayload, PropertyKey, PropertyValue, SecurityToken, Vertex,
    Visibility,
};

/// Reject payloads whose vertices share an element id. Shared request
/// validation applied by every implementation before a write.
pub(crate) fn check_element_ids(payload: &GraphPayload) -> Result<(), GraphError> {
    let mut seen = std::collections::BTreeSet::new();
    for vertex in &payload.vertices {
        if !seen.insert(&vertex.id) {
            return Err(GraphError::InvalidRequest(format!(
                "duplicate element id in payload: {}",
                vertex.id
            )));
        }
    }
    Ok(())
}

/// Errors from graph service operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Graph service connection error: {0}")]
    Connection(String),

    #[error("Graph service query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Graph service error: {0}")]
    Service(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Operations exposed by the remote graph service.
#[async_trait]
pub trait GraphService: Send + Sync {
    /// Create (or re-create) the schema for a graph: indexable property
    /// keys and the edge labels usable between vertices.
    async fn create_schema(
        &self,
        app_name: &str,
        visibility: &Visibility,
        graph: &GraphName,
        keys: &[PropertyKey],
        labels: &[EdgeLabel],
        token: &SecurityToken,
    ) -> Result<(), GraphError>;

    /// Write a payload of vertices and edges to a graph as one unit.
    async fn write_graph(
        &self,
        app_name: &str,
        visibility: &Visibility,
        graph: &GraphName,
        payload: &GraphPayload,
        token: &SecurityToken,
    ) -> Result<(), GraphError>;

    /// Return the vertices in a graph whose `property_key` holds a value
    /// exactly equal to `value`.
    async fn find_vertices(
        &self,
        graph: &GraphName,
        property_key: &str,
        value: &PropertyValue,
        token: &SecurityToken,
    ) -> Result<Vec<Vertex>, GraphError>;
}
