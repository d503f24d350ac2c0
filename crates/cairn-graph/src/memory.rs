//! In-process graph service for tests and local demos.
//!
//! Holds graph state in maps, records every call in an operation log so
//! call ordering is observable, and supports per-operation fault injection.
//! This is deliberately minimal scaffolding, not a storage engine: no
//! persistence, no transactions, exact-match lookup only.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use cairn_core::{
    Edge, EdgeLabel, ElementId, GraphName, GraphPayload, PropertyKey, PropertyValue, SecurityToken,
    Vertex, Visibility,
};

use crate::service::{check_element_ids, GraphError, GraphService};

/// One graph service operation, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOp {
    CreateSchema,
    WriteGraph,
    FindVertices,
}

#[derive(Default)]
struct SchemaRecord {
    keys: Vec<PropertyKey>,
    labels: Vec<EdgeLabel>,
}

#[derive(Default)]
struct MemoryState {
    schema: Option<SchemaRecord>,
    vertices: BTreeMap<GraphName, BTreeMap<ElementId, Vertex>>,
    edges: Vec<(GraphName, Edge)>,
    calls: Vec<ServiceOp>,
    faults: BTreeSet<&'static str>,
}

/// In-memory [`GraphService`] implementation.
#[derive(Default)]
pub struct MemoryGraphService {
    state: Mutex<MemoryState>,
}

impl MemoryGraphService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call to `op` fail until [`clear_fault`] is
    /// called for it.
    ///
    /// [`clear_fault`]: MemoryGraphService::clear_fault
    pub fn inject_fault(&self, op: ServiceOp) {
        self.lock().faults.insert(op_name(op));
    }

    pub fn clear_fault(&self, op: ServiceOp) {
        self.lock().faults.remove(op_name(op));
    }

    /// The operations issued against this service, in call order.
    pub fn calls(&self) -> Vec<ServiceOp> {
        self.lock().calls.clone()
    }

    pub fn vertex_count(&self, graph: &GraphName) -> usize {
        self.lock()
            .vertices
            .get(graph)
            .map_or(0, |vertices| vertices.len())
    }

    pub fn edge_count(&self, graph: &GraphName) -> usize {
        self.lock()
            .edges
            .iter()
            .filter(|(name, _)| name == graph)
            .count()
    }

    /// Whether a schema has been created, and with how many keys/labels.
    pub fn schema(&self) -> Option<(usize, usize)> {
        self.lock()
            .schema
            .as_ref()
            .map(|s| (s.keys.len(), s.labels.len()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory service lock poisoned")
    }

    fn record(&self, op: ServiceOp, token: &SecurityToken) -> Result<(), GraphError> {
        let mut state = self.lock();
        state.calls.push(op);
        if token.token.is_empty() {
            return Err(GraphError::InvalidRequest("missing security token".into()));
        }
        if state.faults.contains(op_name(op)) {
            return Err(GraphError::Service(format!(
                "injected fault: {}",
                op_name(op)
            )));
        }
        Ok(())
    }
}

fn op_name(op: ServiceOp) -> &'static str {
    match op {
        ServiceOp::CreateSchema => "create_schema",
        ServiceOp::WriteGraph => "write_graph",
        ServiceOp::FindVertices => "find_vertices",
    }
}

#[async_trait]
impl GraphService for MemoryGraphService {
    async fn create_schema(
        &self,
        _app_name: &str,
        _visibility: &Visibility,
        _graph: &GraphName,
        keys: &[PropertyKey],
        labels: &[EdgeLabel],
        token: &SecurityToken,
    ) -> Result<(), GraphError> {
        self.record(ServiceOp::CreateSchema, token)?;
        self.lock().schema = Some(SchemaRecord {
            keys: keys.to_vec(),
            labels: labels.to_vec(),
        });
        Ok(())
    }

    async fn write_graph(
        &self,
        _app_name: &str,
        _visibility: &Visibility,
        graph: &GraphName,
        payload: &GraphPayload,
        token: &SecurityToken,
    ) -> Result<(), GraphError> {
        self.record(ServiceOp::WriteGraph, token)?;
        check_element_ids(payload)?;

        let mut state = self.lock();
        let vertices = state.vertices.entry(graph.clone()).or_default();
        for vertex in &payload.vertices {
            vertices.insert(vertex.id.clone(), vertex.clone());
        }
        for edge in &payload.edges {
            state.edges.push((graph.clone(), edge.clone()));
        }
        Ok(())
    }

    async fn find_vertices(
        &self,
        graph: &GraphName,
        property_key: &str,
        value: &PropertyValue,
        token: &SecurityToken,
    ) -> Result<Vec<Vertex>, GraphError> {
        self.record(ServiceOp::FindVertices, token)?;

        let state = self.lock();
        let matches = state
            .vertices
            .get(graph)
            .map(|vertices| {
                vertices
                    .values()
                    .filter(|v| {
                        v.properties
                            .get(property_key)
                            .is_some_and(|values| values.iter().any(|p| &p.value == value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }
}
