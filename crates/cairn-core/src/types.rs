//! Core element types exchanged with the remote graph service.
//!
//! These mirror the service's wire model: visibility-marked vertices and
//! edges grouped into a single write payload, plus the schema definitions
//! (property keys, edge labels) used for index creation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PayloadError;

// ── Identifiers ───────────────────────────────────────────────────

/// The name of the logical graph an operation targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphName(pub String);

impl GraphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Default for GraphName {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a vertex within a write payload.
///
/// Assigned by the caller; must be unique within a single payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ── Visibility ────────────────────────────────────────────────────

/// A formal classification marking attached to graph data.
///
/// Enforced by the external security/storage layer; this client only
/// guarantees every transmitted value carries one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Visibility(pub String);

impl Visibility {
    pub fn new(marking: impl Into<String>) -> Self {
        Self(marking.into())
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ── Property Values ───────────────────────────────────────────────

/// A typed property value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PropertyValue {
    pub fn string(v: impl Into<String>) -> Self {
        Self::Str(v.into())
    }

    /// The string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A property value together with its required visibility marking.
///
/// Construction requires a visibility, so an unmarked value cannot reach
/// the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub value: PropertyValue,
    pub visibility: Visibility,
}

impl Property {
    pub fn new(value: PropertyValue, visibility: Visibility) -> Self {
        Self { value, visibility }
    }
}

// ── Elements ──────────────────────────────────────────────────────

/// A vertex: an element id plus named, ordered property lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    pub id: ElementId,
    pub properties: BTreeMap<String, Vec<Property>>,
}

impl Vertex {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            properties: BTreeMap::new(),
        }
    }

    /// Append a property value under the given key.
    pub fn with_property(mut self, key: impl Into<String>, property: Property) -> Self {
        self.properties.entry(key.into()).or_default().push(property);
        self
    }
}

/// A directed, labelled edge between two vertices in the same payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub source: ElementId,
    pub dest: ElementId,
    pub label: String,
    pub properties: BTreeMap<String, Property>,
    pub visibility: Visibility,
}

impl Edge {
    pub fn new(
        source: ElementId,
        dest: ElementId,
        label: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            source,
            dest,
            label: label.into(),
            properties: BTreeMap::new(),
            visibility,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, property: Property) -> Self {
        self.properties.insert(key.into(), property);
        self
    }
}

/// The unit of a graph write: vertices and edges assembled client-side
/// and sent to the service in one call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphPayload {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl GraphPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, rejecting duplicate element ids.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> Result<(), PayloadError> {
        if self.vertices.iter().any(|v| v.id == vertex.id) {
            return Err(PayloadError::DuplicateElementId(vertex.id.0.clone()));
        }
        self.vertices.push(vertex);
        Ok(())
    }

    pub fn insert_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }
}

// ── Schema ────────────────────────────────────────────────────────

/// Data type of a property key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Float,
    Boolean,
}

/// Which element kind an index covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexTarget {
    Vertex,
    Edge,
}

/// Which index backs a property key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexName {
    Search,
}

/// An index definition on a property key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Index {
    pub target: IndexTarget,
    pub name: IndexName,
}

impl Index {
    pub fn search(target: IndexTarget) -> Self {
        Self {
            target,
            name: IndexName::Search,
        }
    }
}

/// A named, typed property key, optionally indexed by the remote schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyKey {
    pub name: String,
    pub data_type: DataType,
    pub indices: Vec<Index>,
}

impl PropertyKey {
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::String,
            indices: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indices.push(index);
        self
    }
}

/// A named relationship type usable between vertices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EdgeLabel(pub String);

impl EdgeLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ── Security Token ────────────────────────────────────────────────

/// An opaque, short-lived credential asserting caller identity.
///
/// Fetched fresh from the security service once per run; never cached or
/// renewed by this client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityToken {
    pub token: String,
    pub app_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SecurityToken {
    pub fn new(token: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            app_id: app_id.into(),
            issued_at: Utc::now(),
            expires_at: None,
        }
    }
}
