//! Bolt connection management and the remote graph service client.

use async_trait::async_trait;
use chrono::Utc;
use neo4rs::{query, ConfigBuilder, Graph, Query};

use cairn_core::{
    EdgeLabel, GraphName, GraphPayload, IndexTarget, Property, PropertyKey, PropertyValue,
    SecurityToken, Vertex, Visibility,
};

use crate::service::{check_element_ids, GraphError, GraphService};

/// Configuration for connecting to the graph service.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Remote graph service client over the Bolt protocol.
///
/// The transport's connection handling is the driver's concern; this type
/// only translates service operations into parameterised statements.
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct BoltGraphService {
    graph: Graph,
}

impl BoltGraphService {
    /// Connect to the graph service with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to graph service");
        Ok(Self { graph })
    }

    async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}

#[async_trait]
impl GraphService for BoltGraphService {
    async fn create_schema(
        &self,
        app_name: &str,
        visibility: &Visibility,
        graph: &GraphName,
        keys: &[PropertyKey],
        labels: &[EdgeLabel],
        token: &SecurityToken,
    ) -> Result<(), GraphError> {
        let statements = schema_statements(keys, labels);
        for stmt in &statements {
            self.run(query(stmt)).await?;
        }

        tracing::info!(
            app = app_name,
            graph = %graph,
            visibility = %visibility,
            token_app = %token.app_id,
            statements = statements.len(),
            "Created schema"
        );
        Ok(())
    }

    async fn write_graph(
        &self,
        app_name: &str,
        visibility: &Visibility,
        graph: &GraphName,
        payload: &GraphPayload,
        token: &SecurityToken,
    ) -> Result<(), GraphError> {
        check_element_ids(payload)?;

        let now = Utc::now().to_rfc3339();
        let mut txn = self.graph.start_txn().await?;

        for vertex in &payload.vertices {
            txn.run(vertex_merge(vertex, app_name, visibility, graph, &now)?)
                .await?;
        }
        for edge in &payload.edges {
            let cypher = format!(
                "MATCH (a:Vertex {{graph: $graph, id: $source}})
                 MATCH (b:Vertex {{graph: $graph, id: $dest}})
                 MERGE (a)-[r:`{label}` {{graph: $graph}}]->(b)
                 SET r.app = $app, r.visibility = $visibility,
                     r.properties_json = $props, r.written_at = $now",
                label = edge.label
            );
            let props_json = serde_json::to_string(&edge.properties)
                .map_err(|e| GraphError::Serialization(e.to_string()))?;

            let q = query(&cypher)
                .param("graph", graph.0.clone())
                .param("source", edge.source.0.clone())
                .param("dest", edge.dest.0.clone())
                .param("app", app_name.to_string())
                .param("visibility", edge.visibility.0.clone())
                .param("props", props_json)
                .param("now", now.clone());
            txn.run(q).await?;
        }

        txn.commit().await?;

        tracing::info!(
            app = app_name,
            graph = %graph,
            visibility = %visibility,
            token_app = %token.app_id,
            vertices = payload.vertices.len(),
            edges = payload.edges.len(),
            "Wrote graph payload"
        );
        Ok(())
    }

    async fn find_vertices(
        &self,
        graph: &GraphName,
        property_key: &str,
        value: &PropertyValue,
        token: &SecurityToken,
    ) -> Result<Vec<Vertex>, GraphError> {
        let q = query(
            "MATCH (v:Vertex {graph: $graph})
             WHERE $value IN v[$key]
             RETURN v",
        )
        .param("graph", graph.0.clone())
        .param("key", property_key.to_string())
        .param("value", value_to_param(value));

        let rows = self.query_rows(q).await?;
        let mut vertices = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row
                .get("v")
                .map_err(|e| GraphError::Serialization(format!("Failed to get vertex: {e}")))?;
            vertices.push(node_to_vertex(&node)?);
        }

        tracing::debug!(
            graph = %graph,
            key = property_key,
            token_app = %token.app_id,
            found = vertices.len(),
            "Vertex query complete"
        );
        Ok(vertices)
    }
}

/// Schema DDL: a lookup index on (graph, id), one index per vertex-indexed
/// key, and one per edge-indexed key and label.
fn schema_statements(keys: &[PropertyKey], labels: &[EdgeLabel]) -> Vec<String> {
    let mut statements = vec![
        "CREATE INDEX vertex_element_id IF NOT EXISTS FOR (v:Vertex) ON (v.graph, v.id)"
            .to_string(),
    ];

    for key in keys {
        for index in &key.indices {
            match index.target {
                IndexTarget::Vertex => statements.push(format!(
                    "CREATE INDEX vertex_{key_lower}_search IF NOT EXISTS \
                     FOR (v:Vertex) ON (v.`{key}`)",
                    key_lower = key.name.to_lowercase(),
                    key = key.name,
                )),
                IndexTarget::Edge => {
                    for label in labels {
                        statements.push(format!(
                            "CREATE INDEX edge_{label_lower}_{key_lower}_search IF NOT EXISTS \
                             FOR ()-[r:`{label}`]-() ON (r.`{key}`)",
                            label_lower = label.0.to_lowercase(),
                            key_lower = key.name.to_lowercase(),
                            label = label.0,
                            key = key.name,
                        ));
                    }
                }
            }
        }
    }

    statements
}

/// Build the MERGE for one vertex: element identity, provenance fields, the
/// full property map as JSON, and one queryable value list per key.
fn vertex_merge(
    vertex: &Vertex,
    app_name: &str,
    visibility: &Visibility,
    graph: &GraphName,
    now: &str,
) -> Result<Query, GraphError> {
    let mut cypher = String::from(
        "MERGE (v:Vertex {graph: $graph, id: $id})
         SET v.app = $app, v.write_visibility = $visibility,
             v.properties_json = $props, v.written_at = $now",
    );
    for (i, key) in vertex.properties.keys().enumerate() {
        cypher.push_str(&format!("\n         SET v.`{key}` = $values_{i}"));
    }

    let props_json = serde_json::to_string(&vertex.properties)
        .map_err(|e| GraphError::Serialization(e.to_string()))?;

    let mut q = query(&cypher)
        .param("graph", graph.0.clone())
        .param("id", vertex.id.0.clone())
        .param("app", app_name.to_string())
        .param("visibility", visibility.0.clone())
        .param("props", props_json)
        .param("now", now.to_string());
    for (i, values) in vertex.properties.values().enumerate() {
        let rendered: Vec<String> = values.iter().map(|p| value_to_param(&p.value)).collect();
        q = q.param(&format!("values_{i}"), rendered);
    }

    Ok(q)
}

/// Canonical string rendering used for both stored value lists and query
/// parameters, so exact-match lookups compare like with like.
fn value_to_param(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Str(s) => s.clone(),
        PropertyValue::Int(i) => i.to_string(),
        PropertyValue::Float(f) => f.to_string(),
        PropertyValue::Bool(b) => b.to_string(),
    }
}

fn node_to_vertex(node: &neo4rs::Node) -> Result<Vertex, GraphError> {
    let id: String = node
        .get("id")
        .map_err(|e| GraphError::Serialization(format!("Vertex missing id: {e}")))?;
    let props_json: String = node.get("properties_json").unwrap_or_default();

    let properties: std::collections::BTreeMap<String, Vec<Property>> = if props_json.is_empty() {
        Default::default()
    } else {
        serde_json::from_str(&props_json)
            .map_err(|e| GraphError::Serialization(format!("Bad vertex properties: {e}")))?
    };

    Ok(Vertex {
        id: cairn_core::ElementId::new(id),
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::Index;

    #[test]
    fn schema_statements_cover_keys_and_labels() {
        let keys = vec![
            PropertyKey::string("NAME").with_index(Index::search(IndexTarget::Vertex)),
            PropertyKey::string("SINCE").with_index(Index::search(IndexTarget::Edge)),
        ];
        let labels = vec![EdgeLabel::new("friend")];

        let statements = schema_statements(&keys, &labels);
        assert_eq!(statements.len(), 3);
        assert!(statements[1].contains("vertex_name_search"));
        assert!(statements[1].contains("(v.`NAME`)"));
        assert!(statements[2].contains("edge_friend_since_search"));
        assert!(statements[2].contains("[r:`friend`]"));
    }

    #[test]
    fn value_rendering_is_stable() {
        assert_eq!(value_to_param(&PropertyValue::string("stevejobs")), "stevejobs");
        assert_eq!(value_to_param(&PropertyValue::Int(3)), "3");
        assert_eq!(value_to_param(&PropertyValue::Bool(true)), "true");
    }
}
