//! The demo seeder: fixed seed profile, payload construction, and the
//! send/query operations against a graph service.

use cairn_core::{
    CairnConfig, Edge, EdgeLabel, ElementId, GraphName, GraphPayload, Index, IndexTarget,
    Property, PropertyKey, PropertyValue, SecurityToken, Vertex, Visibility, WritePolicy,
};
use cairn_graph::{GraphError, GraphService};

use crate::error::{Result, SeedError};

/// Property key the seeded vertices and edge are indexed under.
pub const KEY_NAME: &str = "NAME";

/// The seed tool always identifies as this fixed client application,
/// regardless of what the configuration says.
const SECURITY_APP_ID: &str = "client";

const SEED_VISIBILITY: &str = "U//FOUO";
const EDGE_LABEL_FRIEND: &str = "friend";
const QUERY_VALUE: &str = "stevejobs";

/// Fixed seeding parameters, built once from configuration and passed by
/// reference. No global state.
#[derive(Debug, Clone)]
pub struct SeedProfile {
    pub app_name: String,
    pub security_id: String,
    pub graph: GraphName,
    pub visibility: Visibility,
    pub keys: Vec<PropertyKey>,
    pub labels: Vec<EdgeLabel>,
    pub write_policy: WritePolicy,
}

impl SeedProfile {
    pub fn from_config(config: &CairnConfig) -> Self {
        Self {
            app_name: config.app.name.clone(),
            security_id: SECURITY_APP_ID.to_string(),
            graph: GraphName::new(config.graph.graph_name.clone()),
            visibility: Visibility::new(SEED_VISIBILITY),
            keys: vec![
                PropertyKey::string(KEY_NAME).with_index(Index::search(IndexTarget::Vertex)),
            ],
            labels: vec![EdgeLabel::new(EDGE_LABEL_FRIEND)],
            write_policy: config.seed.write_mode,
        }
    }
}

/// What happened to each write step of a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step did not run.
    Skipped,
    Succeeded,
    /// The step failed and the failure was logged and swallowed
    /// (best-effort policy).
    Swallowed,
}

/// Per-step record of a send, so a best-effort run still surfaces which
/// steps failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    pub schema: StepOutcome,
    pub write: StepOutcome,
}

/// Sends the canned demo graph and queries it back.
pub struct Seeder {
    profile: SeedProfile,
}

impl Seeder {
    pub fn new(profile: SeedProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &SeedProfile {
        &self.profile
    }

    /// The canned payload: two vertices and one `friend` edge between them,
    /// every property value carrying the profile's visibility marking.
    pub fn basic_payload(&self) -> GraphPayload {
        let vis = &self.profile.visibility;

        let v1 = Vertex::new(ElementId::new("1")).with_property(
            KEY_NAME,
            Property::new(PropertyValue::string("stevejobs"), vis.clone()),
        );
        let v2 = Vertex::new(ElementId::new("2")).with_property(
            KEY_NAME,
            Property::new(PropertyValue::string("stevewoz"), vis.clone()),
        );
        let edge = Edge::new(
            ElementId::new("1"),
            ElementId::new("2"),
            EDGE_LABEL_FRIEND,
            vis.clone(),
        )
        .with_property(
            KEY_NAME,
            Property::new(PropertyValue::string("friendz"), vis.clone()),
        );

        GraphPayload {
            vertices: vec![v1, v2],
            edges: vec![edge],
        }
    }

    /// Optionally create the schema, then write the canned payload.
    ///
    /// Schema and write failures are handled per the profile's write
    /// policy; the returned report records the outcome of each step.
    pub async fn send_basic_graph<S: GraphService>(
        &self,
        service: &S,
        token: &SecurityToken,
        run_create_schema: bool,
    ) -> Result<SendReport> {
        let profile = &self.profile;
        let mut report = SendReport {
            schema: StepOutcome::Skipped,
            write: StepOutcome::Skipped,
        };

        if run_create_schema {
            report.schema = match service
                .create_schema(
                    &profile.app_name,
                    &profile.visibility,
                    &profile.graph,
                    &profile.keys,
                    &profile.labels,
                    token,
                )
                .await
            {
                Ok(()) => {
                    tracing::info!(graph = %profile.graph, "Created schema");
                    StepOutcome::Succeeded
                }
                Err(e) => self.write_failure("create_schema", e)?,
            };
        }

        let payload = self.basic_payload();
        report.write = match service
            .write_graph(
                &profile.app_name,
                &profile.visibility,
                &profile.graph,
                &payload,
                token,
            )
            .await
        {
            Ok(()) => {
                tracing::info!(
                    graph = %profile.graph,
                    vertices = payload.vertices.len(),
                    edges = payload.edges.len(),
                    "Sent basic graph"
                );
                StepOutcome::Succeeded
            }
            Err(e) => self.write_failure("write_graph", e)?,
        };

        Ok(report)
    }

    /// Query vertices whose `NAME` matches the seeded value. Failures here
    /// always propagate to the caller unchanged; the read path is
    /// must-succeed under both write policies.
    pub async fn find_vertices<S: GraphService>(
        &self,
        service: &S,
        token: &SecurityToken,
    ) -> std::result::Result<Vec<Vertex>, GraphError> {
        service
            .find_vertices(
                &self.profile.graph,
                KEY_NAME,
                &PropertyValue::string(QUERY_VALUE),
                token,
            )
            .await
    }

    fn write_failure(&self, step: &'static str, source: GraphError) -> Result<StepOutcome> {
        match self.profile.write_policy {
            WritePolicy::BestEffort => {
                tracing::error!(step, error = %source, "Write step failed; continuing");
                Ok(StepOutcome::Swallowed)
            }
            WritePolicy::Strict => Err(SeedError::WriteStep { step, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SeedProfile {
        SeedProfile::from_config(&CairnConfig::default())
    }

    #[test]
    fn profile_carries_the_fixed_demo_constants() {
        let p = profile();
        assert_eq!(p.app_name, "testGraph");
        assert_eq!(p.security_id, "client");
        assert_eq!(p.graph, GraphName::default());
        assert_eq!(p.visibility.0, "U//FOUO");
        assert_eq!(p.keys.len(), 1);
        assert_eq!(p.keys[0].name, KEY_NAME);
        assert_eq!(p.labels, vec![EdgeLabel::new("friend")]);
        assert_eq!(p.write_policy, WritePolicy::BestEffort);
    }

    #[test]
    fn payload_is_two_vertices_and_one_edge() {
        let payload = Seeder::new(profile()).basic_payload();
        assert_eq!(payload.vertices.len(), 2);
        assert_eq!(payload.edges.len(), 1);

        let edge = &payload.edges[0];
        assert_eq!(edge.source, payload.vertices[0].id);
        assert_eq!(edge.dest, payload.vertices[1].id);
        assert_eq!(edge.label, "friend");
    }

    #[test]
    fn every_payload_property_carries_the_profile_visibility() {
        let p = profile();
        let payload = Seeder::new(p.clone()).basic_payload();

        for vertex in &payload.vertices {
            for values in vertex.properties.values() {
                for property in values {
                    assert_eq!(property.visibility, p.visibility);
                }
            }
        }
        for edge in &payload.edges {
            assert_eq!(edge.visibility, p.visibility);
            for property in edge.properties.values() {
                assert_eq!(property.visibility, p.visibility);
            }
        }
    }
}
