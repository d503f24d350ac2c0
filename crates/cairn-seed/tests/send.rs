//! End-to-end seeding tests against the in-process graph service.

use cairn_core::{CairnConfig, GraphName, PropertyValue, SecurityToken, WritePolicy};
use cairn_graph::{ClientPool, GraphError, GraphService, MemoryGraphService, ServiceOp};
use cairn_seed::error::SeedError;
use cairn_seed::run::run_seed;
use cairn_seed::seeder::{SeedProfile, Seeder, StepOutcome};

fn seeder_with_policy(policy: WritePolicy) -> Seeder {
    let mut profile = SeedProfile::from_config(&CairnConfig::default());
    profile.write_policy = policy;
    Seeder::new(profile)
}

fn token() -> SecurityToken {
    SecurityToken::new("test-token", "client")
}

#[tokio::test]
async fn send_issues_schema_then_write_in_order() {
    let service = MemoryGraphService::new();
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    let report = seeder
        .send_basic_graph(&service, &token(), true)
        .await
        .unwrap();

    assert_eq!(
        service.calls(),
        vec![ServiceOp::CreateSchema, ServiceOp::WriteGraph]
    );
    assert_eq!(report.schema, StepOutcome::Succeeded);
    assert_eq!(report.write, StepOutcome::Succeeded);
    assert_eq!(service.schema(), Some((1, 1)));
}

#[tokio::test]
async fn send_without_create_skips_the_schema_call() {
    let service = MemoryGraphService::new();
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    let report = seeder
        .send_basic_graph(&service, &token(), false)
        .await
        .unwrap();

    assert_eq!(service.calls(), vec![ServiceOp::WriteGraph]);
    assert_eq!(report.schema, StepOutcome::Skipped);
}

#[tokio::test]
async fn seeded_vertex_is_found_by_name() {
    let service = MemoryGraphService::new();
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    seeder
        .send_basic_graph(&service, &token(), true)
        .await
        .unwrap();

    let found = seeder.find_vertices(&service, &token()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id.0, "1");

    let graph = GraphName::default();
    assert_eq!(service.vertex_count(&graph), 2);
    assert_eq!(service.edge_count(&graph), 1);
}

#[tokio::test]
async fn write_fault_is_swallowed_under_best_effort() {
    let service = MemoryGraphService::new();
    service.inject_fault(ServiceOp::WriteGraph);
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    let report = seeder
        .send_basic_graph(&service, &token(), true)
        .await
        .unwrap();

    assert_eq!(report.schema, StepOutcome::Succeeded);
    assert_eq!(report.write, StepOutcome::Swallowed);
}

#[tokio::test]
async fn schema_fault_is_swallowed_and_the_write_still_runs() {
    let service = MemoryGraphService::new();
    service.inject_fault(ServiceOp::CreateSchema);
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    let report = seeder
        .send_basic_graph(&service, &token(), true)
        .await
        .unwrap();

    assert_eq!(report.schema, StepOutcome::Swallowed);
    assert_eq!(report.write, StepOutcome::Succeeded);
    assert_eq!(service.vertex_count(&GraphName::default()), 2);
}

#[tokio::test]
async fn write_fault_propagates_under_strict() {
    let service = MemoryGraphService::new();
    service.inject_fault(ServiceOp::WriteGraph);
    let seeder = seeder_with_policy(WritePolicy::Strict);

    let err = seeder
        .send_basic_graph(&service, &token(), false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SeedError::WriteStep {
            step: "write_graph",
            ..
        }
    ));
}

#[tokio::test]
async fn find_fault_propagates_unchanged() {
    let service = MemoryGraphService::new();
    let seeder = seeder_with_policy(WritePolicy::BestEffort);
    seeder
        .send_basic_graph(&service, &token(), false)
        .await
        .unwrap();

    service.inject_fault(ServiceOp::FindVertices);
    let err = seeder.find_vertices(&service, &token()).await.unwrap_err();
    assert!(matches!(err, GraphError::Service(_)));
}

#[tokio::test]
async fn pooled_client_is_returned_after_a_successful_run() {
    let pool = ClientPool::from_clients("graph-service", vec![MemoryGraphService::new()]);
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    let outcome = run_seed(&pool, &seeder, &token(), true, true).await.unwrap();
    assert_eq!(outcome.verified, Some(1));
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn pooled_client_is_returned_when_the_send_fails() {
    let service = MemoryGraphService::new();
    service.inject_fault(ServiceOp::WriteGraph);
    let pool = ClientPool::from_clients("graph-service", vec![service]);
    let seeder = seeder_with_policy(WritePolicy::Strict);

    let result = run_seed(&pool, &seeder, &token(), false, false).await;
    assert!(result.is_err());
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn verify_failure_still_returns_the_client() {
    let service = MemoryGraphService::new();
    service.inject_fault(ServiceOp::FindVertices);
    let pool = ClientPool::from_clients("graph-service", vec![service]);
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    let result = run_seed(&pool, &seeder, &token(), false, true).await;
    assert!(matches!(result, Err(SeedError::Graph(_))));
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn resend_is_idempotent_for_the_query() {
    let service = MemoryGraphService::new();
    let seeder = seeder_with_policy(WritePolicy::BestEffort);

    seeder
        .send_basic_graph(&service, &token(), true)
        .await
        .unwrap();
    seeder
        .send_basic_graph(&service, &token(), false)
        .await
        .unwrap();

    let found = seeder.find_vertices(&service, &token()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(service.vertex_count(&GraphName::default()), 2);
}

#[tokio::test]
async fn find_vertices_matches_exactly_not_by_substring() {
    let service = MemoryGraphService::new();
    let seeder = seeder_with_policy(WritePolicy::BestEffort);
    seeder
        .send_basic_graph(&service, &token(), false)
        .await
        .unwrap();

    let found = service
        .find_vertices(
            &seeder.profile().graph,
            "NAME",
            &PropertyValue::string("steve"),
            &token(),
        )
        .await
        .unwrap();
    assert!(found.is_empty());
}
