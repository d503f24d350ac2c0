//! One seeding run: borrow a pooled client, send, optionally verify.

use cairn_core::SecurityToken;
use cairn_graph::{ClientPool, GraphService};

use crate::error::{Result, SeedError};
use crate::seeder::{Seeder, SendReport};

/// Result of a seeding run.
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
    pub report: SendReport,
    /// Vertices found by the verify query, when requested.
    pub verified: Option<usize>,
}

/// Borrow a client from the pool for the duration of one send (and the
/// optional verify query). The guard returns the client to the pool on
/// every exit path, including failures.
pub async fn run_seed<S: GraphService>(
    pool: &ClientPool<S>,
    seeder: &Seeder,
    token: &SecurityToken,
    run_create_schema: bool,
    verify: bool,
) -> Result<RunOutcome> {
    let client = pool.acquire().await.map_err(SeedError::ClientAcquisition)?;

    let report = seeder
        .send_basic_graph(&*client, token, run_create_schema)
        .await?;

    let verified = if verify {
        let found = seeder.find_vertices(&*client, token).await?;
        tracing::info!(found = found.len(), "Verify query complete");
        Some(found.len())
    } else {
        None
    };

    Ok(RunOutcome { report, verified })
}
