//! Client pooling with scoped borrow/return.
//!
//! A borrowed handle is returned to the pool exactly once, when its guard
//! drops, on every exit path. There is no manual return call.

use std::ops::Deref;
use std::sync::{Arc, Mutex};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::bolt::{BoltGraphService, GraphConfig};
use crate::service::GraphError;

/// A pool of ready service handles for one named service.
pub struct ClientPool<S> {
    service_name: String,
    idle: Arc<Mutex<Vec<S>>>,
    permits: Arc<Semaphore>,
}

impl<S> ClientPool<S> {
    /// Wrap pre-built handles. Used by tests and in-process services.
    pub fn from_clients(service_name: impl Into<String>, clients: Vec<S>) -> Self {
        let permits = Arc::new(Semaphore::new(clients.len()));
        Self {
            service_name: service_name.into(),
            idle: Arc::new(Mutex::new(clients)),
            permits,
        }
    }

    /// Borrow a handle, waiting until one is free.
    pub async fn acquire(&self) -> Result<PooledClient<S>, GraphError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| GraphError::Connection("client pool closed".to_string()))?;

        let client = self
            .idle
            .lock()
            .expect("pool lock poisoned")
            .pop()
            .expect("pool permit issued without an idle client");

        tracing::debug!(service = %self.service_name, "Borrowed pooled client");
        Ok(PooledClient {
            client: Some(client),
            idle: Arc::clone(&self.idle),
            _permit: permit,
        })
    }

    /// Handles currently idle in the pool.
    pub fn available(&self) -> usize {
        self.idle.lock().expect("pool lock poisoned").len()
    }
}

impl ClientPool<BoltGraphService> {
    /// Dial `size` Bolt handles up front for the given service.
    pub async fn connect(
        service_name: impl Into<String>,
        config: &GraphConfig,
        size: usize,
    ) -> Result<Self, GraphError> {
        let service_name = service_name.into();
        let mut clients = Vec::with_capacity(size);
        for _ in 0..size {
            clients.push(BoltGraphService::connect(config).await?);
        }

        tracing::info!(service = %service_name, size, "Client pool ready");
        Ok(Self::from_clients(service_name, clients))
    }
}

/// A borrowed service handle; returns itself to the pool on drop.
pub struct PooledClient<S> {
    client: Option<S>,
    idle: Arc<Mutex<Vec<S>>>,
    _permit: OwnedSemaphorePermit,
}

impl<S> Deref for PooledClient<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        self.client.as_ref().expect("pooled client already returned")
    }
}

impl<S> Drop for PooledClient<S> {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.idle.lock().expect("pool lock poisoned").push(client);
        }
    }
}
