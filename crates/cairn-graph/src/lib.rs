//! cairn-graph — typed client interface to the remote graph service.
//!
//! This crate is the single point of contact with the graph service. It
//! defines the service interface ([`GraphService`]), the Bolt-backed remote
//! implementation, an in-process implementation for tests and local demos,
//! and the client pool with scoped borrow/return.

pub mod bolt;
pub mod memory;
pub mod pool;
pub mod service;

pub use bolt::{BoltGraphService, GraphConfig};
pub use memory::{MemoryGraphService, ServiceOp};
pub use pool::{ClientPool, PooledClient};
pub use service::{GraphError, GraphService};
