#![forbid(unsafe_code)]

//! Persistence contract for the system-landscape diagram.
//!
//! The diagram core reads and mutates two relations, `system` and
//! `interfaces_with`, through the [`SystemStore`] trait. The trait is
//! runtime-agnostic: every operation is an `async fn` with no executor
//! dependency, so a host can back it with any transport.
//!
//! [`MemoryStore`] is the reference implementation used by tests and demos.

mod memory;

pub use memory::MemoryStore;

use sysmap_core::{InterfaceKey, InterfaceRecord, SystemId, SystemPatch, SystemRecord};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("query failed: {message}")]
    Query { message: String },

    #[error("mutation failed: {message}")]
    Mutation { message: String },

    #[error("no system row with id {id}")]
    MissingSystem { id: SystemId },

    #[error("no interface row with key {first}-{second}")]
    MissingInterface { first: SystemId, second: SystemId },
}

impl StoreError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn mutation(message: impl Into<String>) -> Self {
        Self::Mutation {
            message: message.into(),
        }
    }
}

/// Access to the `system` and `interfaces_with` relations.
///
/// Reads take the receiver by shared reference; mutations take it uniquely.
/// No operation retries: a failure is terminal for that call and the caller
/// decides what survives of its in-memory state.
#[allow(async_fn_in_trait)]
pub trait SystemStore {
    async fn select_systems(&self) -> Result<Vec<SystemRecord>>;

    async fn select_systems_by_ids(&self, ids: &[SystemId]) -> Result<Vec<SystemRecord>>;

    /// Inserts a row with a store-generated id and returns it.
    async fn insert_system(
        &mut self,
        name: &str,
        category: Option<&str>,
        parent: Option<SystemId>,
    ) -> Result<SystemRecord>;

    async fn update_system(&mut self, id: SystemId, patch: SystemPatch) -> Result<()>;

    /// Deletes the given rows in one batch. Missing ids are ignored, matching
    /// the relational idiom of `DELETE ... WHERE id IN (...)`.
    async fn delete_systems(&mut self, ids: &[SystemId]) -> Result<()>;

    /// Rows where *either* endpoint is in `ids` (inclusive OR). This is what
    /// lets a focused subtree show its boundary connections.
    async fn select_interfaces_touching(&self, ids: &[SystemId]) -> Result<Vec<InterfaceRecord>>;

    async fn insert_interface(&mut self, first: SystemId, second: SystemId) -> Result<()>;

    async fn update_interface(
        &mut self,
        key: InterfaceKey,
        directional: Option<i32>,
        connection_type: Option<&str>,
    ) -> Result<()>;

    async fn delete_interface(&mut self, key: InterfaceKey) -> Result<()>;
}
