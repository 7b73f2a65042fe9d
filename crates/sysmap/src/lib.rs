#![forbid(unsafe_code)]

//! Interactive system-landscape diagrams.
//!
//! This crate wires the pieces together: the [`Workbench`] owns the focus
//! and the visual graph, drives the resolve → format → measure → layout
//! pipeline against a [`sysmap_store::SystemStore`], and translates graph
//! gestures back into relational mutations followed by a full reload.
//!
//! ```no_run
//! use sysmap::{DiagramConfig, MemoryStore, Workbench};
//!
//! # async fn demo() -> sysmap::Result<()> {
//! let mut bench = Workbench::new(MemoryStore::new(), DiagramConfig::default());
//! bench.refresh().await?;
//! // ... renderer measures the leaf nodes ...
//! bench.run_layout()?;
//! # Ok(())
//! # }
//! ```

mod viewport;
mod workbench;

pub use viewport::Viewport;
pub use workbench::{RefreshToken, Snapshot, Workbench};

pub use sysmap_core::{
    DiagramConfig, EdgeId, FlowEdge, FlowNode, InterfaceKey, InterfaceRecord, NodeId, NodeKind,
    SystemId, SystemPatch, SystemRecord, geom,
};
pub use sysmap_layout::{LayoutOptions, RankDir};
pub use sysmap_store::{MemoryStore, StoreError, SystemStore};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] sysmap_core::Error),

    #[error(transparent)]
    Store(#[from] sysmap_store::StoreError),
}

impl Error {
    /// True when the failure came from a persistence read, i.e. the previous
    /// snapshot is still the best data available.
    pub fn is_query_failure(&self) -> bool {
        matches!(self, Error::Store(StoreError::Query { .. }))
    }
}
