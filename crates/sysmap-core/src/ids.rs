//! Identifier types for the two id spaces the engine straddles.
//!
//! Relational rows carry integer ids; the visual graph is keyed by strings.
//! Keeping one distinct type per space makes every crossing explicit: the
//! only way from a [`NodeId`] back to a [`SystemId`] is [`NodeId::system_id`],
//! which rejects anything that is not the decimal rendering of an integer.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relational identifier of a `system` row. Stable for the lifetime of the row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct SystemId(pub i64);

impl SystemId {
    /// The visual-graph rendering of this id.
    pub fn node_id(self) -> NodeId {
        NodeId(self.0.to_string())
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a visual node. Always the decimal rendering of a [`SystemId`];
/// anything else is rejected on the way back into the relational space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the node id back into the relational space.
    ///
    /// Fails fast on malformed input instead of coercing: a silently invented
    /// id would survive into a store filter and desynchronize the visible set.
    pub fn system_id(&self) -> Result<SystemId> {
        self.0
            .parse::<i64>()
            .map(SystemId)
            .map_err(|_| Error::MalformedNodeId {
                id: self.0.clone(),
            })
    }
}

impl From<SystemId> for NodeId {
    fn from(id: SystemId) -> Self {
        id.node_id()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite key of an `interfaces_with` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceKey {
    pub first: SystemId,
    pub second: SystemId,
}

impl InterfaceKey {
    pub fn new(first: SystemId, second: SystemId) -> Self {
        Self { first, second }
    }

    /// The visual-graph rendering of this key: `"<first>-<second>"`.
    pub fn edge_id(&self) -> EdgeId {
        EdgeId(format!("{}-{}", self.first, self.second))
    }
}

/// Identifier of a visual edge, derived from its [`InterfaceKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<InterfaceKey> for EdgeId {
    fn from(key: InterfaceKey) -> Self {
        key.edge_id()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
