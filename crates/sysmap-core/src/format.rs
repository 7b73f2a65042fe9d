//! Graph formatting: visible records in, visual nodes and edges out.
//!
//! The output is derived state. It is fully recomputed from the records on
//! every refresh and never persisted; positions start at the origin and are
//! assigned later by the layout pass.

use rustc_hash::FxHashSet;

use crate::config::DiagramConfig;
use crate::geom::{Point, Size};
use crate::ids::{EdgeId, NodeId, SystemId};
use crate::records::{InterfaceRecord, SystemRecord};

/// Style variant of a visual node.
///
/// A system becomes a group when it either has no parent or is the parent of
/// another visible system; the group flavor depends on whether its own
/// parent is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Group whose parent is absent or off-screen: the larger, lighter box.
    RootGroup,
    /// Group rendered inside a visible parent: the smaller, darker box.
    NestedGroup,
    Leaf,
}

impl NodeKind {
    pub fn is_group(self) -> bool {
        matches!(self, NodeKind::RootGroup | NodeKind::NestedGroup)
    }
}

/// A visual node. `size` is preset for groups (their box metrics come from
/// config) and `None` for leaves until the renderer reports a measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub id: NodeId,
    pub label: String,
    pub position: Point,
    pub size: Option<Size>,
    /// Containment: set only when the parent system is itself visible. The
    /// node is then positioned in the parent's coordinate frame and cannot
    /// be dragged outside it.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// A visual edge derived from one interface record. Either endpoint may
/// reference an off-screen system; the renderer tolerates the dangling side.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// Formats visible system and interface records into the visual graph.
///
/// The interface slice is expected to be pre-filtered by the store's
/// inclusive-OR endpoint query; every record in it becomes an edge.
pub fn format(
    systems: &[SystemRecord],
    interfaces: &[InterfaceRecord],
    config: &DiagramConfig,
) -> (Vec<FlowNode>, Vec<FlowEdge>) {
    let visible_ids: FxHashSet<SystemId> = systems.iter().map(|s| s.id).collect();
    let parent_ids: FxHashSet<SystemId> =
        systems.iter().filter_map(|s| s.parent_system_id).collect();

    let nodes = systems
        .iter()
        .map(|system| {
            let is_group = system.parent_system_id.is_none() || parent_ids.contains(&system.id);
            let parent_visible = system
                .parent_system_id
                .is_some_and(|p| visible_ids.contains(&p));

            let kind = if !is_group {
                NodeKind::Leaf
            } else if parent_visible {
                NodeKind::NestedGroup
            } else {
                NodeKind::RootGroup
            };

            let size = match kind {
                NodeKind::RootGroup => Some(config.root_group.size()),
                NodeKind::NestedGroup => Some(config.nested_group.size()),
                NodeKind::Leaf => None,
            };

            FlowNode {
                id: system.id.node_id(),
                label: system.name.clone(),
                position: Point::zero(),
                size,
                parent: parent_visible
                    .then(|| system.parent_system_id.map(SystemId::node_id))
                    .flatten(),
                kind,
            }
        })
        .collect();

    let edges = interfaces
        .iter()
        .map(|interface| FlowEdge {
            id: interface.key().edge_id(),
            source: interface.first_system_id.node_id(),
            target: interface.second_system_id.node_id(),
        })
        .collect();

    (nodes, edges)
}
