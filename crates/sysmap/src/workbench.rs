//! The diagram workbench: owned state container plus mutation bridge.
//!
//! State lives in exactly one place and follows one discipline: snapshots
//! are replaced wholesale by the resolve → format pipeline, never patched.
//! Mutations are fire-and-forget against the visual model; each one goes to
//! the store and is followed by a full reload of the visible scope.

use tracing::{debug, warn};

use sysmap_core::geom::{Size, point};
use sysmap_core::{
    DiagramConfig, EdgeId, FlowEdge, FlowNode, InterfaceKey, NodeId, SystemId, SystemPatch,
    SystemRecord, format, resolve_visible,
};
use sysmap_layout::{LayoutGraph, LayoutOptions, RankDir, layout};
use sysmap_store::SystemStore;

use crate::Result;

/// One fully-formatted generation of the visual graph.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

/// Ticket for one in-flight refresh. Applying a snapshot whose token is no
/// longer current is a no-op: when reloads overlap, the newest wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken(u64);

pub struct Workbench<S> {
    store: S,
    config: DiagramConfig,
    focus: Option<SystemId>,
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    generation: u64,
    positioned: bool,
}

impl<S> Workbench<S> {
    pub fn new(store: S, config: DiagramConfig) -> Self {
        Self {
            store,
            config,
            focus: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            generation: 0,
            positioned: false,
        }
    }

    pub fn focus(&self) -> Option<SystemId> {
        self.focus
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True once the current snapshot has been through the layout pass.
    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    /// Records a leaf measurement reported by the renderer. Group nodes are
    /// born measured (their box metrics come from config).
    pub fn set_measured(&mut self, node: &NodeId, size: Size) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == *node)
            .ok_or_else(|| sysmap_core::Error::UnknownNode {
                id: node.to_string(),
            })?;
        node.size = Some(size);
        Ok(())
    }

    /// The readiness signal layout is gated on.
    pub fn nodes_measured(&self) -> bool {
        self.nodes.iter().all(|n| n.size.is_some())
    }

    /// Runs the layered layout and anchor correction over the current
    /// snapshot.
    ///
    /// Hard ordering dependency: this must not run before every node has a
    /// size. Zero-sized placeholders would collapse the whole diagram onto
    /// one point, so the gate fails instead of guessing.
    pub fn run_layout(&mut self) -> Result<()> {
        if !self.nodes_measured() {
            return Err(sysmap_core::Error::NodesNotMeasured.into());
        }

        let mut g = LayoutGraph::new();
        for edge in &self.edges {
            g.set_edge(edge.source.as_str(), edge.target.as_str());
        }
        for node in &self.nodes {
            if let Some(size) = node.size {
                g.set_node(node.id.as_str(), size.width, size.height);
            }
        }

        layout(&mut g, &self.layout_options());

        // The layering returns centers; the rendering surface anchors nodes
        // at their top-left corner.
        for node in &mut self.nodes {
            let Some(label) = g.node(node.id.as_str()) else {
                continue;
            };
            if let (Some(x), Some(y), Some(size)) = (label.x, label.y, node.size) {
                node.position = point(x - size.width / 2.0, y - size.height / 2.0);
            }
        }

        self.positioned = true;
        debug!(nodes = self.nodes.len(), edges = self.edges.len(), "layout applied");
        Ok(())
    }

    /// Computes the viewport that fits the positioned diagram into a surface.
    pub fn fit_view(&self, surface: Size) -> crate::Viewport {
        crate::viewport::fit(
            &self.nodes,
            surface,
            self.config.min_zoom,
            self.config.max_zoom,
        )
    }

    fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            rankdir: RankDir::from_name(&self.config.direction),
            nodesep: self.config.nodesep,
            ranksep: self.config.ranksep,
        }
    }

    /// Starts a refresh generation. Snapshots built for an older token are
    /// discarded at apply time.
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.generation += 1;
        RefreshToken(self.generation)
    }

    /// Installs a snapshot unless a newer refresh has started since `token`
    /// was issued. Returns whether the snapshot was applied.
    pub fn apply_snapshot(&mut self, token: RefreshToken, snapshot: Snapshot) -> bool {
        if token.0 != self.generation {
            debug!(
                stale = token.0,
                current = self.generation,
                "discarding stale refresh"
            );
            return false;
        }
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.positioned = false;
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "snapshot applied"
        );
        true
    }
}

impl<S: SystemStore> Workbench<S> {
    /// Reloads the visible scope: select all systems, resolve visibility for
    /// the current focus, fetch the interfaces touching the visible set, and
    /// format the result.
    ///
    /// A failed read leaves the previous snapshot untouched; the diagram
    /// keeps showing the last successfully resolved data.
    pub async fn refresh(&mut self) -> Result<()> {
        let token = self.begin_refresh();
        let snapshot = match self.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                if err.is_query_failure() {
                    warn!(error = %err, "refresh failed; keeping previous snapshot");
                }
                return Err(err);
            }
        };
        self.apply_snapshot(token, snapshot);
        Ok(())
    }

    /// Builds a snapshot for the current focus without touching state.
    pub async fn load_snapshot(&self) -> Result<Snapshot> {
        let all = self.store.select_systems().await?;
        let visible = resolve_visible(&all, self.focus, self.config.max_depth);

        let visible_ids: Vec<SystemId> = visible.iter().map(|s| s.id).collect();
        let interfaces = if visible_ids.is_empty() {
            Vec::new()
        } else {
            self.store.select_interfaces_touching(&visible_ids).await?
        };

        let (nodes, edges) = format(&visible, &interfaces, &self.config);
        Ok(Snapshot { nodes, edges })
    }

    /// Double-click on a node: make it the navigation root.
    ///
    /// The id is parsed before any state changes; a malformed id is reported
    /// and the focus stays where it was.
    pub async fn drill_down(&mut self, node: &NodeId) -> Result<()> {
        let id = node.system_id()?;
        self.focus = Some(id);
        self.refresh().await
    }

    /// Back to the top-level forest roots.
    pub async fn clear_focus(&mut self) -> Result<()> {
        self.focus = None;
        self.refresh().await
    }

    /// User dragged a connection between two visible nodes.
    pub async fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<()> {
        let first = source.system_id()?;
        let second = target.system_id()?;
        self.store.insert_interface(first, second).await?;
        self.refresh().await
    }

    /// Deletes the selected edges, one interface row each, then reloads.
    /// Unknown edge ids fail the whole batch before any row is touched.
    pub async fn delete_edges(&mut self, edge_ids: &[EdgeId]) -> Result<()> {
        let mut keys: Vec<InterfaceKey> = Vec::with_capacity(edge_ids.len());
        for id in edge_ids {
            let edge = self
                .edges
                .iter()
                .find(|e| e.id == *id)
                .ok_or_else(|| sysmap_core::Error::UnknownEdge { id: id.to_string() })?;
            keys.push(InterfaceKey::new(
                edge.source.system_id()?,
                edge.target.system_id()?,
            ));
        }

        for key in keys {
            self.store.delete_interface(key).await?;
        }
        self.refresh().await
    }

    /// Deletes the selected nodes as one batched system delete, then
    /// reloads. No cascade happens here: interface or descendant cleanup is
    /// the store's policy.
    pub async fn delete_nodes(&mut self, node_ids: &[NodeId]) -> Result<()> {
        let ids: Vec<SystemId> = node_ids
            .iter()
            .map(NodeId::system_id)
            .collect::<sysmap_core::Result<_>>()?;
        self.store.delete_systems(&ids).await?;
        self.refresh().await
    }

    pub async fn create_system(
        &mut self,
        name: &str,
        category: Option<&str>,
        parent: Option<SystemId>,
    ) -> Result<SystemRecord> {
        let record = self.store.insert_system(name, category, parent).await?;
        self.refresh().await?;
        Ok(record)
    }

    pub async fn update_system(&mut self, id: SystemId, patch: SystemPatch) -> Result<()> {
        self.store.update_system(id, patch).await?;
        self.refresh().await
    }

    pub async fn update_interface(
        &mut self,
        key: InterfaceKey,
        directional: Option<i32>,
        connection_type: Option<&str>,
    ) -> Result<()> {
        self.store
            .update_interface(key, directional, connection_type)
            .await?;
        self.refresh().await
    }
}
