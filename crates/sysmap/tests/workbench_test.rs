use std::cell::Cell;
use std::rc::Rc;

use futures::executor::block_on;

use sysmap::geom::size;
use sysmap::{
    DiagramConfig, InterfaceKey, InterfaceRecord, MemoryStore, NodeId, NodeKind, StoreError,
    SystemId, SystemPatch, SystemRecord, SystemStore, Workbench,
};

fn system(id: i64, parent: Option<i64>) -> SystemRecord {
    SystemRecord {
        id: SystemId(id),
        name: format!("system-{id}"),
        category: None,
        parent_system_id: parent.map(SystemId),
    }
}

/// 1 ── 2 ── 3 plus a second root 9; one interface inside the subtree and
/// one crossing its boundary.
fn seeded_store() -> MemoryStore {
    MemoryStore::from_records(
        vec![
            system(1, None),
            system(2, Some(1)),
            system(3, Some(2)),
            system(9, None),
        ],
        vec![
            InterfaceRecord::new(SystemId(1), SystemId(2)),
            InterfaceRecord::new(SystemId(2), SystemId(9)),
        ],
    )
}

fn seeded_bench() -> Workbench<MemoryStore> {
    Workbench::new(seeded_store(), DiagramConfig::default())
}

fn node_ids(bench: &Workbench<MemoryStore>) -> Vec<String> {
    bench.nodes().iter().map(|n| n.id.to_string()).collect()
}

fn edge_ids(bench: &Workbench<MemoryStore>) -> Vec<String> {
    bench.edges().iter().map(|e| e.id.to_string()).collect()
}

#[test]
fn refresh_without_focus_shows_the_forest_roots() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();

    assert_eq!(node_ids(&bench), vec!["1", "9"]);
    for node in bench.nodes() {
        assert_eq!(node.kind, NodeKind::RootGroup);
    }
}

#[test]
fn drill_down_expands_to_the_configured_depth() {
    let mut bench = seeded_bench();
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();

    assert_eq!(bench.focus(), Some(SystemId(1)));
    assert_eq!(node_ids(&bench), vec!["1", "2", "3"]);
}

#[test]
fn shallower_depth_cuts_the_grandchild() {
    let config = DiagramConfig {
        max_depth: 1,
        ..Default::default()
    };
    let mut bench = Workbench::new(seeded_store(), config);
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();

    assert_eq!(node_ids(&bench), vec!["1", "2"]);
}

#[test]
fn drill_down_on_a_malformed_id_changes_nothing() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();
    let before = node_ids(&bench);

    let err = block_on(bench.drill_down(&NodeId::new("oops"))).unwrap_err();
    assert!(matches!(
        err,
        sysmap::Error::Core(sysmap_core::Error::MalformedNodeId { .. })
    ));
    assert_eq!(bench.focus(), None);
    assert_eq!(node_ids(&bench), before);
}

#[test]
fn clear_focus_returns_to_the_roots() {
    let mut bench = seeded_bench();
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();
    block_on(bench.clear_focus()).unwrap();

    assert_eq!(bench.focus(), None);
    assert_eq!(node_ids(&bench), vec!["1", "9"]);
}

#[test]
fn boundary_interfaces_appear_with_one_endpoint_offscreen() {
    let mut bench = seeded_bench();
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();

    // System 9 is not visible under focus 1, but the 2-9 interface is.
    assert!(edge_ids(&bench).contains(&"2-9".to_string()));
    assert!(!node_ids(&bench).contains(&"9".to_string()));
}

#[test]
fn connect_inserts_an_interface_and_reloads() {
    let mut bench = seeded_bench();
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();

    block_on(bench.connect(&NodeId::new("2"), &NodeId::new("3"))).unwrap();

    assert_eq!(bench.store().interface_count(), 3);
    assert!(edge_ids(&bench).contains(&"2-3".to_string()));
}

#[test]
fn connect_with_a_malformed_endpoint_fails_fast() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();

    let err = block_on(bench.connect(&NodeId::new("2"), &NodeId::new("not-an-id"))).unwrap_err();
    assert!(matches!(
        err,
        sysmap::Error::Core(sysmap_core::Error::MalformedNodeId { .. })
    ));
    assert_eq!(bench.store().interface_count(), 2);
}

#[test]
fn deleting_a_node_batches_the_ids_and_survives_the_orphan() {
    let mut bench = seeded_bench();
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();

    block_on(bench.delete_nodes(&[NodeId::new("2")])).unwrap();

    // The store dropped system 2 and the interfaces touching it; system 3 is
    // orphaned and falls out of the visible set without any crash.
    assert_eq!(bench.focus(), Some(SystemId(1)));
    assert_eq!(node_ids(&bench), vec!["1"]);
    assert!(edge_ids(&bench).is_empty());
    assert_eq!(bench.store().system_count(), 3);
}

#[test]
fn deleting_an_edge_removes_its_interface_row() {
    let mut bench = seeded_bench();
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();

    let doomed = bench
        .edges()
        .iter()
        .find(|e| e.id.as_str() == "1-2")
        .unwrap()
        .id
        .clone();
    block_on(bench.delete_edges(&[doomed])).unwrap();

    assert_eq!(bench.store().interface_count(), 1);
    assert!(!edge_ids(&bench).contains(&"1-2".to_string()));
}

#[test]
fn deleting_an_unknown_edge_fails_before_touching_the_store() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();

    let bogus = InterfaceKey::new(SystemId(7), SystemId(8)).edge_id();
    let err = block_on(bench.delete_edges(&[bogus])).unwrap_err();
    assert!(matches!(
        err,
        sysmap::Error::Core(sysmap_core::Error::UnknownEdge { .. })
    ));
    assert_eq!(bench.store().interface_count(), 2);
}

#[test]
fn layout_is_gated_on_measurement() {
    let mut bench = seeded_bench();
    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();

    // 1 and 2 are groups and born measured; leaf 3 is not.
    assert!(!bench.nodes_measured());
    let err = bench.run_layout().unwrap_err();
    assert!(matches!(
        err,
        sysmap::Error::Core(sysmap_core::Error::NodesNotMeasured)
    ));
    assert!(!bench.is_positioned());

    bench.set_measured(&NodeId::new("3"), size(150.0, 40.0)).unwrap();
    assert!(bench.nodes_measured());
    bench.run_layout().unwrap();
    assert!(bench.is_positioned());
}

#[test]
fn measuring_an_unknown_node_is_reported() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();

    let err = bench
        .set_measured(&NodeId::new("42"), size(10.0, 10.0))
        .unwrap_err();
    assert!(matches!(
        err,
        sysmap::Error::Core(sysmap_core::Error::UnknownNode { .. })
    ));
}

#[test]
fn layout_anchors_top_left_from_centered_ranks() {
    // Root view: boxes 1 and 9 plus the off-screen endpoint 2 as a
    // zero-sized vertex between them (1 -> 2 -> 9), giving three ranks.
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();
    bench.run_layout().unwrap();

    let positions: Vec<(f64, f64)> = bench
        .nodes()
        .iter()
        .map(|n| (n.position.x, n.position.y))
        .collect();
    // Centers are (225, 150) and (225, 550); anchor correction subtracts
    // half the 450x300 box.
    assert_eq!(positions, vec![(0.0, 0.0), (0.0, 400.0)]);
}

#[test]
fn refresh_resets_positions_and_measurements() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();
    bench.run_layout().unwrap();
    assert!(bench.is_positioned());

    block_on(bench.drill_down(&NodeId::new("1"))).unwrap();
    assert!(!bench.is_positioned());
    assert!(!bench.nodes_measured());
}

#[test]
fn stale_refresh_generations_are_discarded() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();

    let stale = bench.begin_refresh();
    let snapshot_for_stale = block_on(bench.load_snapshot()).unwrap();
    let current = bench.begin_refresh();
    let snapshot_for_current = block_on(bench.load_snapshot()).unwrap();

    assert!(!bench.apply_snapshot(stale, snapshot_for_stale));
    assert!(bench.apply_snapshot(current, snapshot_for_current));
}

#[test]
fn create_update_and_edit_flows_reload_the_scope() {
    let mut bench = seeded_bench();
    block_on(bench.refresh()).unwrap();

    let record = block_on(bench.create_system("edge-cache", Some("infra"), None)).unwrap();
    assert!(node_ids(&bench).contains(&record.id.to_string()));

    block_on(bench.update_system(record.id, SystemPatch::rename("edge-cache-v2"))).unwrap();
    let renamed = bench
        .nodes()
        .iter()
        .find(|n| n.id.as_str() == record.id.to_string())
        .unwrap();
    assert_eq!(renamed.label, "edge-cache-v2");

    block_on(bench.update_interface(
        InterfaceKey::new(SystemId(1), SystemId(2)),
        Some(1),
        Some("grpc"),
    ))
    .unwrap();
}

/// Store whose reads can be switched off, for exercising the QueryFailure
/// path.
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: Rc<Cell<bool>>,
}

impl FlakyStore {
    fn check(&self) -> sysmap_store::Result<()> {
        if self.fail_reads.get() {
            Err(StoreError::query("connection reset"))
        } else {
            Ok(())
        }
    }
}

impl SystemStore for FlakyStore {
    async fn select_systems(&self) -> sysmap_store::Result<Vec<SystemRecord>> {
        self.check()?;
        self.inner.select_systems().await
    }

    async fn select_systems_by_ids(
        &self,
        ids: &[SystemId],
    ) -> sysmap_store::Result<Vec<SystemRecord>> {
        self.check()?;
        self.inner.select_systems_by_ids(ids).await
    }

    async fn insert_system(
        &mut self,
        name: &str,
        category: Option<&str>,
        parent: Option<SystemId>,
    ) -> sysmap_store::Result<SystemRecord> {
        self.inner.insert_system(name, category, parent).await
    }

    async fn update_system(&mut self, id: SystemId, patch: SystemPatch) -> sysmap_store::Result<()> {
        self.inner.update_system(id, patch).await
    }

    async fn delete_systems(&mut self, ids: &[SystemId]) -> sysmap_store::Result<()> {
        self.inner.delete_systems(ids).await
    }

    async fn select_interfaces_touching(
        &self,
        ids: &[SystemId],
    ) -> sysmap_store::Result<Vec<InterfaceRecord>> {
        self.check()?;
        self.inner.select_interfaces_touching(ids).await
    }

    async fn insert_interface(
        &mut self,
        first: SystemId,
        second: SystemId,
    ) -> sysmap_store::Result<()> {
        self.inner.insert_interface(first, second).await
    }

    async fn update_interface(
        &mut self,
        key: InterfaceKey,
        directional: Option<i32>,
        connection_type: Option<&str>,
    ) -> sysmap_store::Result<()> {
        self.inner
            .update_interface(key, directional, connection_type)
            .await
    }

    async fn delete_interface(&mut self, key: InterfaceKey) -> sysmap_store::Result<()> {
        self.inner.delete_interface(key).await
    }
}

#[test]
fn failed_reads_keep_the_previous_snapshot() {
    let fail_reads = Rc::new(Cell::new(false));
    let store = FlakyStore {
        inner: seeded_store(),
        fail_reads: fail_reads.clone(),
    };
    let mut bench = Workbench::new(store, DiagramConfig::default());

    block_on(bench.refresh()).unwrap();
    let before: Vec<String> = bench.nodes().iter().map(|n| n.id.to_string()).collect();

    fail_reads.set(true);
    let err = block_on(bench.refresh()).unwrap_err();
    assert!(err.is_query_failure());

    let after: Vec<String> = bench.nodes().iter().map(|n| n.id.to_string()).collect();
    assert_eq!(before, after);
}
