//! In-memory reference store.
//!
//! Behaves like the relational service with one explicit policy decision:
//! deleting systems also deletes interfaces touching them (the FK-style
//! cleanup a database would do), while descendant systems are left in place
//! with their now-dangling parent reference. The resolver tolerates those
//! orphans, so nothing downstream needs to special-case them.

use indexmap::IndexMap;

use sysmap_core::{InterfaceKey, InterfaceRecord, SystemId, SystemPatch, SystemRecord};

use crate::{Result, StoreError, SystemStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    systems: IndexMap<SystemId, SystemRecord>,
    interfaces: IndexMap<InterfaceKey, InterfaceRecord>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Seeds the store from existing rows; the generated-id counter resumes
    /// above the highest seeded system id.
    pub fn from_records(systems: Vec<SystemRecord>, interfaces: Vec<InterfaceRecord>) -> Self {
        let next_id = systems.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        Self {
            systems: systems.into_iter().map(|s| (s.id, s)).collect(),
            interfaces: interfaces.into_iter().map(|i| (i.key(), i)).collect(),
            next_id,
        }
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }
}

impl SystemStore for MemoryStore {
    async fn select_systems(&self) -> Result<Vec<SystemRecord>> {
        Ok(self.systems.values().cloned().collect())
    }

    async fn select_systems_by_ids(&self, ids: &[SystemId]) -> Result<Vec<SystemRecord>> {
        Ok(self
            .systems
            .values()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn insert_system(
        &mut self,
        name: &str,
        category: Option<&str>,
        parent: Option<SystemId>,
    ) -> Result<SystemRecord> {
        if let Some(parent) = parent {
            if !self.systems.contains_key(&parent) {
                return Err(StoreError::MissingSystem { id: parent });
            }
        }

        let record = SystemRecord {
            id: SystemId(self.next_id),
            name: name.to_string(),
            category: category.map(str::to_string),
            parent_system_id: parent,
        };
        self.next_id += 1;
        self.systems.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_system(&mut self, id: SystemId, patch: SystemPatch) -> Result<()> {
        let record = self
            .systems
            .get_mut(&id)
            .ok_or(StoreError::MissingSystem { id })?;
        patch.apply_to(record);
        Ok(())
    }

    async fn delete_systems(&mut self, ids: &[SystemId]) -> Result<()> {
        self.systems.retain(|id, _| !ids.contains(id));
        // FK-style cleanup: interfaces touching a deleted system go with it.
        // Children of a deleted system stay behind with a dangling parent id.
        self.interfaces
            .retain(|key, _| !ids.contains(&key.first) && !ids.contains(&key.second));
        Ok(())
    }

    async fn select_interfaces_touching(&self, ids: &[SystemId]) -> Result<Vec<InterfaceRecord>> {
        Ok(self
            .interfaces
            .values()
            .filter(|i| ids.contains(&i.first_system_id) || ids.contains(&i.second_system_id))
            .cloned()
            .collect())
    }

    async fn insert_interface(&mut self, first: SystemId, second: SystemId) -> Result<()> {
        for id in [first, second] {
            if !self.systems.contains_key(&id) {
                return Err(StoreError::MissingSystem { id });
            }
        }

        let key = InterfaceKey::new(first, second);
        if self.interfaces.contains_key(&key) {
            return Err(StoreError::mutation(format!(
                "interface {first}-{second} already exists"
            )));
        }
        self.interfaces
            .insert(key, InterfaceRecord::new(first, second));
        Ok(())
    }

    async fn update_interface(
        &mut self,
        key: InterfaceKey,
        directional: Option<i32>,
        connection_type: Option<&str>,
    ) -> Result<()> {
        let record = self
            .interfaces
            .get_mut(&key)
            .ok_or(StoreError::MissingInterface {
                first: key.first,
                second: key.second,
            })?;
        record.directional = directional;
        record.connection_type = connection_type.map(str::to_string);
        Ok(())
    }

    async fn delete_interface(&mut self, key: InterfaceKey) -> Result<()> {
        if self.interfaces.shift_remove(&key).is_none() {
            return Err(StoreError::MissingInterface {
                first: key.first,
                second: key.second,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn system(id: i64, parent: Option<i64>) -> SystemRecord {
        SystemRecord {
            id: SystemId(id),
            name: format!("system-{id}"),
            category: None,
            parent_system_id: parent.map(SystemId),
        }
    }

    fn seeded() -> MemoryStore {
        MemoryStore::from_records(
            vec![system(1, None), system(2, Some(1)), system(3, Some(2))],
            vec![
                InterfaceRecord::new(SystemId(1), SystemId(2)),
                InterfaceRecord::new(SystemId(2), SystemId(5)),
            ],
        )
    }

    #[test]
    fn generated_ids_resume_above_seeded_rows() {
        let mut store = seeded();
        let record = block_on(store.insert_system("new", None, None)).unwrap();
        assert_eq!(record.id, SystemId(4));
    }

    #[test]
    fn interface_query_matches_either_endpoint() {
        let store = seeded();
        let rows = block_on(store.select_interfaces_touching(&[SystemId(2)])).unwrap();
        let keys: Vec<String> = rows.iter().map(|r| r.key().edge_id().to_string()).collect();
        assert_eq!(keys, vec!["1-2", "2-5"]);

        let rows = block_on(store.select_interfaces_touching(&[SystemId(5)])).unwrap();
        assert_eq!(rows.len(), 1);

        let rows = block_on(store.select_interfaces_touching(&[])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn deleting_a_system_cleans_up_its_interfaces_but_not_its_children() {
        let mut store = seeded();
        block_on(store.delete_systems(&[SystemId(2)])).unwrap();

        assert_eq!(store.interface_count(), 0);

        // System 3 is orphaned, not deleted.
        let remaining = block_on(store.select_systems()).unwrap();
        let ids: Vec<i64> = remaining.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(remaining[1].parent_system_id, Some(SystemId(2)));
    }

    #[test]
    fn inserting_a_duplicate_interface_fails() {
        let mut store = seeded();
        let err = block_on(store.insert_interface(SystemId(1), SystemId(2))).unwrap_err();
        assert!(matches!(err, StoreError::Mutation { .. }));
    }

    #[test]
    fn inserting_an_interface_to_a_missing_system_fails() {
        let mut store = seeded();
        let err = block_on(store.insert_interface(SystemId(1), SystemId(99))).unwrap_err();
        assert!(matches!(err, StoreError::MissingSystem { .. }));
    }

    #[test]
    fn interface_update_sets_both_columns() {
        let mut store = seeded();
        let key = InterfaceKey::new(SystemId(1), SystemId(2));
        block_on(store.update_interface(key, Some(1), Some("https"))).unwrap();

        let rows = block_on(store.select_interfaces_touching(&[SystemId(1)])).unwrap();
        assert_eq!(rows[0].directional, Some(1));
        assert_eq!(rows[0].connection_type.as_deref(), Some("https"));
    }

    #[test]
    fn patching_a_missing_system_reports_the_id() {
        let mut store = seeded();
        let err =
            block_on(store.update_system(SystemId(42), SystemPatch::rename("x"))).unwrap_err();
        assert!(matches!(err, StoreError::MissingSystem { id } if id == SystemId(42)));
    }
}
