//! Relational record types, mirroring the `system` and `interfaces_with`
//! relations of the persistence service.

use serde::{Deserialize, Serialize};

use crate::ids::{InterfaceKey, SystemId};

/// One row of the `system` relation. `parent_system_id` makes the rows a
/// forest; cycles are not validated here (the resolver's depth bound keeps
/// traversal finite regardless).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub id: SystemId,
    pub name: String,
    pub category: Option<String>,
    pub parent_system_id: Option<SystemId>,
}

impl SystemRecord {
    pub fn is_root(&self) -> bool {
        self.parent_system_id.is_none()
    }
}

/// One row of the `interfaces_with` relation, keyed by
/// `(first_system_id, second_system_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub first_system_id: SystemId,
    pub second_system_id: SystemId,
    pub directional: Option<i32>,
    pub connection_type: Option<String>,
}

impl InterfaceRecord {
    pub fn new(first: SystemId, second: SystemId) -> Self {
        Self {
            first_system_id: first,
            second_system_id: second,
            directional: None,
            connection_type: None,
        }
    }

    pub fn key(&self) -> InterfaceKey {
        InterfaceKey::new(self.first_system_id, self.second_system_id)
    }
}

/// Partial update of a `system` row. `None` leaves the column unchanged;
/// the nested `Option` distinguishes "unchanged" from "set to NULL".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemPatch {
    pub name: Option<String>,
    pub category: Option<Option<String>>,
    pub parent_system_id: Option<Option<SystemId>>,
}

impl SystemPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, record: &mut SystemRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(category) = &self.category {
            record.category = category.clone();
        }
        if let Some(parent) = &self.parent_system_id {
            record.parent_system_id = *parent;
        }
    }
}
