//! Diagram configuration.
//!
//! All knobs have serde defaults so a config deserialized from an empty
//! object behaves like `DiagramConfig::default()`.

use serde::{Deserialize, Serialize};

use crate::geom::{Size, size};

/// Fixed box metrics for a group container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupBox {
    pub width: f64,
    pub height: f64,
}

impl GroupBox {
    pub fn size(&self) -> Size {
        size(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Descendant traversal bound below the focused system.
    pub max_depth: usize,
    /// Rank direction for the layered layout: "TB", "BT", "LR" or "RL".
    pub direction: String,
    /// Separation between nodes on the same rank.
    pub nodesep: f64,
    /// Separation between consecutive ranks.
    pub ranksep: f64,
    /// Box metrics for a group whose parent is off-screen or absent.
    pub root_group: GroupBox,
    /// Box metrics for a group rendered inside a visible parent.
    pub nested_group: GroupBox,
    /// Zoom bounds applied when fitting the viewport to the diagram.
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            direction: "TB".to_string(),
            nodesep: 50.0,
            ranksep: 50.0,
            root_group: GroupBox {
                width: 450.0,
                height: 300.0,
            },
            nested_group: GroupBox {
                width: 200.0,
                height: 150.0,
            },
            min_zoom: 0.5,
            max_zoom: 2.0,
        }
    }
}
