#![forbid(unsafe_code)]

//! Domain model and graph construction for system-landscape diagrams.
//!
//! Design goals:
//! - deterministic, testable outputs (same records in, same graph out)
//! - a strict boundary between relational identifiers ([`ids::SystemId`])
//!   and visual identifiers ([`ids::NodeId`]); conversions are explicit and
//!   checked, never implicit coercions
//! - no persistence and no rendering: this crate turns records into a
//!   visual graph and nothing else

pub mod config;
pub mod error;
pub mod format;
pub mod geom;
pub mod ids;
pub mod records;
pub mod visibility;

pub use config::DiagramConfig;
pub use error::{Error, Result};
pub use format::{FlowEdge, FlowNode, NodeKind, format};
pub use ids::{EdgeId, InterfaceKey, NodeId, SystemId};
pub use records::{InterfaceRecord, SystemPatch, SystemRecord};
pub use visibility::resolve_visible;
