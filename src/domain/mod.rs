//! Domain layer: the chart engine and its persistence format
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod chart;
pub mod codec;
pub mod entities;
pub mod error;

pub use arena::{NodeId, TreeArena, TreeNode};
pub use chart::{ChartResult, Fired, Hired, OrgChart, INDENT};
pub use codec::{decode, encode, CodecError, CodecResult};
pub use entities::*;
pub use error::DomainError;
