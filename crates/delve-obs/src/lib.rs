//! Agent-centered observation windows and cell descriptions.
//!
//! This crate turns a full-map [`Snapshot`](delve_core::Snapshot) into
//! what an agent actually sees:
//!
//! - [`window`]: fixed odd-sized crops padded past the map border
//! - [`describe`]: single-cell and 3x3 neighborhood descriptions, and
//!   direction-aware searches over them
//! - [`inventory`]: inventory letter lookups
//! - [`spec`] / [`plan`]: the observation key list and its execution

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod describe;
pub mod inventory;
pub mod plan;
pub mod spec;
pub mod window;

pub use describe::{
    cell_description, field_contains, find_direction_of, neighbor_index_to_direction,
    neighborhood_descriptions, Neighborhood, CENTER_INDEX,
};
pub use inventory::key_in_inventory;
pub use plan::{ObsPlan, ObsValue, Observation};
pub use spec::ObsKey;
pub use window::{crop, CropWindow};
