//! Descriptor model and persistence.
//!
//! The descriptor is the durable, internally-consistent record that the
//! packaging pipeline consumes. This module owns its shape and its
//! load/save contract.

mod model;
mod ordered_set;
mod store;

pub use model::{
    Asset, DEFAULT_BUILD_DIR, DEFAULT_VERSION_CODE, DEFAULT_VERSION_NAME, Descriptor,
    LaunchConfig,
};
pub use ordered_set::OrderedSet;
pub use store::{DescriptorStore, LoadDescriptorResult, SaveDescriptorResult};

use crate::error::Result;
use std::path::Path;

/// Load the descriptor at `path`; `Ok(None)` when the file does not exist
pub async fn load_descriptor(path: &Path) -> Result<Option<Descriptor>> {
    DescriptorStore::new(path).load().await
}

/// Save `descriptor` to `path`
pub async fn save_descriptor(path: &Path, descriptor: &Descriptor) -> Result<SaveDescriptorResult> {
    DescriptorStore::new(path).save(descriptor).await
}
