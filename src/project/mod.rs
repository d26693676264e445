//! Script and project locations on disk, and the one-way promotion between them.

mod layout;
mod promote;

pub use layout::{
    PROJECT_DESCRIPTOR_FILE, PROJECT_RESOURCE_DIR, ProjectLayout, ProjectMode,
    SINGLE_FILE_DESCRIPTOR_SUFFIX, SINGLE_FILE_RESOURCE_PREFIX,
};
pub use promote::{ProjectLocation, Promotion, promote};
