//! Icon and resource storage inside a project.

mod icons;

pub use icons::{FsIconStore, IconStore, file_uri, reference_to_path, stage_icons};
