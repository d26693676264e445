//! Capability bundles: which libraries, assets and permissions an optional
//! feature drags into the package, and how to tell whether a descriptor
//! already carries them.

pub mod catalog;
mod resolver;

pub use resolver::{
    Capabilities, Capability, CapabilityBundle, is_satisfied, merge_abis, resolve_assets,
    resolve_libraries, resolve_permissions, resolve_project_asset,
};
