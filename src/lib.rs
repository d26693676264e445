//! # Script Build Config
//!
//! Build-settings synchronization and packaging-profile resolution for
//! script projects.
//!
//! A user edits a flat set of fields and capability toggles; this crate
//! reconciles them into a persisted, versioned project descriptor that an
//! external packager consumes.
//!
//! ## Features
//!
//! - **Idempotent bundles**: capability toggles union fixed library, asset and permission sets into the descriptor
//! - **Stable persistence**: saving an unchanged descriptor reproduces the file byte for byte
//! - **Dirty detection**: structural comparison gates unsaved-change prompts
//! - **Promotion**: a loose script becomes a project directory, with rollback on failure
//! - **Build dispatch**: observable idle/building/succeeded/failed lifecycle around the packager
//!
//! ## Usage
//!
//! ```bash
//! script_build_config configure foo.js --name Foo --package-id com.example.foo
//! script_build_config promote foo.js
//! script_build_config build foo --packager my-packager
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod build;
pub mod bundles;
pub mod cli;
pub mod descriptor;
pub mod error;
pub mod project;
pub mod resources;
pub mod session;
pub mod settings;
pub mod utils;

pub use build::{BuildDispatcher, BuildReport, BuildState, Packager, ProcessPackager};
pub use bundles::{Capabilities, Capability};
pub use cli::Args;
pub use descriptor::{Asset, Descriptor, DescriptorStore, LaunchConfig, OrderedSet};
pub use error::{ConfigError, Result};
pub use project::{ProjectLayout, ProjectLocation, ProjectMode, promote};
pub use resources::{FsIconStore, IconStore};
pub use session::{BuildSession, EditState, SessionHandle, is_dirty, sync};
pub use settings::ToolSettings;
