//! Build dispatch: lifecycle tracking around an external packager.

mod dispatcher;
mod packager;

pub use dispatcher::{BuildDispatcher, BuildReport, BuildState, run_packager};
pub use packager::{PackageRequest, Packager, ProcessPackager};
