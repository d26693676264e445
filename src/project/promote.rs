//! Turning a loose script into a project directory.
//!
//! `/scripts/foo.js` becomes `/scripts/foo/foo.js` with `project.json` and
//! `res/` beside it. Every precondition is checked before the first
//! mutation. Mutations are journaled and undone in reverse order if a later
//! step fails, so the loose script is either fully promoted or untouched.

use super::ProjectLayout;
use crate::descriptor::{Descriptor, DescriptorStore, SaveDescriptorResult};
use crate::error::{FilesystemError, Result};
use crate::resources::{IconStore, file_uri, reference_to_path, stage_icons};
use crate::session::{EditState, sync, validate};
use crate::utils::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Where a promoted project ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// New project directory
    pub directory: PathBuf,
    /// Script inside the new directory
    pub script: PathBuf,
    /// Descriptor written inside the new directory
    pub descriptor_path: PathBuf,
}

/// Everything a session needs to continue after promotion
#[derive(Debug)]
pub struct Promotion {
    /// Paths of the new project
    pub location: ProjectLocation,
    /// Layout of the new project
    pub layout: ProjectLayout,
    /// Edit-state rewritten for the new location
    pub edit: EditState,
    /// Descriptor as persisted in the new location
    pub descriptor: Descriptor,
    /// Save details of the new descriptor
    pub saved: SaveDescriptorResult,
    /// Leftovers at the old location that could not be removed
    pub warnings: Vec<String>,
    /// Duration of the whole promotion
    pub duration: Duration,
}

impl Promotion {
    /// Format promotion result for display
    pub fn format_result(&self) -> String {
        let mut result = format!(
            "Promoted to project at {}\n  script: {}\n  descriptor: {}\n",
            self.location.directory.display(),
            self.location.script.display(),
            self.location.descriptor_path.display()
        );
        for warning in &self.warnings {
            result.push_str(&format!("  warning: {}\n", warning));
        }
        result.push_str(&format!("  duration: {:.2}s\n", self.duration.as_secs_f64()));
        result
    }
}

/// Completed filesystem mutation
#[derive(Debug)]
enum Step {
    CreatedDir(PathBuf),
    MovedFile { from: PathBuf, to: PathBuf },
}

/// Reverse log of completed mutations
#[derive(Debug, Default)]
struct Journal {
    steps: Vec<Step>,
}

impl Journal {
    fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Undo every recorded step, newest first. Failures are logged and the
    /// remaining steps are still attempted.
    async fn rollback(mut self) {
        while let Some(step) = self.steps.pop() {
            let outcome = match &step {
                Step::MovedFile { from, to } => fs::move_path(to, from).await,
                Step::CreatedDir(dir) => fs::remove_dir_all(dir).await,
            };
            match outcome {
                Ok(()) => log::debug!("Rolled back {:?}", step),
                Err(e) => log::error!("Failed to roll back {:?}: {}", step, e),
            }
        }
    }
}

/// Promote the loose script described by `layout` into its own project directory.
///
/// `base` is the last-saved descriptor (or defaults); the new descriptor is
/// the edit synchronized onto it. On success the old sidecar and resource
/// directory are removed best-effort and reported in
/// [`Promotion::warnings`] when they linger.
pub async fn promote<S: IconStore>(
    layout: &ProjectLayout,
    edit: &EditState,
    base: &Descriptor,
    icons: &S,
) -> Result<Promotion> {
    let start_time = Instant::now();

    if !layout.is_single_file() {
        return Err(FilesystemError::NotSingleFile {
            path: layout.source().to_path_buf(),
        }
        .into());
    }
    let source = layout.source();
    let Some(file_name) = source.file_name().filter(|_| source.is_file()) else {
        return Err(FilesystemError::NotAFile {
            path: source.to_path_buf(),
        }
        .into());
    };

    let new_dir = layout.directory().join(layout.script_stem());
    if new_dir.exists() {
        return Err(FilesystemError::AlreadyExists { path: new_dir }.into());
    }
    let new_script = new_dir.join(file_name);
    let new_layout = ProjectLayout::project(new_dir.clone(), new_script.clone());

    let relocated = relocate(layout, &new_layout, edit);
    validate(&relocated)?;
    sync(&relocated, base.clone())?;

    log::info!(
        "Promoting {} into {}",
        source.display(),
        new_dir.display()
    );

    let mut journal = Journal::default();
    match apply(layout, &new_layout, &relocated, base, icons, &mut journal).await {
        Ok((edit, descriptor, saved)) => {
            let warnings = cleanup(layout).await;
            Ok(Promotion {
                location: ProjectLocation {
                    directory: new_dir,
                    script: new_script,
                    descriptor_path: saved.path.clone(),
                },
                layout: new_layout,
                edit,
                descriptor,
                saved,
                warnings,
                duration: start_time.elapsed(),
            })
        }
        Err(e) => {
            log::warn!("Promotion failed, rolling back: {}", e);
            journal.rollback().await;
            Err(e)
        }
    }
}

async fn apply<S: IconStore>(
    old: &ProjectLayout,
    new: &ProjectLayout,
    edit: &EditState,
    base: &Descriptor,
    icons: &S,
    journal: &mut Journal,
) -> Result<(EditState, Descriptor, SaveDescriptorResult)> {
    fs::create_dir(new.directory()).await?;
    journal.record(Step::CreatedDir(new.directory().to_path_buf()));

    fs::move_path(old.source(), new.source()).await?;
    journal.record(Step::MovedFile {
        from: old.source().to_path_buf(),
        to: new.source().to_path_buf(),
    });

    let old_res = old.resource_dir();
    if old_res.is_dir() {
        fs::copy_dir(&old_res, &new.resource_dir()).await?;
    }

    let staged = stage_icons(icons, new, edit).await?;
    let descriptor = sync(&staged, base.clone())?;
    let saved = DescriptorStore::new(new.descriptor_path())
        .save(&descriptor)
        .await?;

    Ok((staged, descriptor, saved))
}

/// Edit-state pointed at the new project location
fn relocate(old: &ProjectLayout, new: &ProjectLayout, edit: &EditState) -> EditState {
    let mut relocated = edit.clone();
    relocated.source_path = new.source().to_string_lossy().into_owned();
    relocated.project_directory = new.directory().to_path_buf();
    relocated.output_path = new
        .directory()
        .join(&edit.build_dir)
        .to_string_lossy()
        .into_owned();
    relocated.is_single_file = false;

    let old_res = old.resource_dir();
    let new_res = new.resource_dir();
    let rewrite = |reference: &String| relocate_icon_ref(reference, old.directory(), &old_res, &new_res);
    relocated.icon = edit.icon.as_ref().map(rewrite);
    relocated.splash_icon = edit.splash_icon.as_ref().map(rewrite);
    relocated
}

/// Icons under the old resource directory move with it; other local
/// references become absolute so they still resolve from the new directory.
fn relocate_icon_ref(reference: &str, old_dir: &Path, old_res: &Path, new_res: &Path) -> String {
    let Ok(path) = reference_to_path(reference, old_dir) else {
        return reference.to_string();
    };
    match path.strip_prefix(old_res) {
        Ok(rel) => file_uri(&new_res.join(rel)),
        Err(_) => file_uri(&path),
    }
}

/// Remove the old sidecar and resource directory, collecting failures
async fn cleanup(old: &ProjectLayout) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Err(e) = DescriptorStore::new(old.descriptor_path()).remove().await {
        log::warn!("Could not remove old descriptor: {}", e);
        warnings.push(e.to_string());
    }
    if let Err(e) = fs::remove_dir_all(&old.resource_dir()).await {
        log::warn!("Could not remove old resource directory: {}", e);
        warnings.push(e.to_string());
    }

    warnings
}
