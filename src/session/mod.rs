//! One editing session over a script or project.
//!
//! A [`BuildSession`] owns the live edit-state, the last-persisted
//! descriptor and the layout they belong to. All mutation goes through it;
//! [`SessionHandle`] wraps it in an actor when several tasks need access.

mod actor;
mod dirty;
mod edit_state;
mod sync;
mod validate;

pub use actor::{SessionCommand, SessionHandle};
pub use dirty::is_dirty;
pub use edit_state::EditState;
pub use sync::{resolve_icon_ref, sync};
pub use validate::{check_inputs, is_valid_package_id, parse_version_code, validate};

use crate::descriptor::{Descriptor, DescriptorStore, SaveDescriptorResult};
use crate::error::Result;
use crate::project::{ProjectLayout, Promotion, promote};
use crate::resources::{IconStore, stage_icons};
use crate::settings::ToolSettings;
use std::path::Path;

/// Live editing session
#[derive(Debug, Clone)]
pub struct BuildSession {
    settings: ToolSettings,
    layout: ProjectLayout,
    edit: EditState,
    last_saved: Option<Descriptor>,
    warnings: Vec<String>,
}

impl BuildSession {
    /// Open `source` (a script file or project directory) for editing.
    ///
    /// A corrupt descriptor is reported in [`warnings`](Self::warnings) and
    /// editing starts from defaults.
    pub async fn open(source: &Path, settings: ToolSettings) -> Result<Self> {
        let layout = ProjectLayout::detect(source)?;
        let loaded = DescriptorStore::new(layout.descriptor_path())
            .load_lenient()
            .await;

        let edit = match &loaded.descriptor {
            Some(descriptor) => EditState::from_descriptor(&layout, &settings, descriptor),
            None => EditState::fresh(&layout, &settings),
        };

        log::info!(
            "Opened {} in {} mode ({})",
            layout.source().display(),
            layout.mode(),
            if loaded.descriptor.is_some() { "existing descriptor" } else { "defaults" }
        );

        Ok(Self {
            settings,
            layout,
            edit,
            last_saved: loaded.descriptor,
            warnings: loaded.warnings,
        })
    }

    /// Tool settings in effect
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Where the session's files live
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Current edits
    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    /// Current edits, for changing
    pub fn edit_mut(&mut self) -> &mut EditState {
        &mut self.edit
    }

    /// Descriptor as last loaded or saved
    pub fn last_saved(&self) -> Option<&Descriptor> {
        self.last_saved.as_ref()
    }

    /// Problems found while opening
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Check the edits without touching anything
    pub fn validate(&self) -> Result<()> {
        validate(&self.edit)?;
        Ok(())
    }

    /// Descriptor the edits would produce
    pub fn synchronize(&self) -> Result<Descriptor> {
        let base = self.last_saved.clone().unwrap_or_default();
        Ok(sync(&self.edit, base)?)
    }

    /// Whether the edits differ from what is on disk
    pub fn is_dirty(&self) -> bool {
        is_dirty(self.last_saved.as_ref(), &self.edit)
    }

    /// Validate, store icons, synchronize and persist.
    ///
    /// Any failure leaves the edit-state and last-saved descriptor as they
    /// were, so the save can simply be retried.
    pub async fn save<S: IconStore>(&mut self, icons: &S) -> Result<SaveDescriptorResult> {
        validate(&self.edit)?;

        let staged = stage_icons(icons, &self.layout, &self.edit).await?;
        let base = self.last_saved.clone().unwrap_or_default();
        let descriptor = sync(&staged, base)?;
        let result = DescriptorStore::new(self.layout.descriptor_path())
            .save(&descriptor)
            .await?;

        self.edit = staged;
        self.last_saved = Some(descriptor);
        Ok(result)
    }

    /// Promote a loose script into a project and continue editing there
    pub async fn promote<S: IconStore>(&mut self, icons: &S) -> Result<Promotion> {
        let base = self.last_saved.clone().unwrap_or_default();
        let promotion = promote(&self.layout, &self.edit, &base, icons).await?;

        self.layout = promotion.layout.clone();
        self.edit = promotion.edit.clone();
        self.last_saved = Some(promotion.descriptor.clone());
        Ok(promotion)
    }
}
