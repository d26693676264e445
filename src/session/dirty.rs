//! Unsaved-change detection.

use super::EditState;
use super::sync::sync;
use crate::descriptor::Descriptor;

/// Whether `edit` differs from what was last persisted.
///
/// Nothing saved yet is always dirty. Otherwise the edit is synchronized onto
/// a copy of `last_saved` and compared field by field. Collections compare in
/// insertion order, matching the byte-for-byte round trip of the file. An
/// edit that cannot be synchronized (bad version code) counts as dirty.
pub fn is_dirty(last_saved: Option<&Descriptor>, edit: &EditState) -> bool {
    let Some(saved) = last_saved else {
        return true;
    };
    match sync(edit, saved.clone()) {
        Ok(candidate) => candidate != *saved,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectLayout;
    use crate::settings::ToolSettings;

    fn session_edit() -> (tempfile::TempDir, EditState) {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("foo.js");
        std::fs::write(&script, "").unwrap();
        let layout = ProjectLayout::detect(&script).unwrap();
        let mut edit = EditState::fresh(&layout, &ToolSettings::default());
        edit.app_name = "Foo".into();
        edit.package_id = "com.example.foo".into();
        (dir, edit)
    }

    #[test]
    fn test_never_saved_is_dirty() {
        let (_dir, edit) = session_edit();
        assert!(is_dirty(None, &edit));
    }

    #[test]
    fn test_clean_after_save_then_dirty_after_edit() {
        let (_dir, mut edit) = session_edit();
        let saved = sync(&edit, Descriptor::default()).unwrap();
        assert!(!is_dirty(Some(&saved), &edit));

        edit.splash_text = "changed".into();
        assert!(is_dirty(Some(&saved), &edit));
    }

    #[test]
    fn test_unparseable_version_code_is_dirty() {
        let (_dir, mut edit) = session_edit();
        let saved = sync(&edit, Descriptor::default()).unwrap();
        edit.version_code = "12a".into();
        assert!(is_dirty(Some(&saved), &edit));
    }

    #[test]
    fn test_clearing_main_script_is_dirty() {
        let (_dir, mut edit) = session_edit();
        edit.main_script = "entry.js".into();
        let saved = sync(&edit, Descriptor::default()).unwrap();
        assert!(!is_dirty(Some(&saved), &edit));

        edit.main_script.clear();
        assert!(is_dirty(Some(&saved), &edit));
    }

    #[test]
    fn test_order_is_significant_but_preserved() {
        let (_dir, edit) = session_edit();
        let saved = sync(&edit, Descriptor::default()).unwrap();
        let mut reordered = saved.clone();
        let mut abis = reordered.target_abis.into_vec();
        abis.reverse();
        reordered.target_abis = abis.into();
        assert_ne!(reordered, saved);
        // Merging keeps the persisted order, so reopening is not dirty
        assert!(!is_dirty(Some(&reordered), &edit));
    }
}
