//! Where a script's descriptor and resources live, depending on its mode.

use crate::error::{FilesystemError, Result};
use path_absolutize::Absolutize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Descriptor file name inside a project directory
pub const PROJECT_DESCRIPTOR_FILE: &str = "project.json";

/// Sidecar suffix for a loose script: `foo.js` -> `foo_config.json`
pub const SINGLE_FILE_DESCRIPTOR_SUFFIX: &str = "_config.json";

/// Resource directory inside a project
pub const PROJECT_RESOURCE_DIR: &str = "res";

/// Resource directory prefix for a loose script: `foo.js` -> `res_foo`
pub const SINGLE_FILE_RESOURCE_PREFIX: &str = "res_";

/// Lifecycle mode of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectMode {
    /// Loose script with an optional `<name>_config.json` sidecar
    SingleFile,
    /// Directory holding the script and `project.json`
    Project,
}

impl fmt::Display for ProjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectMode::SingleFile => write!(f, "single-file"),
            ProjectMode::Project => write!(f, "project"),
        }
    }
}

/// Resolved location of a script or project on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    mode: ProjectMode,
    /// Script file, or the project directory when opened as a directory
    source: PathBuf,
    /// Directory holding the descriptor
    directory: PathBuf,
}

impl ProjectLayout {
    /// Inspect `source` and decide which mode it is in.
    ///
    /// A file is single-file unless a `project.json` sits next to it; a
    /// directory is always a project.
    pub fn detect(source: &Path) -> Result<Self> {
        let source = source
            .absolutize()
            .map_err(|error| FilesystemError::Fs {
                context: "resolving",
                path: source.to_path_buf(),
                error,
            })?
            .into_owned();

        if source.is_dir() {
            return Ok(Self {
                mode: ProjectMode::Project,
                directory: source.clone(),
                source,
            });
        }

        if !source.is_file() {
            return Err(FilesystemError::NotAFile { path: source }.into());
        }

        let directory = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        let mode = if directory.join(PROJECT_DESCRIPTOR_FILE).is_file() {
            ProjectMode::Project
        } else {
            ProjectMode::SingleFile
        };

        log::debug!("Detected {} mode for {}", mode, source.display());

        Ok(Self {
            mode,
            source,
            directory,
        })
    }

    /// Layout of a freshly promoted project
    pub(crate) fn project(directory: PathBuf, script: PathBuf) -> Self {
        Self {
            mode: ProjectMode::Project,
            source: script,
            directory,
        }
    }

    /// Current lifecycle mode
    pub fn mode(&self) -> ProjectMode {
        self.mode
    }

    /// Whether the script is loose
    pub fn is_single_file(&self) -> bool {
        self.mode == ProjectMode::SingleFile
    }

    /// Script file or project directory the session was opened with
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Whether `source` names a script file rather than a directory
    pub fn source_is_file(&self) -> bool {
        self.source != self.directory
    }

    /// Directory that holds the descriptor
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Script base name without extension (`foo` for `foo.js`)
    pub fn script_stem(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Script file name (`foo.js`), if the source is a file
    pub fn script_file_name(&self) -> Option<String> {
        if !self.source_is_file() {
            return None;
        }
        self.source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// Descriptor file name for the current mode
    pub fn descriptor_file_name(&self) -> String {
        match self.mode {
            ProjectMode::SingleFile => {
                format!("{}{}", self.script_stem(), SINGLE_FILE_DESCRIPTOR_SUFFIX)
            }
            ProjectMode::Project => PROJECT_DESCRIPTOR_FILE.to_string(),
        }
    }

    /// Full descriptor path for the current mode
    pub fn descriptor_path(&self) -> PathBuf {
        self.directory.join(self.descriptor_file_name())
    }

    /// Resource directory name for the current mode
    pub fn resource_dir_name(&self) -> String {
        match self.mode {
            ProjectMode::SingleFile => {
                format!("{}{}", SINGLE_FILE_RESOURCE_PREFIX, self.script_stem())
            }
            ProjectMode::Project => PROJECT_RESOURCE_DIR.to_string(),
        }
    }

    /// Full resource directory path
    pub fn resource_dir(&self) -> PathBuf {
        self.directory.join(self.resource_dir_name())
    }

    /// Relative path of a stored icon, e.g. `res/logo.png`
    pub fn icon_relative_path(&self, stem: &str) -> String {
        let file_name = if stem.ends_with(".png") {
            stem.to_string()
        } else {
            format!("{stem}.png")
        };
        format!("{}/{}", self.resource_dir_name(), file_name)
    }

    /// Output path used when nothing was persisted yet
    pub fn default_output_path(&self, build_dir: &str) -> PathBuf {
        match self.mode {
            ProjectMode::SingleFile => self.directory.clone(),
            ProjectMode::Project => self.directory.join(build_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_script_is_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("foo.js");
        std::fs::write(&script, "toast('hi')").unwrap();

        let layout = ProjectLayout::detect(&script).unwrap();
        assert_eq!(layout.mode(), ProjectMode::SingleFile);
        assert_eq!(layout.descriptor_file_name(), "foo_config.json");
        assert_eq!(layout.resource_dir_name(), "res_foo");
        assert_eq!(layout.icon_relative_path("logo"), "res_foo/logo.png");
        assert_eq!(layout.default_output_path("build"), dir.path());
        assert_eq!(layout.script_file_name().as_deref(), Some("foo.js"));
    }

    #[test]
    fn test_script_next_to_project_json_is_project() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("main.js");
        std::fs::write(&script, "").unwrap();
        std::fs::write(dir.path().join(PROJECT_DESCRIPTOR_FILE), "{}").unwrap();

        let layout = ProjectLayout::detect(&script).unwrap();
        assert_eq!(layout.mode(), ProjectMode::Project);
        assert_eq!(layout.descriptor_path(), dir.path().join("project.json"));
        assert_eq!(layout.icon_relative_path("splashIcon.png"), "res/splashIcon.png");
    }

    #[test]
    fn test_directory_is_project() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::detect(dir.path()).unwrap();
        assert_eq!(layout.mode(), ProjectMode::Project);
        assert!(!layout.source_is_file());
        assert!(layout.script_file_name().is_none());
        assert_eq!(layout.default_output_path("build"), dir.path().join("build"));
    }

    #[test]
    fn test_missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectLayout::detect(&dir.path().join("ghost.js")).is_err());
    }
}
