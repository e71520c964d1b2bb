use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// On-disk format of a Maya scene, identified by its extension.
///
/// - `Ascii`: `.ma`, the default for new saves.
/// - `Binary`: `.mb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneFormat {
    #[default]
    Ascii,
    Binary,
}

impl SceneFormat {
    /// The extension including its leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            SceneFormat::Ascii => ".ma",
            SceneFormat::Binary => ".mb",
        }
    }

    /// Recognize `ma`/`mb` with or without the dot, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ma" => Some(SceneFormat::Ascii),
            "mb" => Some(SceneFormat::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for SceneFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SceneFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneFormat::from_extension(s)
            .ok_or_else(|| format!("unknown scene format `{s}` (expected ma or mb)"))
    }
}

/// A scene path split into `(directory, base_name, format)`.
///
/// Extensions other than `.ma`/`.mb` are not treated as extensions at all:
/// they stay part of the base name and the caller's default format applies,
/// so `shot.v1` keeps its dot and `shot.mb` becomes `("shot", Binary)`.
///
/// # Examples
///
/// ```rust
/// use saveplus::types::{SceneFile, SceneFormat};
/// use std::path::{Path, PathBuf};
///
/// let scene = SceneFile::from_path(Path::new("/proj/scenes/shot010.mb"), SceneFormat::Ascii);
/// assert_eq!(scene.base_name, "shot010");
/// assert_eq!(scene.format, SceneFormat::Binary);
/// assert_eq!(scene.path(), PathBuf::from("/proj/scenes/shot010.mb"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFile {
    /// Folder holding the scene. Empty for a bare file name.
    pub directory: PathBuf,
    /// File name without directory or scene extension; the part that gets versioned.
    pub base_name: String,
    /// `.ma` or `.mb`.
    pub format: SceneFormat,
}

impl SceneFile {
    /// Assemble a scene from its parts without touching the filesystem.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use saveplus::types::{SceneFile, SceneFormat};
    ///
    /// let next = SceneFile::new("renders", "A01_Smith_John_wip_02", SceneFormat::Ascii);
    /// assert_eq!(next.file_name(), "A01_Smith_John_wip_02.ma");
    /// ```
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>, format: SceneFormat) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
            format,
        }
    }

    /// Decompose `path`, falling back to `default_format` when it has no scene extension.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use saveplus::types::{SceneFile, SceneFormat};
    /// use std::path::Path;
    ///
    /// let unsaved = SceneFile::from_path(Path::new("layout"), SceneFormat::Binary);
    /// assert_eq!(unsaved.file_name(), "layout.mb");
    /// ```
    pub fn from_path(path: &Path, default_format: SceneFormat) -> Self {
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let known = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SceneFormat::from_extension);

        match known {
            Some(format) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                Self::new(directory, stem, format)
            }
            None => Self::new(directory, file_name, default_format),
        }
    }

    /// Base name plus extension, e.g. `shot010.mb`.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.base_name, self.format.extension())
    }

    /// Full path: [`SceneFile::directory`] joined with [`SceneFile::file_name`].
    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }
}

/// Where a save lands.
///
/// Ignored in favor of `<project>/scenes` when
/// [`SaveOptions::respect_project_structure`] is set and a project root is known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveLocation {
    /// Next to the scene being saved.
    #[default]
    CurrentDirectory,
    /// A directory the user picked.
    Directory(PathBuf),
    /// The `scenes` folder of a project root.
    ProjectScenes(PathBuf),
}

/// Explicit per-call options for the save wrapper.
///
/// Built from stored preferences (see `Preferences::to_save_options`) or by
/// hand; nothing here is read from global state.
///
/// # Examples
///
/// ```rust
/// use saveplus::types::{SaveLocation, SaveOptions, SceneFormat};
/// use std::path::PathBuf;
///
/// let options = SaveOptions {
///     default_format: SceneFormat::Binary,
///     location: SaveLocation::Directory(PathBuf::from("/shots/seq010")),
///     add_notes: true,
///     ..SaveOptions::default()
/// };
/// assert!(!options.respect_project_structure);
/// assert!(options.project_root.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveOptions {
    /// Format for names that carry no `.ma`/`.mb` extension.
    pub default_format: SceneFormat,
    /// Target directory policy.
    pub location: SaveLocation,
    /// Route saves into `<project>/scenes` whenever a project root is known.
    pub respect_project_structure: bool,
    /// Project root used by [`SaveOptions::respect_project_structure`].
    pub project_root: Option<PathBuf>,
    /// Whether notes passed to a save are kept in the history record.
    pub add_notes: bool,
}
