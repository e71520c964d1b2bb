use crate::name::AssignmentName;
use crate::types::{SaveLocation, SaveOptions, SceneFormat};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persisted user preferences. Every field has a default, so older or
/// partial files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub default_format: SceneFormat,
    pub respect_project_structure: bool,
    pub add_version_notes: bool,
    pub enable_reminder: bool,
    pub reminder_minutes: u32,
    pub enable_auto_backup: bool,
    pub backup_minutes: u32,
    pub default_save_path: Option<PathBuf>,
    pub project_path: Option<PathBuf>,
    pub name_generator: AssignmentName,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_format: SceneFormat::Ascii,
            respect_project_structure: true,
            add_version_notes: false,
            enable_reminder: true,
            reminder_minutes: 15,
            enable_auto_backup: false,
            backup_minutes: 30,
            default_save_path: None,
            project_path: None,
            name_generator: AssignmentName::default(),
        }
    }
}

impl Preferences {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("saveplus").join("preferences.json"))
    }

    /// Load from `path`, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no preferences file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading preferences {}", path.display()))?;
        let prefs = serde_json::from_str(&text)
            .wrap_err_with(|| format!("parsing preferences {}", path.display()))?;
        Ok(prefs)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .wrap_err_with(|| format!("writing preferences {}", path.display()))?;
        Ok(())
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.reminder_minutes) * 60)
    }

    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.backup_minutes) * 60)
    }

    /// Options for one save call. A configured default save path replaces
    /// "next to the scene".
    pub fn to_save_options(&self) -> SaveOptions {
        let location = match &self.default_save_path {
            Some(dir) => SaveLocation::Directory(dir.clone()),
            None => SaveLocation::CurrentDirectory,
        };
        SaveOptions {
            default_format: self.default_format,
            location,
            respect_project_structure: self.respect_project_structure,
            project_root: self.project_path.clone(),
            add_notes: self.add_version_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.reminder_interval(), Duration::from_secs(15 * 60));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{ "default_format": "binary", "backup_minutes": 5 }"#).unwrap();

        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.default_format, SceneFormat::Binary);
        assert_eq!(prefs.backup_minutes, 5);
        assert!(prefs.enable_reminder);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg").join("prefs.json");
        let mut prefs = Preferences::default();
        prefs.project_path = Some(PathBuf::from("/projects/short"));
        prefs.name_generator.last_name = "Smith".into();
        prefs.save(&path).unwrap();

        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn save_options_reflect_preferences() {
        let prefs = Preferences {
            default_save_path: Some(PathBuf::from("/tmp/out")),
            add_version_notes: true,
            ..Preferences::default()
        };
        let opts = prefs.to_save_options();
        assert_eq!(opts.location, SaveLocation::Directory(PathBuf::from("/tmp/out")));
        assert!(opts.add_notes);
        assert_eq!(opts.default_format, SceneFormat::Ascii);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "[]").unwrap();
        assert!(Preferences::load(&path).is_err());
    }
}
