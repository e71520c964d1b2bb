use crate::consts::{GROUP_PREFIX_RE, HISTORY_GROUP_LIMIT};
use chrono::{Local, Utc};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One save event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub path: String,
    pub filename: String,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    /// Local time, `%Y-%m-%d %H:%M:%S`.
    pub date: String,
    #[serde(default)]
    pub notes: String,
}

impl VersionRecord {
    pub fn now(path: &Path, notes: &str) -> Self {
        let now = Utc::now();
        Self {
            path: path.to_string_lossy().to_string(),
            filename: path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
            timestamp: now.timestamp_millis() as f64 / 1000.0,
            date: now
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            notes: notes.to_string(),
        }
    }
}

/// Key shared by every version of the same file: its directory joined with
/// the file name's text before the first digit. Names without digits group
/// by directory alone.
pub fn group_key(path: &Path) -> String {
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    match GROUP_PREFIX_RE.captures(&file_name) {
        Some(caps) => directory.join(&caps["prefix"]).to_string_lossy().to_string(),
        None => directory.to_string_lossy().to_string(),
    }
}

/// Save events grouped by [`group_key`], persisted as pretty JSON.
///
/// Each group is ordered most recent first and capped at
/// [`HISTORY_GROUP_LIMIT`] records.
#[derive(Debug, Clone, Default)]
pub struct VersionHistory {
    file: PathBuf,
    groups: BTreeMap<String, Vec<VersionRecord>>,
}

impl VersionHistory {
    /// Default store location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("saveplus").join("saveplus_history.json"))
    }

    /// Load from `file`. A missing file is an empty history; a corrupt one is
    /// logged and treated as empty so saving keeps working.
    pub fn load(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let groups = if file.exists() {
            match fs::read_to_string(&file)
                .map_err(eyre::Report::from)
                .and_then(|s| serde_json::from_str(&s).map_err(eyre::Report::from))
            {
                Ok(groups) => groups,
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "failed to load version history");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Self { file, groups }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.file.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.groups)?;
        fs::write(&self.file, json)
            .wrap_err_with(|| format!("writing {}", self.file.display()))?;
        tracing::trace!(file = %self.file.display(), "saved version history");
        Ok(())
    }

    /// Record a save of `path` and persist the store.
    pub fn add_version(&mut self, path: &Path, notes: &str) -> Result<VersionRecord> {
        let record = VersionRecord::now(path, notes);
        self.insert(group_key(path), record.clone());
        self.save()?;
        Ok(record)
    }

    fn insert(&mut self, key: String, record: VersionRecord) {
        let group = self.groups.entry(key).or_default();
        group.insert(0, record);
        group.truncate(HISTORY_GROUP_LIMIT);
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<VersionRecord>> {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// The newest `count` records across all groups.
    pub fn recent(&self, count: usize) -> Vec<&VersionRecord> {
        let mut all: Vec<&VersionRecord> = self.groups.values().flatten().collect();
        all.sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));
        all.truncate(count);
        all
    }

    /// Every record related to `path`: its own group, or else whichever group
    /// already contains that exact path.
    pub fn versions_for_file(&self, path: &Path) -> &[VersionRecord] {
        if let Some(group) = self.groups.get(&group_key(path)) {
            return group;
        }
        let wanted = path.to_string_lossy();
        self.groups
            .values()
            .find(|records| records.iter().any(|r| r.path == wanted))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Write a human-readable dump of the whole history.
    pub fn export_text<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "SavePlus Version History Export")?;
        writeln!(
            out,
            "Generated: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;

        for (group, records) in &self.groups {
            writeln!(out, "Group: {group}")?;
            writeln!(out, "{}", "-".repeat(80))?;
            for (idx, record) in records.iter().enumerate() {
                writeln!(out, "Version {}: {}", idx + 1, record.filename)?;
                writeln!(out, "Date: {}", record.date)?;
                writeln!(out, "Path: {}", record.path)?;
                let notes = record.notes.trim();
                if !notes.is_empty() {
                    writeln!(out, "Notes:\n{notes}")?;
                }
                writeln!(out, "{}", "-".repeat(40))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn export_to(&self, target: &Path) -> Result<()> {
        let file = fs::File::create(target)
            .wrap_err_with(|| format!("creating {}", target.display()))?;
        self.export_text(std::io::BufWriter::new(file))
    }
}
