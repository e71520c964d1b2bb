use crate::consts::SCENES_DIR;
use crate::history::VersionHistory;
use crate::types::{SaveLocation, SaveOptions, SceneFile, SceneFormat};
use crate::version::{IncrementError, VersionIncrementer};
use chrono::Local;
use eyre::{Result, WrapErr, eyre};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Create `dir` (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<(), IncrementError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| IncrementError::DirectoryCreateFailed {
            dir: dir.to_path_buf(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "created directory");
    }
    Ok(())
}

/// Next free incremented base name for `base_name` inside `directory`.
///
/// `directory` is created when missing. The returned name carries no
/// extension; `format` only decides which files count as taken.
pub fn increment(
    base_name: &str,
    directory: &Path,
    format: SceneFormat,
) -> Result<String, IncrementError> {
    VersionIncrementer::validate(base_name)?;
    ensure_dir(directory)?;
    VersionIncrementer::default().resolve_in(base_name, directory, format)
}

/// The directory a save of `scene` should land in.
pub fn resolve_save_dir(scene: &Path, options: &SaveOptions) -> PathBuf {
    if options.respect_project_structure
        && let Some(root) = &options.project_root
    {
        return root.join(SCENES_DIR);
    }
    match &options.location {
        SaveLocation::CurrentDirectory => match scene.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        },
        SaveLocation::Directory(dir) => dir.clone(),
        SaveLocation::ProjectScenes(root) => root.join(SCENES_DIR),
    }
}

/// What to do when a save-as target is already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnExists {
    Overwrite,
    /// Append `_1`, `_2`, ... until the name is free.
    NewName,
    #[default]
    Fail,
}

fn require_saved(scene: &Path) -> Result<()> {
    if !scene.is_file() {
        return Err(eyre!(
            "{} must be saved at least once first",
            scene.display()
        ));
    }
    Ok(())
}

/// Copy `source` to `target`, failing if `target` appeared in the meantime.
fn copy_new(source: &Path, target: &Path) -> Result<()> {
    let mut src =
        File::open(source).wrap_err_with(|| format!("opening {}", source.display()))?;
    let mut dst = File::options()
        .create_new(true)
        .write(true)
        .open(target)
        .wrap_err_with(|| format!("creating {}", target.display()))?;
    io::copy(&mut src, &mut dst).wrap_err_with(|| format!("writing {}", target.display()))?;
    Ok(())
}

/// Replace `target` with a copy of `source`.
///
/// The copy is written to a temporary sibling and renamed over `target`, so a
/// failed copy leaves the old `target` intact.
fn copy_replace(source: &Path, target: &Path) -> Result<()> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut src =
        File::open(source).wrap_err_with(|| format!("opening {}", source.display()))?;
    let mut staged = NamedTempFile::new_in(dir)
        .wrap_err_with(|| format!("staging a copy in {}", dir.display()))?;
    io::copy(&mut src, staged.as_file_mut())
        .wrap_err_with(|| format!("copying {}", source.display()))?;
    staged
        .persist(target)
        .map_err(|e| e.error)
        .wrap_err_with(|| format!("replacing {}", target.display()))?;
    Ok(())
}

fn record(history: Option<&mut VersionHistory>, path: &Path, notes: &str) {
    if let Some(history) = history
        && let Err(e) = history.add_version(path, notes)
    {
        tracing::warn!(error = %e, "failed to record save in history");
    }
}

/// Save `scene` under its next version number and record it.
///
/// The original file is left untouched; the new version is written with
/// create-new semantics so an existing file is never clobbered.
pub fn save_plus(
    scene: &Path,
    options: &SaveOptions,
    history: Option<&mut VersionHistory>,
    notes: &str,
) -> Result<PathBuf> {
    require_saved(scene)?;
    let current = SceneFile::from_path(scene, options.default_format);
    let directory = resolve_save_dir(scene, options);

    let next = increment(&current.base_name, &directory, current.format)?;
    let target = SceneFile::new(&directory, next, current.format).path();
    tracing::debug!(from = %scene.display(), to = %target.display(), "saving next version");

    copy_new(scene, &target)?;
    record(history, &target, if options.add_notes { notes } else { "" });
    tracing::info!("saved {}", target.display());
    Ok(target)
}

/// Save `scene` as `name` without incrementing.
///
/// `name` may be a bare file name (placed by [`resolve_save_dir`]) or carry its
/// own directory. A missing or foreign extension becomes the default format.
pub fn save_as_new(
    scene: &Path,
    name: &str,
    options: &SaveOptions,
    on_exists: OnExists,
    history: Option<&mut VersionHistory>,
    notes: &str,
) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(eyre!("please enter a file name"));
    }
    require_saved(scene)?;

    let given = Path::new(name);
    let in_dir = match given.parent() {
        Some(p) if !p.as_os_str().is_empty() => given.to_path_buf(),
        _ => resolve_save_dir(scene, options).join(given),
    };
    let mut target = SceneFile::from_path(&in_dir, options.default_format);
    ensure_dir(&target.directory)?;

    let mut overwrite = false;
    if target.path().exists() {
        match on_exists {
            OnExists::Fail => {
                return Err(eyre!("{} already exists", target.file_name()));
            }
            OnExists::Overwrite => {
                if same_file(scene, &target.path()) {
                    tracing::info!("saved {} in place", scene.display());
                    record(history, scene, if options.add_notes { notes } else { "" });
                    return Ok(scene.to_path_buf());
                }
                tracing::debug!(path = %target.path().display(), "overwriting existing file");
                overwrite = true;
            }
            OnExists::NewName => {
                let base = target.base_name.clone();
                let mut counter = 1u32;
                target.base_name = format!("{base}_{counter}");
                while target.path().exists() {
                    counter += 1;
                    target.base_name = format!("{base}_{counter}");
                }
                tracing::debug!(name = %target.file_name(), "using new unique name");
            }
        }
    }

    let path = target.path();
    if overwrite {
        copy_replace(scene, &path)?;
    } else {
        copy_new(scene, &path)?;
    }
    record(history, &path, if options.add_notes { notes } else { "" });
    tracing::info!("saved {}", path.display());
    Ok(path)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `<base>_backup_<YYYYmmdd_HHMMSS><ext>` next to `scene`.
pub fn backup_path(scene: &Path) -> PathBuf {
    let directory = scene.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = scene
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = scene
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    directory.join(format!("{stem}_backup_{ts}{ext}"))
}

/// Copy `scene` to a timestamped backup beside it.
pub fn create_backup(scene: &Path, history: Option<&mut VersionHistory>) -> Result<PathBuf> {
    require_saved(scene)?;
    let mut path = backup_path(scene);
    if path.exists() {
        // two backups inside the same second
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let mut n = 1;
        while path.exists() {
            path = path.with_file_name(format!("{stem}_{n}{ext}"));
            n += 1;
        }
    }
    copy_new(scene, &path)?;
    record(history, &path, "Automatic backup");
    tracing::info!(
        "backup saved as {}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(path)
}
