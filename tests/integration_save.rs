use eyre::Result;
use saveplus::fs::{OnExists, create_backup, save_as_new, save_plus};
use saveplus::history::VersionHistory;
use saveplus::types::{SaveLocation, SaveOptions, SceneFormat};
use std::fs;
use tempfile::tempdir;

#[test]
fn save_plus_copies_to_next_version() -> Result<()> {
    let dir = tempdir()?;
    let scene = dir.path().join("A01_Smith_John_wip_01.mb");
    fs::write(&scene, "//Maya scene")?;
    let mut history = VersionHistory::load(dir.path().join("history.json"));

    let options = SaveOptions {
        add_notes: true,
        ..SaveOptions::default()
    };
    let saved = save_plus(&scene, &options, Some(&mut history), "arms blocked")?;

    assert_eq!(saved, dir.path().join("A01_Smith_John_wip_02.mb"));
    assert_eq!(fs::read_to_string(&saved)?, "//Maya scene");
    assert!(scene.exists());

    let versions = history.versions_for_file(&saved);
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].notes, "arms blocked");
    Ok(())
}

#[test]
fn notes_dropped_when_disabled() -> Result<()> {
    let dir = tempdir()?;
    let scene = dir.path().join("shot01.ma");
    fs::write(&scene, "x")?;
    let mut history = VersionHistory::load(dir.path().join("history.json"));

    let saved = save_plus(&scene, &SaveOptions::default(), Some(&mut history), "ignored")?;
    assert_eq!(history.versions_for_file(&saved)[0].notes, "");
    Ok(())
}

#[test]
fn save_plus_into_project_scenes() -> Result<()> {
    let dir = tempdir()?;
    let scene = dir.path().join("layout.ma");
    fs::write(&scene, "x")?;
    let project = dir.path().join("project");

    let options = SaveOptions {
        respect_project_structure: true,
        project_root: Some(project.clone()),
        ..SaveOptions::default()
    };
    let saved = save_plus(&scene, &options, None, "")?;
    assert_eq!(saved, project.join("scenes").join("layout02.ma"));
    Ok(())
}

#[test]
fn save_plus_requires_saved_scene() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("never_saved.ma");
    let err = save_plus(&missing, &SaveOptions::default(), None, "").unwrap_err();
    assert!(err.to_string().contains("must be saved"));
}

#[test]
fn save_as_new_conflict_modes() -> Result<()> {
    let dir = tempdir()?;
    let scene = dir.path().join("shot01.ma");
    fs::write(&scene, "new content")?;
    fs::write(dir.path().join("final.mb"), "old content")?;

    let options = SaveOptions {
        default_format: SceneFormat::Binary,
        location: SaveLocation::Directory(dir.path().to_path_buf()),
        ..SaveOptions::default()
    };

    assert!(save_as_new(&scene, "final", &options, OnExists::Fail, None, "").is_err());

    let renamed = save_as_new(&scene, "final", &options, OnExists::NewName, None, "")?;
    assert_eq!(renamed, dir.path().join("final_1.mb"));

    let replaced = save_as_new(&scene, "final.mb", &options, OnExists::Overwrite, None, "")?;
    assert_eq!(fs::read_to_string(replaced)?, "new content");
    Ok(())
}

#[test]
fn save_as_new_onto_itself_keeps_content() -> Result<()> {
    let dir = tempdir()?;
    let scene = dir.path().join("shot01.ma");
    fs::write(&scene, "keep me")?;

    let saved = save_as_new(
        &scene,
        "shot01.ma",
        &SaveOptions::default(),
        OnExists::Overwrite,
        None,
        "",
    )?;
    assert_eq!(saved, scene);
    assert_eq!(fs::read_to_string(&scene)?, "keep me");
    Ok(())
}

#[test]
fn save_as_new_rejects_empty_name() {
    let dir = tempdir().unwrap();
    let scene = dir.path().join("shot01.ma");
    fs::write(&scene, "x").unwrap();
    assert!(save_as_new(&scene, "  ", &SaveOptions::default(), OnExists::Fail, None, "").is_err());
}

#[test]
fn backup_sits_beside_scene() -> Result<()> {
    let dir = tempdir()?;
    let scene = dir.path().join("shot03.mb");
    fs::write(&scene, "scene")?;
    let mut history = VersionHistory::load(dir.path().join("history.json"));

    let first = create_backup(&scene, Some(&mut history))?;
    let second = create_backup(&scene, Some(&mut history))?;

    assert_ne!(first, second);
    assert_eq!(first.parent(), scene.parent());
    assert_eq!(fs::read_to_string(&first)?, "scene");
    assert_eq!(history.recent(10)[0].notes, "Automatic backup");
    Ok(())
}
