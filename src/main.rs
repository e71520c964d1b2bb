mod cli;

use clap::Parser;
use cli::{Args, Commands};
use eyre::{Result, eyre};
use saveplus::config::Preferences;
use saveplus::fs::{self, OnExists};
use saveplus::history::{VersionHistory, VersionRecord};
use saveplus::types::{SaveLocation, SceneFile};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = args.config.or_else(Preferences::default_path);
    let mut prefs = match &config_path {
        Some(p) => Preferences::load(p)?,
        None => Preferences::default(),
    };
    let history_path = args
        .history
        .or_else(VersionHistory::default_path)
        .ok_or_else(|| eyre!("no data directory available; pass --history"))?;

    match args.command {
        Commands::Next(a) => {
            let file = SceneFile::from_path(
                Path::new(a.name.trim()),
                a.format.unwrap_or(prefs.default_format),
            );
            let dir = match a.dir {
                Some(d) => d,
                None if !file.directory.as_os_str().is_empty() => file.directory.clone(),
                None => PathBuf::from("."),
            };
            let next = saveplus::increment(&file.base_name, &dir, file.format)?;
            println!("{next}{}", file.format.extension());
        }
        Commands::Save(a) => {
            let mut options = prefs.to_save_options();
            if let Some(dir) = a.dir {
                options.location = SaveLocation::Directory(dir);
                options.respect_project_structure = false;
            }
            if let Some(project) = a.project {
                options.project_root = Some(project);
                options.respect_project_structure = true;
            }
            if a.note.is_some() {
                options.add_notes = true;
            }
            let mut history = VersionHistory::load(&history_path);
            let path = fs::save_plus(
                &a.scene,
                &options,
                Some(&mut history),
                a.note.as_deref().unwrap_or_default(),
            )?;
            println!("{}", path.display());
        }
        Commands::SaveAs(a) => {
            let mut options = prefs.to_save_options();
            if let Some(dir) = a.dir {
                options.location = SaveLocation::Directory(dir);
                options.respect_project_structure = false;
            }
            if a.note.is_some() {
                options.add_notes = true;
            }
            let on_exists = if a.overwrite {
                OnExists::Overwrite
            } else if a.new_name {
                OnExists::NewName
            } else {
                OnExists::Fail
            };
            let mut history = VersionHistory::load(&history_path);
            let path = fs::save_as_new(
                &a.scene,
                &a.name,
                &options,
                on_exists,
                Some(&mut history),
                a.note.as_deref().unwrap_or_default(),
            )?;
            println!("{}", path.display());
        }
        Commands::Backup(a) => {
            let mut history = VersionHistory::load(&history_path);
            let path = fs::create_backup(&a.scene, Some(&mut history))?;
            println!("{}", path.display());
        }
        Commands::Generate(a) => {
            let g = &mut prefs.name_generator;
            if let Some(v) = a.letter {
                g.letter = v.to_ascii_uppercase();
            }
            if let Some(v) = a.number {
                g.number = v;
            }
            if let Some(v) = a.last {
                g.last_name = v;
            }
            if let Some(v) = a.first {
                g.first_name = v;
            }
            if let Some(v) = a.stage {
                g.stage = v;
            }
            if let Some(v) = a.status {
                g.status = v;
            }
            if let Some(v) = a.version {
                g.version = v;
            }
            let name = g.generate()?;
            tracing::debug!(project = %g.project_identifier(), "generated name");
            if let Some(p) = &config_path {
                prefs.save(p)?;
            }
            println!("{name}");
        }
        Commands::History(a) => {
            let history = VersionHistory::load(&history_path);
            if let Some(out) = a.export {
                history.export_to(&out)?;
                tracing::info!("exported history to {}", out.display());
                return Ok(());
            }
            let records: Vec<&VersionRecord> = match &a.file {
                Some(file) => history.versions_for_file(file).iter().collect(),
                None => history.recent(a.recent),
            };
            if records.is_empty() {
                tracing::info!("no saves recorded yet");
            }
            for r in records {
                println!("{} - {}", r.filename, r.date);
                let notes = r.notes.trim();
                if !notes.is_empty() {
                    println!("    {notes}");
                }
            }
        }
    }

    Ok(())
}
