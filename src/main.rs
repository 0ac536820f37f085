//! osu! Slider-Editor (Headless).
//!
//! Kommandozeilen-Front-End für Sliderdateien und Sicherungen. Die
//! interaktive Oberfläche bindet dieselbe Library an.

use clap::{Parser, Subcommand};
use glam::Vec2;
use osu_slider_editor::app::{backup, slider_io};
use osu_slider_editor::core::geometry::polyline_length;
use osu_slider_editor::shared::options::DEFAULT_VIEWPORT;
use osu_slider_editor::{EditorOptions, EditorSession};
use std::path::PathBuf;
use std::process::ExitCode;

/// Bezier-Editor für osu!-Slider, Headless-Modus.
#[derive(Parser, Debug)]
#[command(name = "osu-slider-editor", version, about)]
struct CliArgs {
    /// Optionen-Datei (Standard: neben der Binary)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Anker, Segmente und Länge einer Sliderdatei ausgeben
    Info { file: PathBuf },
    /// Sliderdatei einlesen und normalisiert neu schreiben
    Rewrite { input: PathBuf, output: PathBuf },
    /// Inhalt einer automatischen Sicherung ausgeben
    Backup { file: Option<PathBuf> },
    /// Standard-Optionen als TOML schreiben
    WriteConfig { path: Option<PathBuf> },
}

fn main() -> ExitCode {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = CliArgs::parse();
    log::info!("osu! Slider-Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let config_path = args.config.unwrap_or_else(EditorOptions::config_path);
    let options = EditorOptions::load_from_file(&config_path);
    let viewport = Vec2::from_array(DEFAULT_VIEWPORT);

    match args.command {
        Command::Info { file } => {
            let mut session = EditorSession::new(options, viewport);
            slider_io::import_slider_file(&mut session, &file)?;
            let segments = session.model().segments().len();
            let rect = *session.rect();
            let external: Vec<Vec2> = session
                .samples()
                .map(|s| s.iter().map(|&p| rect.to_external(p)).collect())
                .unwrap_or_default();
            println!("Anker:        {}", session.model().len());
            println!("Split-Anker:  {}", session.model().split_anchors().len());
            println!("Segmente:     {}", segments);
            println!("Länge (osu!): {:.1}", polyline_length(&external));
        }
        Command::Rewrite { input, output } => {
            let mut session = EditorSession::new(options, viewport);
            slider_io::import_slider_file(&mut session, &input)?;
            slider_io::export_slider_file(&session, &output)?;
        }
        Command::Backup { file } => {
            let path = file.unwrap_or_else(|| options.backup_path());
            match backup::read_backup(&path)? {
                Some(b) => {
                    println!("Anker:        {}", b.current.points.len());
                    println!("Split-Anker:  {}", b.current.split_anchors.len());
                    println!("Undo/Redo:    {}/{}", b.undo.len(), b.redo.len());
                }
                None => println!("Keine Sicherung unter {}", path.display()),
            }
        }
        Command::WriteConfig { path } => {
            options.save_to_file(&path.unwrap_or(config_path))?;
        }
    }
    Ok(())
}
