//! Headless command-line driver.
//!
//! Every subcommand opens the file store, does one thing, and exits. Drawings
//! are produced by replaying a session script through the editor.

use crate::app::{App, AppError, AppResult, EntryDraft};
use crate::config::AppConfig;
use crate::session::Session;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use pawnote_core::calendar::{CalendarCell, CalendarMonth, WEEKDAY_HEADERS};
use pawnote_core::cat::{CatGallery, CatPart, CatProfile};
use pawnote_core::entry::{Mood, Weather};
use pawnote_core::export::TEXT_BACKUP_FILE_NAME;
use pawnote_core::frame::Frame;
use pawnote_core::lock::PinLock;
use pawnote_core::settings::Theme;
use pawnote_core::stats::{MoodStats, StatsPeriod};
use pawnote_core::storage::FileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Paw Note diary on the command line.
#[derive(Parser, Debug)]
#[command(name = "pawnote", version, about = "Paw Note diary, headless")]
pub struct Cli {
    /// JSON config file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the config).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List entries, newest first.
    List {
        /// Only entries matching this keyword.
        #[arg(long)]
        search: Option<String>,
        /// Only entries with a drawing.
        #[arg(long)]
        drawings: bool,
    },
    /// Print one entry.
    Show { date: NaiveDate },
    /// Delete one entry.
    Delete { date: NaiveDate },
    /// Delete every entry.
    ClearAll,
    /// Replay a drawing session and save it as the entry for a date.
    Draw {
        date: NaiveDate,
        /// Session script (JSON).
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
        /// Entry text. Defaults to the stored text when the entry exists.
        #[arg(long)]
        content: Option<String>,
        /// Mood rating, 1 to 5.
        #[arg(long)]
        mood: Option<f64>,
        /// sunny, cloudy, rainy, snowy or stormy.
        #[arg(long)]
        weather: Option<String>,
        /// Start from a blank page instead of the stored drawing.
        #[arg(long)]
        fresh: bool,
    },
    /// Write a text backup of all entries.
    ExportTxt {
        #[arg(default_value = TEXT_BACKUP_FILE_NAME)]
        out: PathBuf,
    },
    /// Write an entry's drawing as a PNG.
    ExportPng {
        date: NaiveDate,
        /// Output file; defaults to `pawnote_<date>.png`.
        out: Option<PathBuf>,
    },
    /// Print a month calendar marking days with entries.
    Calendar { year: Option<i32>, month: Option<u32> },
    /// Mood statistics for the last week or month.
    Stats {
        #[arg(default_value = "week")]
        period: StatsPeriod,
    },
    /// Manage the diary PIN.
    Pin {
        #[command(subcommand)]
        action: PinAction,
    },
    /// Show, set or toggle the theme.
    Theme {
        /// light, dark or toggle.
        value: Option<String>,
    },
    /// Cat avatar profile and gallery.
    Cat {
        #[command(subcommand)]
        action: CatAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PinAction {
    Set { pin: String, confirm: String },
    Unlock { pin: String },
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum CatAction {
    /// Print the current profile.
    Show,
    /// Choose an image for a part.
    Set { part: CatPart, value: String },
    /// Render the profile and add it to the gallery.
    Save {
        /// Also write the render to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List gallery renders, newest first.
    Gallery,
    /// Remove a gallery render.
    Delete { id: String },
}

/// Execute `cli`.
pub async fn run(cli: Cli) -> AppResult<()> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    let store = Arc::new(match &config.data_dir {
        Some(dir) => FileStore::new(dir.clone())?,
        None => FileStore::default_location()?,
    });
    log::debug!("Using data directory {}", store.base_path().display());

    let today = Local::now().date_naive();
    match cli.command {
        Command::List { search, drawings } => {
            let app = App::new(config, store)?;
            let entries = match (search, drawings) {
                (Some(keyword), _) => app.book().search(&keyword).await?,
                (None, true) => app.book().with_drawings().await?,
                (None, false) => app.book().list().await?,
            };
            if entries.is_empty() {
                println!("No entries.");
            }
            for entry in entries {
                let drawing = if entry.frame.is_some() { " [drawing]" } else { "" };
                println!(
                    "{}  {}  {}  {}{}",
                    entry.date_text(),
                    entry.mood.paws(),
                    entry.weather.label(),
                    entry.preview(),
                    drawing
                );
            }
        }
        Command::Show { date } => {
            let app = App::new(config, store)?;
            let Some(entry) = app.book().get(date).await? else {
                println!("No entry for {date}.");
                return Ok(());
            };
            println!("Date: {}", entry.date_text());
            println!("Mood: {}", entry.mood.label());
            println!("Weather: {}", entry.weather.label());
            println!();
            println!("{}", entry.content);
            if let Some(frame) = &entry.frame {
                let (w, h) = frame.dimensions()?;
                println!();
                println!("Drawing: {w}x{h}");
            }
        }
        Command::Delete { date } => {
            let app = App::new(config, store)?;
            if app.book().delete(date).await? {
                println!("Deleted {date}.");
            } else {
                println!("No entry for {date}.");
            }
        }
        Command::ClearAll => {
            let app = App::new(config, store)?;
            app.book().clear().await?;
            println!("All entries deleted.");
        }
        Command::Draw {
            date,
            script,
            content,
            mood,
            weather,
            fresh,
        } => {
            let session = Session::load(&script)?;
            let mut app = App::new(config, store)?;
            let existing = if fresh {
                None
            } else {
                app.open_entry(date).await?
            };

            let base_dir = script.parent().unwrap_or(Path::new("."));
            let notices = session.replay(app.editor_mut(), base_dir).await?;
            for notice in &notices {
                println!("note: {notice}");
            }

            let mut draft = existing
                .map(|entry| EntryDraft {
                    content: entry.content,
                    mood: entry.mood,
                    weather: entry.weather,
                })
                .unwrap_or_default();
            if let Some(content) = content {
                draft.content = content;
            }
            if let Some(mood) = mood {
                draft.mood = Mood::from_number(mood);
            }
            if let Some(weather) = weather {
                draft.weather = Weather::parse(&weather);
            }

            let replaced = app.save_entry(date, draft).await?;
            println!("{} {date}.", if replaced { "Updated" } else { "Saved" });
        }
        Command::ExportTxt { out } => {
            let app = App::new(config, store)?;
            let text = app.export_txt().await?;
            write_file(&out, text.as_bytes())?;
            println!("Wrote {}", out.display());
        }
        Command::ExportPng { date, out } => {
            let app = App::new(config, store)?;
            let (name, bytes) = app.export_entry_drawing(date).await?;
            let out = out.unwrap_or_else(|| PathBuf::from(name));
            write_file(&out, &bytes)?;
            println!("Wrote {}", out.display());
        }
        Command::Calendar { year, month } => {
            let app = App::new(config, store)?;
            let calendar = match (year, month) {
                (Some(year), Some(month)) => CalendarMonth::new(year, month)
                    .ok_or_else(|| AppError::Io(format!("Invalid month {year}-{month}")))?,
                _ => CalendarMonth::containing(today),
            };
            let dates = app.book().dates().await?;
            print_calendar(&calendar, &calendar.grid(&dates, today));
        }
        Command::Stats { period } => {
            let app = App::new(config, store)?;
            let entries = app.book().load_all().await?;
            let stats = MoodStats::compute(&entries, period, today);
            println!("{}", stats.summary());
            for rating in (Mood::MIN..=Mood::MAX).rev() {
                let mood = Mood::from_number(f64::from(rating));
                println!("{:<12} {}", mood.paws(), stats.count(rating));
            }
        }
        Command::Pin { action } => {
            let lock = PinLock::new(store);
            match action {
                PinAction::Set { pin, confirm } => {
                    lock.set(&pin, &confirm).await?;
                    println!("PIN set.");
                }
                PinAction::Unlock { pin } => {
                    lock.unlock(&pin).await?;
                    println!("Unlocked.");
                }
                PinAction::Reset => {
                    lock.reset().await?;
                    println!("PIN removed.");
                }
            }
        }
        Command::Theme { value } => {
            let current = Theme::load(store.as_ref()).await?;
            let theme = match value.as_deref() {
                None => current,
                Some("toggle") => current.toggled(),
                Some(other) => other.parse::<Theme>().map_err(AppError::Io)?,
            };
            if theme != current {
                theme.save(store.as_ref()).await?;
            }
            println!("Theme: {theme}");
        }
        Command::Cat { action } => run_cat(action, &config, &store).await?,
    }
    Ok(())
}

async fn run_cat(action: CatAction, config: &AppConfig, store: &Arc<FileStore>) -> AppResult<()> {
    let store = store.as_ref();
    match action {
        CatAction::Show => {
            let profile = CatProfile::load(store).await?;
            for part in CatPart::DRAW_ORDER {
                println!("{:<10} {}", part.as_str(), profile.get(part));
            }
        }
        CatAction::Set { part, value } => {
            let mut profile = CatProfile::load(store).await?;
            if !profile.set(part, &value) {
                return Err(AppError::Io(format!(
                    "{value} is not a {part} option (choose from: {})",
                    part.options().join(", ")
                )));
            }
            profile.save(store).await?;
            println!("{part} = {value}");
        }
        CatAction::Save { out } => {
            let profile = CatProfile::load(store).await?;
            let image = pawnote_render::cat::render_cat(
                &profile,
                &config.cat_asset_dir,
                config.cat_size,
                config.cat_size,
            )?;
            let frame = Frame::encode(&image)?;
            if let Some(out) = out {
                write_file(&out, &frame.image_bytes()?)?;
            }
            let mut gallery = CatGallery::load(store).await?;
            let id = gallery.add(frame);
            gallery.save(store).await?;
            println!("Saved cat {id}");
        }
        CatAction::Gallery => {
            let gallery = CatGallery::load(store).await?;
            if gallery.is_empty() {
                println!("The gallery is empty.");
            }
            for item in gallery.newest_first() {
                let (w, h) = item.frame.dimensions()?;
                println!("{}  {w}x{h}", item.id);
            }
        }
        CatAction::Delete { id } => {
            let mut gallery = CatGallery::load(store).await?;
            if gallery.remove(&id) {
                gallery.save(store).await?;
                println!("Deleted cat {id}");
            } else {
                println!("No cat {id}");
            }
        }
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> AppResult<()> {
    std::fs::write(path, bytes)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn print_calendar(calendar: &CalendarMonth, cells: &[CalendarCell]) {
    println!("{}", calendar.title());
    println!("{}", WEEKDAY_HEADERS.map(|h| format!("{h:>4}")).concat());
    for week in cells.chunks(7) {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                CalendarCell::Blank => "    ".to_string(),
                CalendarCell::Day {
                    date,
                    has_entry,
                    is_today,
                } => {
                    let mark = match (*has_entry, *is_today) {
                        (_, true) => '<',
                        (true, false) => '*',
                        (false, false) => ' ',
                    };
                    format!("{:>3}{mark}", date.day())
                }
            })
            .collect();
        println!("{}", line.trim_end());
    }
}
