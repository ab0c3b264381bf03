//! Plain-text backup and export file naming.

use crate::entry::DiaryEntry;
use crate::notice::Notice;

/// File name of the text backup.
pub const TEXT_BACKUP_FILE_NAME: &str = "paw_note_backup.txt";

const SEPARATOR: &str = "------------------------";

/// Render all entries as a text backup, oldest first.
pub fn text_backup(entries: &[DiaryEntry]) -> Result<String, Notice> {
    if entries.is_empty() {
        return Err(Notice::NoEntriesToExport);
    }
    let mut sorted: Vec<&DiaryEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut text = String::from("Paw Note backup\n\n");
    for entry in sorted {
        text.push_str(&format!("Date: {}\n", entry.date_text()));
        text.push_str(&format!("Mood: {}\n", entry.mood.label()));
        text.push_str(&format!("Weather: {}\n", entry.weather.label()));
        text.push_str(&format!("Content:\n{}\n", entry.content));
        let drawing = if entry.frame.is_some() { "[image attached]" } else { "none" };
        text.push_str(&format!("Drawing: {drawing}\n"));
        text.push_str(SEPARATOR);
        text.push_str("\n\n");
    }
    Ok(text)
}

/// `pawnote_<date>.png`, with `no-date` when the date is unknown.
pub fn png_file_name(date: Option<&str>) -> String {
    let date = date.map(str::trim).filter(|d| !d.is_empty()).unwrap_or("no-date");
    format!("pawnote_{date}.png")
}
