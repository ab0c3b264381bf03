//! Diary entry collection persisted under a single store key.

use crate::entry::DiaryEntry;
use crate::storage::{ENTRIES_KEY, KeyValueStore, StorageResult, load_json, save_json};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

/// CRUD and queries over the stored diary entries.
///
/// All entries live in one JSON array. Every operation reads the array fresh
/// from the store, so several books over the same store stay consistent.
pub struct DiaryBook<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> Clone for DiaryBook<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> DiaryBook<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// All entries in stored order.
    pub async fn load_all(&self) -> StorageResult<Vec<DiaryEntry>> {
        Ok(load_json(self.store.as_ref(), ENTRIES_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn store_all(&self, entries: &[DiaryEntry]) -> StorageResult<()> {
        save_json(self.store.as_ref(), ENTRIES_KEY, entries).await
    }

    /// All entries, newest date first.
    pub async fn list(&self) -> StorageResult<Vec<DiaryEntry>> {
        let mut entries = self.load_all().await?;
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    pub async fn get(&self, date: NaiveDate) -> StorageResult<Option<DiaryEntry>> {
        Ok(self.load_all().await?.into_iter().find(|e| e.date == date))
    }

    /// Insert or overwrite the entry for its date. Returns `true` on overwrite.
    pub async fn save(&self, entry: DiaryEntry) -> StorageResult<bool> {
        let mut entries = self.load_all().await?;
        let date = entry.date;
        let replaced = match entries.iter_mut().find(|e| e.date == date) {
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                entries.push(entry);
                false
            }
        };
        self.store_all(&entries).await?;
        log::info!("Saved entry {date} (replaced: {replaced})");
        Ok(replaced)
    }

    /// Delete the entry for `date`. Returns `false` if there was none.
    pub async fn delete(&self, date: NaiveDate) -> StorageResult<bool> {
        let mut entries = self.load_all().await?;
        let before = entries.len();
        entries.retain(|e| e.date != date);
        if entries.len() == before {
            return Ok(false);
        }
        self.store_all(&entries).await?;
        log::info!("Deleted entry {date}");
        Ok(true)
    }

    /// Remove every entry.
    pub async fn clear(&self) -> StorageResult<()> {
        self.store.remove(ENTRIES_KEY).await?;
        log::info!("Deleted all entries");
        Ok(())
    }

    /// Entries matching `keyword`, newest first.
    pub async fn search(&self, keyword: &str) -> StorageResult<Vec<DiaryEntry>> {
        let mut entries = self.list().await?;
        entries.retain(|e| e.matches(keyword));
        Ok(entries)
    }

    /// Entries that carry a drawing, newest first.
    pub async fn with_drawings(&self) -> StorageResult<Vec<DiaryEntry>> {
        let mut entries = self.list().await?;
        entries.retain(|e| e.frame.is_some());
        Ok(entries)
    }

    pub async fn dates(&self) -> StorageResult<HashSet<NaiveDate>> {
        Ok(self.load_all().await?.into_iter().map(|e| e.date).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::storage::MemoryStore;
    use pollster::block_on;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(d: &str, content: &str) -> DiaryEntry {
        let mut entry = DiaryEntry::new(date(d));
        entry.content = content.to_string();
        entry
    }

    fn book() -> DiaryBook<MemoryStore> {
        DiaryBook::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_save_upserts_by_date() {
        let book = book();
        assert!(!block_on(book.save(entry("2024-05-01", "first"))).unwrap());
        assert!(block_on(book.save(entry("2024-05-01", "second"))).unwrap());

        let all = block_on(book.load_all()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "second");
    }

    #[test]
    fn test_list_newest_first() {
        let book = book();
        for d in ["2024-05-02", "2024-04-30", "2024-05-10"] {
            block_on(book.save(entry(d, d))).unwrap();
        }
        let dates: Vec<_> = block_on(book.list())
            .unwrap()
            .into_iter()
            .map(|e| e.date_text())
            .collect();
        assert_eq!(dates, vec!["2024-05-10", "2024-05-02", "2024-04-30"]);
    }

    #[test]
    fn test_get_and_delete() {
        let book = book();
        block_on(book.save(entry("2024-05-01", "hello"))).unwrap();
        assert!(block_on(book.get(date("2024-05-01"))).unwrap().is_some());
        assert!(block_on(book.delete(date("2024-05-01"))).unwrap());
        assert!(!block_on(book.delete(date("2024-05-01"))).unwrap());
        assert!(block_on(book.get(date("2024-05-01"))).unwrap().is_none());
    }

    #[test]
    fn test_search_and_drawings() {
        let book = book();
        block_on(book.save(entry("2024-05-01", "Cat nap"))).unwrap();
        let mut drawn = entry("2024-05-02", "Rain walk");
        drawn.frame = Some(Frame::from_data_url("data:image/png;base64,YWJj").unwrap());
        block_on(book.save(drawn)).unwrap();

        let hits = block_on(book.search("CAT")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "Cat nap");

        let drawings = block_on(book.with_drawings()).unwrap();
        assert_eq!(drawings.len(), 1);
        assert_eq!(drawings[0].date, date("2024-05-02"));
    }

    #[test]
    fn test_clear() {
        let book = book();
        block_on(book.save(entry("2024-05-01", "x"))).unwrap();
        block_on(book.clear()).unwrap();
        assert!(block_on(book.load_all()).unwrap().is_empty());
        assert!(block_on(book.dates()).unwrap().is_empty());
    }

    #[test]
    fn test_reads_legacy_json() {
        let store = Arc::new(MemoryStore::new());
        let json = r#"[{"date":"2023-12-24","content":"Snow!","emotion":"happy","weather":"snowy","imageData":null}]"#;
        block_on(store.set(ENTRIES_KEY, json.to_string())).unwrap();
        let book = DiaryBook::new(store);
        let all = block_on(book.load_all()).unwrap();
        assert_eq!(all[0].mood.value(), 5);
    }
}
