//! JSON snapshot of item records.
//!
//! The whole sequence is read once per session and rewritten after every
//! mutation. Writes go through a temp file in the same directory and are
//! renamed over the snapshot.

use crate::error::{Result, StoreError};
use crate::models::ItemRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read the snapshot at `path`.
///
/// A missing or blank file is an empty store. Content that is not a JSON
/// array of complete records is a [`StoreError::CorruptStore`].
pub fn load_snapshot(path: &Path) -> Result<Vec<ItemRecord>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No snapshot yet, starting empty");
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .map_err(|e| StoreError::corrupt(path, format!("not a JSON array: {e}")))?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|e| StoreError::corrupt(path, format!("record {index}: {e}")))
        })
        .collect()
}

/// Overwrite the snapshot at `path` with `records`, 4-space indented.
pub fn save_snapshot(path: &Path, records: &[ItemRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        records
            .serialize(&mut serializer)
            .map_err(StoreError::Serialize)?;
        writer.flush().map_err(|e| StoreError::io(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;

    tracing::debug!(path = %path.display(), count = records.len(), "Saved snapshot");
    Ok(())
}

/// Ordered, in-memory copy of the snapshot bound to its file.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<ItemRecord>,
}

impl RecordStore {
    /// Load the store from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let records = load_snapshot(path)?;
        tracing::info!(path = %path.display(), count = records.len(), "Loaded item records");
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// All records in report order.
    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Persist the full sequence.
    pub fn save(&self) -> Result<()> {
        save_snapshot(&self.path, &self.records)
    }

    /// Persist `next` and only then make it the in-memory state, so a
    /// failed write leaves the store exactly as it was.
    fn commit(&mut self, next: Vec<ItemRecord>) -> Result<()> {
        save_snapshot(&self.path, &next)?;
        self.records = next;
        Ok(())
    }

    /// Add a record at the end and persist.
    pub fn append(&mut self, record: ItemRecord) -> Result<()> {
        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)
    }

    /// Case-insensitive substring match on the name, in store order.
    pub fn find_by_name_substring(&self, query: &str) -> Vec<&ItemRecord> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name().to_lowercase().contains(&query))
            .collect()
    }

    /// Claim the earliest unclaimed record whose name equals `name`
    /// ignoring case. Persists and returns true on a match.
    pub fn claim_first_unclaimed(&mut self, name: &str) -> Result<bool> {
        let name = name.to_lowercase();
        let Some(index) = self
            .records
            .iter()
            .position(|r| r.is_unclaimed() && r.name().to_lowercase() == name)
        else {
            return Ok(false);
        };

        let mut next = self.records.clone();
        next[index].mark_claimed();
        self.commit(next)?;
        Ok(true)
    }

    /// Drop every record reported at or before `cutoff` and persist.
    ///
    /// Comparison is at whole-second granularity. Records whose timestamp
    /// cannot be parsed are treated as newest and always kept.
    pub fn prune_older_than(&mut self, cutoff: NaiveDateTime) -> Result<usize> {
        let next: Vec<ItemRecord> = self
            .records
            .iter()
            .filter(|r| match r.reported_instant() {
                Some(reported) => reported > cutoff,
                None => {
                    tracing::warn!(
                        name = r.name(),
                        raw = r.raw_reported_at(),
                        "Unparseable timestamp, keeping record"
                    );
                    true
                }
            })
            .cloned()
            .collect();
        let removed = self.records.len() - next.len();
        self.commit(next)?;
        tracing::info!(removed, remaining = self.records.len(), "Pruned old records");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemKind, ItemStatus, NewItem};
    use chrono::NaiveDate;

    fn record(name: &str, raw: &str) -> ItemRecord {
        ItemRecord::with_raw_timestamp(
            ItemKind::Found,
            NewItem {
                name: name.into(),
                description: String::new(),
                location: "Gym".into(),
            },
            "bob",
            raw,
        )
    }

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::load(dir.path().join("items.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = RecordStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptStore { .. }));
    }

    #[test]
    fn test_record_missing_field_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(
            &path,
            r#"[{"type": "lost", "name": "Umbrella", "status": "unclaimed"}]"#,
        )
        .unwrap();

        match RecordStore::load(&path).unwrap_err() {
            StoreError::CorruptStore { reason, .. } => assert!(reason.starts_with("record 0")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_append_persists_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let mut store = RecordStore::load(&path).unwrap();
        store.append(record("Keychain", "2024-01-05 03:15:00 PM")).unwrap();
        store.append(record("Scarf", "2024-01-04T10:00:00")).unwrap();

        let reloaded = RecordStore::load(&path).unwrap();
        let names: Vec<_> = reloaded.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["Keychain", "Scarf"]);
        assert_eq!(reloaded.records()[1].raw_reported_at(), "2024-01-04T10:00:00");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n        \"type\": \"found\""));
    }

    #[test]
    fn test_find_by_name_substring_keeps_store_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::load(dir.path().join("items.json")).unwrap();
        store.append(record("Keychain", "2024-01-05T10:00:00")).unwrap();
        store.append(record("Umbrella", "2024-01-05T11:00:00")).unwrap();
        store.append(record("car key", "2024-01-05T12:00:00")).unwrap();

        let names: Vec<_> = store
            .find_by_name_substring("key")
            .iter()
            .map(|r| r.name())
            .collect();
        assert_eq!(names, ["Keychain", "car key"]);
        assert!(store.find_by_name_substring("laptop").is_empty());
    }

    #[test]
    fn test_claim_first_unclaimed_only_claims_earliest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let mut store = RecordStore::load(&path).unwrap();
        store.append(record("wallet", "2024-01-05T10:00:00")).unwrap();
        store.append(record("WALLET", "2024-01-05T11:00:00")).unwrap();

        assert!(store.claim_first_unclaimed("Wallet").unwrap());

        let reloaded = RecordStore::load(&path).unwrap();
        assert_eq!(reloaded.records()[0].status(), ItemStatus::Claimed);
        assert_eq!(reloaded.records()[1].status(), ItemStatus::Unclaimed);
    }

    #[test]
    fn test_claim_skips_claimed_and_rejects_partial_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::load(dir.path().join("items.json")).unwrap();
        store.append(record("Wallet", "2024-01-05T10:00:00")).unwrap();

        assert!(!store.claim_first_unclaimed("Wall").unwrap());
        assert!(store.claim_first_unclaimed("wallet").unwrap());
        assert!(!store.claim_first_unclaimed("wallet").unwrap());
    }

    #[test]
    fn test_prune_at_whole_second_granularity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let mut store = RecordStore::load(&path).unwrap();
        store.append(record("old", "2024-01-01T08:00:00")).unwrap();
        store.append(record("boundary", "2024-01-10T08:00:00.900")).unwrap();
        store.append(record("new", "2024-01-20 08:00:00 AM")).unwrap();
        store.append(record("mystery", "sometime last week")).unwrap();

        let removed = store.prune_older_than(at(10, 8, 0, 0)).unwrap();
        assert_eq!(removed, 2);

        let reloaded = RecordStore::load(&path).unwrap();
        let names: Vec<_> = reloaded.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["new", "mystery"]);
    }

    #[test]
    fn test_failed_save_leaves_records_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let mut store = RecordStore::load(&path).unwrap();
        store.append(record("Wallet", "2024-01-01T08:00:00")).unwrap();

        // Point the store at a directory that does not exist
        let mut store = RecordStore {
            path: dir.path().join("missing-dir").join("items.json"),
            records: store.records().to_vec(),
        };
        let before = store.records().to_vec();

        assert!(store.append(record("Scarf", "2024-01-02T08:00:00")).is_err());
        assert!(store.claim_first_unclaimed("wallet").is_err());
        assert!(store.prune_older_than(at(10, 0, 0, 0)).is_err());

        assert_eq!(store.records(), before.as_slice());
        assert_eq!(store.records()[0].status(), ItemStatus::Unclaimed);
    }
}
