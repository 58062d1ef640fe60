//! Lifecycle operations: report, list, search, claim, summarize and prune.
//!
//! Every operation works on a loaded [`RecordStore`]; mutations are
//! persisted before they return.

use crate::error::Result;
use crate::models::{ItemKind, ItemRecord, ItemView, NewItem, Session};
use crate::store::RecordStore;
use chrono::{Duration, Local, NaiveDateTime};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashSet;
use std::fmt;

/// Outcome of a claim request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    /// No unclaimed item carries that name.
    NotFound,
}

/// Record counts by kind, regardless of status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub lost: usize,
    pub found: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total Lost: {}, Total Found: {}", self.lost, self.found)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Report an item on behalf of the session's user, stamped with the current time.
pub fn report(
    store: &mut RecordStore,
    session: &Session,
    kind: ItemKind,
    item: NewItem,
) -> Result<ItemRecord> {
    report_at(store, session, kind, item, now())
}

/// Report an item stamped with `reported_at`.
pub fn report_at(
    store: &mut RecordStore,
    session: &Session,
    kind: ItemKind,
    item: NewItem,
    reported_at: NaiveDateTime,
) -> Result<ItemRecord> {
    let record = ItemRecord::new(kind, item, session.username.as_str(), reported_at);
    store.append(record.clone())?;
    tracing::info!(
        kind = %kind,
        name = record.name(),
        reporter = record.reporter(),
        "Reported item"
    );
    Ok(record)
}

/// Every record in report order, timestamps normalized.
pub fn list_all(store: &RecordStore) -> Vec<ItemView> {
    store.records().iter().map(ItemView::from).collect()
}

/// Records whose name contains `query`, ignoring case.
pub fn search(store: &RecordStore, query: &str) -> Vec<ItemView> {
    store
        .find_by_name_substring(query)
        .into_iter()
        .map(ItemView::from)
        .collect()
}

/// Claim the earliest unclaimed item named `name`.
pub fn claim(store: &mut RecordStore, name: &str) -> Result<ClaimOutcome> {
    if store.claim_first_unclaimed(name)? {
        tracing::info!(name, "Item claimed");
        Ok(ClaimOutcome::Claimed)
    } else {
        Ok(ClaimOutcome::NotFound)
    }
}

pub fn summary(store: &RecordStore) -> Summary {
    store
        .records()
        .iter()
        .fold(Summary::default(), |mut acc, record| {
            match record.kind() {
                ItemKind::Lost => acc.lost += 1,
                ItemKind::Found => acc.found += 1,
            }
            acc
        })
}

/// Remove records older than `retention_days` days. Returns how many went.
pub fn prune(store: &mut RecordStore, retention_days: u32) -> Result<usize> {
    prune_at(store, retention_days, now())
}

/// [`prune`] measured from `now` instead of the wall clock.
pub fn prune_at(store: &mut RecordStore, retention_days: u32, now: NaiveDateTime) -> Result<usize> {
    let cutoff = now - Duration::days(i64::from(retention_days));
    store.prune_older_than(cutoff)
}

/// Up to `limit` distinct item names that fuzzily resemble `query`,
/// best match first.
pub fn suggest(store: &RecordStore, query: &str, limit: usize) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut seen = HashSet::new();
    let mut scored: Vec<(i64, &str)> = Vec::new();
    for record in store.records() {
        let name = record.name();
        if !seen.insert(name.to_lowercase()) {
            continue;
        }
        if let Some(score) = matcher.fuzzy_match(name, query) {
            scored.push((score, name));
        }
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemStatus;
    use chrono::NaiveDate;

    fn item(name: &str) -> NewItem {
        NewItem {
            name: name.into(),
            description: "desc".into(),
            location: "Hall B".into(),
        }
    }

    fn noon(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn empty_store(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::load(dir.path().join("lostfound.json")).unwrap()
    }

    #[test]
    fn test_report_stamps_session_user_and_unclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        let session = Session::user("alice");

        let record =
            report_at(&mut store, &session, ItemKind::Lost, item("Wallet"), noon(1, 5)).unwrap();

        assert_eq!(record.reporter(), "alice");
        assert_eq!(record.status(), ItemStatus::Unclaimed);
        assert_eq!(record.raw_reported_at(), "2024-01-05 12:00:00 PM");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_report_uses_current_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);

        let record = report(&mut store, &Session::user("bob"), ItemKind::Found, item("Pen")).unwrap();
        let reported = record.reported_instant().unwrap();
        assert!((now() - reported).num_seconds().abs() < 60);
    }

    #[test]
    fn test_list_all_renders_legacy_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        store
            .append(ItemRecord::with_raw_timestamp(
                ItemKind::Found,
                item("Umbrella"),
                "carol",
                "2024-01-05T15:15:00",
            ))
            .unwrap();
        store
            .append(ItemRecord::with_raw_timestamp(
                ItemKind::Lost,
                item("Hat"),
                "carol",
                "not-a-date",
            ))
            .unwrap();

        let views = list_all(&store);
        assert_eq!(views[0].reported_at, "2024-01-05 03:15:00 PM");
        assert_eq!(views[1].reported_at, "not-a-date");
    }

    #[test]
    fn test_search_matches_substrings_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        let session = Session::user("alice");
        for name in ["Keychain", "Laptop", "car key"] {
            report_at(&mut store, &session, ItemKind::Found, item(name), noon(1, 5)).unwrap();
        }

        let names: Vec<_> = search(&store, "KEY").into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["Keychain", "car key"]);
    }

    #[test]
    fn test_claim_reports_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        let session = Session::user("alice");
        report_at(&mut store, &session, ItemKind::Lost, item("Wallet"), noon(1, 5)).unwrap();
        report_at(&mut store, &session, ItemKind::Lost, item("wallet"), noon(1, 6)).unwrap();

        assert_eq!(claim(&mut store, "WALLET").unwrap(), ClaimOutcome::Claimed);
        assert_eq!(store.records()[0].status(), ItemStatus::Claimed);
        assert_eq!(store.records()[1].status(), ItemStatus::Unclaimed);

        assert_eq!(claim(&mut store, "wallet").unwrap(), ClaimOutcome::Claimed);
        assert_eq!(claim(&mut store, "wallet").unwrap(), ClaimOutcome::NotFound);
        assert_eq!(claim(&mut store, "bicycle").unwrap(), ClaimOutcome::NotFound);
    }

    #[test]
    fn test_summary_ignores_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        let session = Session::user("alice");
        for (kind, name) in [
            (ItemKind::Lost, "a"),
            (ItemKind::Lost, "b"),
            (ItemKind::Found, "c"),
            (ItemKind::Found, "d"),
            (ItemKind::Found, "e"),
        ] {
            report_at(&mut store, &session, kind, item(name), noon(1, 5)).unwrap();
        }
        claim(&mut store, "a").unwrap();
        claim(&mut store, "c").unwrap();

        let counts = summary(&store);
        assert_eq!(counts, Summary { lost: 2, found: 3 });
        assert_eq!(counts.to_string(), "Total Lost: 2, Total Found: 3");
    }

    #[test]
    fn test_prune_retention_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        let session = Session::admin("admin");
        let now = noon(3, 1);

        report_at(&mut store, &session, ItemKind::Lost, item("stale"), now - Duration::days(31)).unwrap();
        report_at(&mut store, &session, ItemKind::Lost, item("fresh"), now - Duration::days(29)).unwrap();
        store
            .append(ItemRecord::with_raw_timestamp(
                ItemKind::Found,
                item("unknown"),
                "admin",
                "garbled",
            ))
            .unwrap();

        assert_eq!(prune_at(&mut store, 30, now).unwrap(), 1);
        let names: Vec<_> = store.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["fresh", "unknown"]);
    }

    #[test]
    fn test_suggest_offers_close_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        let session = Session::user("alice");
        for name in ["Umbrella", "umbrella", "Laptop"] {
            report_at(&mut store, &session, ItemKind::Found, item(name), noon(1, 5)).unwrap();
        }

        assert_eq!(suggest(&store, "umbrla", 3), ["Umbrella"]);
        assert!(suggest(&store, "  ", 3).is_empty());
    }

    #[test]
    fn test_suggest_folds_non_ascii_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        let session = Session::user("alice");
        for name in ["Ärmel", "ärmel", "ÄRMEL"] {
            report_at(&mut store, &session, ItemKind::Found, item(name), noon(1, 5)).unwrap();
        }

        assert_eq!(suggest(&store, "rmel", 3), ["Ärmel"]);
    }
}
