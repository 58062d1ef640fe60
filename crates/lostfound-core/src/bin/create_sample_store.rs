use chrono::{Duration, Local};
use lostfound_core::{operations, ItemKind, ItemRecord, NewItem, RecordStore, Session};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("lostfound.json"));

    if path.exists() {
        return Err(format!("{} already exists, refusing to overwrite", path.display()).into());
    }

    let mut store = RecordStore::load(&path)?;
    let now = Local::now().naive_local();

    // Written by an older release: 24-hour ISO timestamps
    store.append(ItemRecord::with_raw_timestamp(
        ItemKind::Lost,
        NewItem {
            name: "Wallet".to_string(),
            description: "Brown leather, student card inside".to_string(),
            location: "Library 2F".to_string(),
        },
        "alice",
        (now - Duration::days(45)).format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    ))?;
    store.append(ItemRecord::with_raw_timestamp(
        ItemKind::Found,
        NewItem {
            name: "Keychain".to_string(),
            description: "Three keys on a red ring".to_string(),
            location: "Gym entrance".to_string(),
        },
        "bob",
        (now - Duration::days(10)).format("%Y-%m-%dT%H:%M:%S").to_string(),
    ))?;

    let alice = Session::user("alice");
    operations::report_at(
        &mut store,
        &alice,
        ItemKind::Found,
        NewItem {
            name: "car key".to_string(),
            description: "Single key with fob".to_string(),
            location: "Parking lot B".to_string(),
        },
        now - Duration::days(2),
    )?;
    operations::report(
        &mut store,
        &alice,
        ItemKind::Lost,
        NewItem {
            name: "Umbrella".to_string(),
            description: "Black, folding".to_string(),
            location: "Cafeteria".to_string(),
        },
    )?;

    println!("Created {} with {} records", path.display(), store.len());
    Ok(())
}
