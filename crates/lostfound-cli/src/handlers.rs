//! Menu option handling.

use crate::app::{App, Flow};
use crate::ui;
use anyhow::{Context, Result};
use lostfound_core::operations::{self, ClaimOutcome};
use lostfound_core::{export, ItemKind, NewItem, RecordStore, Session};
use std::io::{BufRead, Write};

const SUGGESTION_LIMIT: usize = 3;

/// Dispatch a user menu selection.
pub fn handle_user_option<R: BufRead, W: Write>(
    app: &mut App<R, W>,
    session: &Session,
    items: &mut RecordStore,
    option: &str,
) -> Result<Flow> {
    match option {
        "1" => report_item(app, session, items, ItemKind::Lost),
        "2" => report_item(app, session, items, ItemKind::Found),
        "3" => show_all(app, items),
        "4" => search_items(app, items),
        "5" => claim_item(app, items),
        "6" => Ok(Flow::Logout),
        _ => {
            app.say("Invalid option.")?;
            Ok(Flow::Continue)
        }
    }
}

/// Dispatch an admin menu selection.
pub fn handle_admin_option<R: BufRead, W: Write>(
    app: &mut App<R, W>,
    session: &Session,
    items: &mut RecordStore,
    option: &str,
) -> Result<Flow> {
    match option {
        "1" => show_all(app, items),
        "2" => search_items(app, items),
        "3" => prune_records(app, session, items),
        "4" => {
            ui::render_summary(&mut app.output, &operations::summary(items))?;
            Ok(Flow::Continue)
        }
        "5" => export_items(app, items),
        "6" => Ok(Flow::Logout),
        _ => {
            app.say("Invalid option.")?;
            Ok(Flow::Continue)
        }
    }
}

fn report_item<R: BufRead, W: Write>(
    app: &mut App<R, W>,
    session: &Session,
    items: &mut RecordStore,
    kind: ItemKind,
) -> Result<Flow> {
    let Some(name) = app.prompt("Item name: ")? else {
        return Ok(Flow::Quit);
    };
    let Some(description) = app.prompt("Description: ")? else {
        return Ok(Flow::Quit);
    };
    let Some(location) = app.prompt("Location: ")? else {
        return Ok(Flow::Quit);
    };

    let name = name.trim().to_string();
    if name.is_empty() {
        app.say("Item name cannot be empty.")?;
        return Ok(Flow::Continue);
    }

    let item = NewItem {
        name,
        description: description.trim().to_string(),
        location: location.trim().to_string(),
    };
    operations::report(items, session, kind, item).context("Failed to save report")?;

    match kind {
        ItemKind::Lost => app.say("Lost item reported.")?,
        ItemKind::Found => app.say("Found item reported.")?,
    }
    Ok(Flow::Continue)
}

fn show_all<R: BufRead, W: Write>(app: &mut App<R, W>, items: &RecordStore) -> Result<Flow> {
    ui::render_items(&mut app.output, &operations::list_all(items))?;
    Ok(Flow::Continue)
}

fn search_items<R: BufRead, W: Write>(app: &mut App<R, W>, items: &RecordStore) -> Result<Flow> {
    let Some(query) = app.prompt("Enter item name to search: ")? else {
        return Ok(Flow::Quit);
    };

    let results = operations::search(items, query.trim());
    ui::render_items(&mut app.output, &results)?;
    if results.is_empty() {
        let hints = operations::suggest(items, &query, SUGGESTION_LIMIT);
        ui::render_suggestions(&mut app.output, &hints)?;
    }
    Ok(Flow::Continue)
}

fn claim_item<R: BufRead, W: Write>(app: &mut App<R, W>, items: &mut RecordStore) -> Result<Flow> {
    let Some(name) = app.prompt("Enter item name to claim: ")? else {
        return Ok(Flow::Quit);
    };

    match operations::claim(items, name.trim()).context("Failed to save claim")? {
        ClaimOutcome::Claimed => app.say("Item marked as claimed.")?,
        ClaimOutcome::NotFound => {
            app.say("Item not found or already claimed.")?;
            let hints = operations::suggest(items, &name, SUGGESTION_LIMIT);
            ui::render_suggestions(&mut app.output, &hints)?;
        }
    }
    Ok(Flow::Continue)
}

fn prune_records<R: BufRead, W: Write>(
    app: &mut App<R, W>,
    session: &Session,
    items: &mut RecordStore,
) -> Result<Flow> {
    let days = app.config.retention_days;
    let removed = operations::prune(items, days).context("Failed to save pruned records")?;
    tracing::info!(
        user = %session.username,
        role = ?session.role,
        removed,
        days,
        "Pruned records"
    );
    app.say(format!("Deleted {removed} record(s) older than {days} days."))?;
    Ok(Flow::Continue)
}

fn export_items<R: BufRead, W: Write>(app: &mut App<R, W>, items: &RecordStore) -> Result<Flow> {
    let path = app.config.export_path.clone();
    let count = export::export_records(items.records(), &path)
        .with_context(|| format!("Failed to export to {}", path.display()))?;
    app.say(format!("Exported {count} record(s) to {}", path.display()))?;
    Ok(Flow::Continue)
}
