//! Text rendering for the interactive menus.

use lostfound_core::{ItemView, Summary};
use std::io::{self, Write};

pub const USER_MENU: &[&str] = &[
    "Report Lost Item",
    "Report Found Item",
    "View All Items",
    "Search Item by Name",
    "Mark as Claimed",
    "Logout",
];

pub const ADMIN_MENU: &[&str] = &[
    "View All Reports",
    "Search Item",
    "Delete Old Records",
    "Summary (Total Lost/Found)",
    "Export to Text File",
    "Logout",
];

/// Print a numbered menu under a bracketed title.
pub fn render_menu(out: &mut impl Write, title: &str, options: &[&str]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "[{title}]")?;
    for (i, option) in options.iter().enumerate() {
        writeln!(out, "{}. {option}", i + 1)?;
    }
    Ok(())
}

pub fn render_items(out: &mut impl Write, items: &[ItemView]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No items to show.");
    }
    for item in items {
        writeln!(out, "{item}")?;
    }
    Ok(())
}

/// "Did you mean" hint, printed only when there is something to suggest.
pub fn render_suggestions(out: &mut impl Write, names: &[String]) -> io::Result<()> {
    if names.is_empty() {
        return Ok(());
    }
    writeln!(out, "Did you mean: {}?", names.join(", "))
}

pub fn render_summary(out: &mut impl Write, summary: &Summary) -> io::Result<()> {
    writeln!(out, "{summary}")
}
