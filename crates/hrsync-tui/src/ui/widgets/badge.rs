//! Sync status and action badges.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use hrsync_core::types::{SyncAction, SyncStatus};

pub fn sync_status(status: SyncStatus) -> Span<'static> {
    let (icon, label, color) = match status {
        SyncStatus::Synced => ("✓", "Synced", Color::Green),
        SyncStatus::NeedsSync => ("⚠", "Needs sync", Color::Red),
        SyncStatus::Syncing => ("⟳", "Syncing", Color::Yellow),
        SyncStatus::Error => ("✕", "Error", Color::DarkGray),
    };
    Span::styled(
        format!("{icon} {label}"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

pub fn action(action: SyncAction) -> Span<'static> {
    let (text, color) = match action {
        SyncAction::Insert => ("+ INSERT", Color::Cyan),
        SyncAction::Update => ("⟳ UPDATE", Color::Yellow),
        SyncAction::NoAction => ("  NONE", Color::DarkGray),
    };
    Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_a_distinct_label() {
        let labels: Vec<String> = [
            SyncStatus::Synced,
            SyncStatus::NeedsSync,
            SyncStatus::Syncing,
            SyncStatus::Error,
        ]
        .into_iter()
        .map(|s| sync_status(s).content.into_owned())
        .collect();
        assert_eq!(labels, vec!["✓ Synced", "⚠ Needs sync", "⟳ Syncing", "✕ Error"]);
    }
}
