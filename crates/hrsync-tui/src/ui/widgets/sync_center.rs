use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use hrsync_core::types::{SyncResult, SyncStatusSummary};
use hrsync_state::{SyncCenterState, SyncPhase, WorkflowState};

use super::badge;
use crate::app::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let workflow = app.workflow();
    let center = app.center();

    let result_height = match &center.displayed_result {
        Some(r) => 4 + r.details.len().min(6) as u16,
        None => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),             // summary
            Constraint::Length(3),             // action bar
            Constraint::Length(result_height), // last result
            Constraint::Min(0),                // need list
        ])
        .split(area);

    draw_summary(f, &workflow, chunks[0]);
    draw_actions(f, &workflow, &center, chunks[1]);
    if let Some(result) = &center.displayed_result {
        draw_result(f, result, chunks[2]);
    }
    draw_needs(f, app, &workflow, &center, chunks[3]);
}

fn draw_summary(f: &mut Frame, workflow: &WorkflowState, area: Rect) {
    let block = Block::default()
        .title(" Sync Status ")
        .borders(Borders::ALL);

    let Some(summary) = &workflow.summary else {
        let text = if workflow.phase == SyncPhase::Checking {
            "  Checking sync status…"
        } else {
            "  Press [r] to check sync status"
        };
        let line = Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)));
        f.render_widget(Paragraph::new(line).block(block), area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(totals_line(summary)), rows[0]);

    let need = Gauge::default()
        .gauge_style(Style::default().fg(Color::Red))
        .ratio(summary.need_ratio())
        .label(format!("Needs sync {}", summary.need_sync));
    f.render_widget(need, rows[1]);

    let synced = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(summary.synced_ratio())
        .label(format!("Synced {}", summary.already_synced));
    f.render_widget(synced, rows[2]);
}

fn totals_line(summary: &SyncStatusSummary) -> Line<'static> {
    let mut spans = vec![
        Span::styled("Total employees: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            summary.total_employees.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(at) = summary.checked_at {
        spans.push(Span::styled(
            format!("   checked {}", at.format("%Y-%m-%d %H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !summary.is_consistent() {
        spans.push(Span::styled(
            "   counts do not add up",
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

fn draw_actions(f: &mut Frame, workflow: &WorkflowState, center: &SyncCenterState, area: Rect) {
    let busy = workflow.syncing || center.reconciling;
    let enabled = !center.selection.is_empty() && !busy;

    let execute = if workflow.phase == SyncPhase::Executing {
        Span::styled(" ⟳ Syncing… ", Style::default().fg(Color::Yellow))
    } else if center.reconciling {
        Span::styled(" ⟳ Re-checking… ", Style::default().fg(Color::Yellow))
    } else if enabled {
        Span::styled(
            format!(" [x] Sync {} selected ", center.selection.len()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" [x] Sync ", Style::default().fg(Color::DarkGray))
    };

    let mut spans = vec![
        Span::raw(format!(" {} selected   ", center.selection.len())),
        execute,
    ];
    if let Some(err) = &workflow.error {
        spans.push(Span::styled(
            format!("   {err}"),
            Style::default().fg(Color::Red),
        ));
    }

    let block = Block::default().borders(Borders::ALL);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_result(f: &mut Frame, result: &SyncResult, area: Rect) {
    let (title, color) = if result.has_failures() || !result.success {
        (" Sync Result (with failures) ", Color::Yellow)
    } else {
        (" Sync Result ", Color::Green)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", result.message),
            Style::default().fg(color),
        )),
        Line::from(vec![
            Span::styled("  Synced: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                result.synced_count.to_string(),
                Style::default().fg(Color::Green),
            ),
            Span::styled("   Failed: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                result.failed_count.to_string(),
                Style::default().fg(if result.failed_count > 0 {
                    Color::Red
                } else {
                    Color::DarkGray
                }),
            ),
        ]),
    ];
    for d in result.details.iter().take(6) {
        let id = d
            .employee_id
            .map(|id| format!("#{id}"))
            .unwrap_or_else(|| "-".into());
        let status_style = if d.status.eq_ignore_ascii_case("success") {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        let mut spans = vec![
            Span::raw(format!("  {id:<6} ")),
            Span::styled(format!("{:<8}", d.status), status_style),
        ];
        if let Some(action) = d.action {
            spans.push(badge::action(action));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            d.message.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_needs(
    f: &mut Frame,
    app: &App,
    workflow: &WorkflowState,
    center: &SyncCenterState,
    area: Rect,
) {
    let all = center.selection.is_all_selected(&workflow.sync_needs);
    let block = Block::default()
        .title(format!(
            " Pending Changes ({}) {} ",
            workflow.sync_needs.len(),
            if all { "[x] all" } else { "[ ] all" }
        ))
        .borders(Borders::ALL);

    if workflow.sync_needs.is_empty() {
        let text = match workflow.phase {
            SyncPhase::Checking => Span::styled(
                "  Checking…",
                Style::default().fg(Color::DarkGray),
            ),
            SyncPhase::AllSynced => Span::styled(
                "  ✓ All records are in sync",
                Style::default().fg(Color::Green),
            ),
            SyncPhase::CheckFailed => Span::styled(
                "  Check failed. Press [r] to retry",
                Style::default().fg(Color::Red),
            ),
            _ => Span::styled(
                "  No pending changes loaded",
                Style::default().fg(Color::DarkGray),
            ),
        };
        let lines = vec![Line::from(""), Line::from(text)];
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let header = Row::new(vec!["", "ID", "Name", "Action", "Reason"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = workflow
        .sync_needs
        .iter()
        .map(|n| {
            let mark = if center.selection.contains(n.employee_id) {
                "[x]"
            } else {
                "[ ]"
            };
            Row::new(vec![
                Line::from(mark),
                Line::from(format!("#{}", n.employee_id)),
                Line::from(n.full_name.clone()),
                Line::from(badge::action(n.action)),
                Line::from(Span::styled(
                    n.reason.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Length(10),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let selected = app.need_cursor.min(workflow.sync_needs.len() - 1);
    let mut table_state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut table_state);
}
