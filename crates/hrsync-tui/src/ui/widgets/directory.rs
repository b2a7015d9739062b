use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use hrsync_core::types::{EmployeeDetail, SyncStatus};
use hrsync_state::DirectoryState;

use super::badge;
use crate::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let state = app.directory();

    let detail_open = state.selected_employee.is_some()
        || state.detail_loading
        || state.detail_error.is_some();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if detail_open {
            [Constraint::Percentage(65), Constraint::Percentage(35)]
        } else {
            [Constraint::Percentage(100), Constraint::Length(0)]
        })
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // filter bar
            Constraint::Min(0),    // table
            Constraint::Length(1), // counts
        ])
        .split(columns[0]);

    draw_filters(f, app, &state, rows[0]);
    draw_table(f, app, &state, rows[1]);
    draw_counts(f, &state, rows[2]);

    if detail_open {
        draw_detail(f, &state, columns[1]);
    }
}

fn draw_filters(f: &mut Frame, app: &App, state: &DirectoryState, area: Rect) {
    let searching = app.mode == InputMode::Search;
    let search_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if searching { "▏" } else { "" };

    let department = state
        .filters
        .department_id
        .and_then(|id| state.department_name(id))
        .unwrap_or("All departments");

    let mut spans = vec![
        Span::styled(" Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}{cursor}", app.search_input), search_style),
        Span::raw("   "),
        Span::styled("Department: ", Style::default().fg(Color::DarkGray)),
        Span::raw(department.to_string()),
    ];
    if state.loading {
        spans.push(Span::styled(
            "   loading…",
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(search_style)
        .title(" Filters ");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_table(f: &mut Frame, app: &App, state: &DirectoryState, area: Rect) {
    let block = Block::default()
        .title(" Employees ")
        .borders(Borders::ALL);

    if let Some(err) = &state.error {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  Failed to load employees: {err}"),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                "  Press [r] to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    if state.employees.is_empty() {
        let text = if state.loading {
            "  Loading employees…"
        } else {
            "  No employees match the current filters"
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let header = Row::new(vec![
        "ID",
        "Name",
        "Department",
        "Position",
        "Status",
        "Sync",
        "Hired",
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .employees
        .iter()
        .map(|e| {
            let status_style = if e.status.is_active() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Line::from(format!("#{}", e.employee_id)),
                Line::from(e.full_name.clone()),
                Line::from(e.department_label().to_string()),
                Line::from(e.position_label().to_string()),
                Line::from(Span::styled(e.status.as_str().to_string(), status_style)),
                Line::from(badge::sync_status(e.sync_status)),
                Line::from(
                    e.hire_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into()),
                ),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(22),
        Constraint::Percentage(18),
        Constraint::Percentage(18),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let selected = app.employee_cursor.min(state.employees.len() - 1);
    let mut table_state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_counts(f: &mut Frame, state: &DirectoryState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} employees", state.employees.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        badge::sync_status(SyncStatus::Synced),
        Span::raw(format!(" {}  ", state.count_with_status(SyncStatus::Synced))),
        badge::sync_status(SyncStatus::NeedsSync),
        Span::raw(format!(
            " {}",
            state.count_with_status(SyncStatus::NeedsSync)
        )),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_detail(f: &mut Frame, state: &DirectoryState, area: Rect) {
    let block = Block::default()
        .title(" Employee ")
        .borders(Borders::ALL);

    let mut lines = Vec::new();
    if let Some(err) = &state.detail_error {
        lines.push(Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    match &state.selected_employee {
        Some(detail) => lines.extend(detail_lines(detail)),
        None if state.detail_loading => lines.push(Line::from(Span::styled(
            "  Loading…",
            Style::default().fg(Color::DarkGray),
        ))),
        None => {}
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn detail_lines(d: &EmployeeDetail) -> Vec<Line<'static>> {
    fn opt<T: ToString>(v: &Option<T>) -> String {
        v.as_ref()
            .map(|x| x.to_string())
            .unwrap_or_else(|| "-".into())
    }

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", d.full_name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("  "), badge::sync_status(d.sync_status)]),
        Line::from(""),
    ];
    let fields = [
        ("ID", format!("#{}", d.employee_id)),
        ("Department", opt(&d.department_name)),
        ("Position", opt(&d.position_name)),
        ("Status", d.status.as_str().to_string()),
        ("Hired", opt(&d.hire_date)),
        ("Born", opt(&d.date_of_birth)),
        ("Gender", opt(&d.gender)),
        ("Phone", opt(&d.phone_number)),
        ("Email", opt(&d.email)),
        ("Updated", opt(&d.updated_at)),
    ];
    for (key, value) in fields {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<12}"), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Backspace] close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}
