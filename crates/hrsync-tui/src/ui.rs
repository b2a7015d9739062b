use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

use crate::app::{App, InputMode, Tab};

mod widgets;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header + tabs
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    match app.tab {
        Tab::Directory => widgets::directory::draw(f, app, chunks[1]),
        Tab::Sync => widgets::sync_center::draw(f, app, chunks[1]),
        Tab::Config => widgets::config::draw(f, app, chunks[1]),
    }

    draw_footer(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|t| {
            let style = if *t == app.tab {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(t.title(), style))
        })
        .collect();

    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);

    let busy = app.directory().loading || app.workflow().phase.is_busy();
    let activity = if busy {
        Span::styled(" BUSY ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" IDLE ", Style::default().fg(Color::Green))
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM).title(vec![
            Span::styled(
                " hrsync ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("[{}]", app.backend),
                Style::default().fg(Color::DarkGray),
            ),
            activity,
        ]))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan));

    f.render_widget(tabs, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    if let Some(notice) = &app.notice {
        let line = Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::Yellow),
        ));
        f.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut hints = vec![
        Span::styled("[q]", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit  "),
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Switch  "),
    ];
    let extra: &[(&str, &str)] = match (app.tab, app.mode) {
        (_, InputMode::Search) => &[("[Enter/Esc]", " Done")],
        (Tab::Directory, _) => &[
            ("[/]", " Search  "),
            ("[d]", " Department  "),
            ("[c]", " Clear  "),
            ("[r]", " Reload  "),
            ("[Enter]", " Details"),
        ],
        (Tab::Sync, _) => &[
            ("[r]", " Check  "),
            ("[Space]", " Select  "),
            ("[a]", " All  "),
            ("[c]", " Clear  "),
            ("[x]", " Sync  "),
            ("[d]", " Dismiss"),
        ],
        (Tab::Config, _) => &[],
    };
    for (key, label) in extra {
        hints.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        hints.push(Span::raw(*label));
    }
    f.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use hrsync_core::config::HrSyncConfig;
    use hrsync_gateway::MemoryGateway;
    use hrsync_state::{EmployeeDirectory, SyncWorkflow};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc;

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn demo_app() -> App {
        let gw = Arc::new(MemoryGateway::demo());
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(
            HrSyncConfig::default(),
            "demo".into(),
            Arc::new(EmployeeDirectory::new(gw.clone())),
            Arc::new(SyncWorkflow::new(gw)),
            tx,
        )
    }

    #[tokio::test]
    async fn directory_tab_lists_employees() {
        let app = demo_app();
        app.start();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let screen = render(&app, 120, 30);
        assert!(screen.contains("hrsync"));
        assert!(screen.contains("Nguyen Van An"));
        assert!(screen.contains("Needs sync"));
    }

    #[tokio::test]
    async fn sync_tab_shows_summary_and_needs() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut app = demo_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let screen = render(&app, 120, 40);
        assert!(screen.contains("Le Van Cuong"));
        assert!(screen.contains("INSERT"));
        assert!(screen.contains("0 selected"));
        assert!(screen.contains("[c] Clear"));
    }

    #[test]
    fn config_tab_renders_without_runtime_data() {
        let mut app = demo_app();
        app.tab = Tab::Config;
        let screen = render(&app, 100, 30);
        assert!(screen.contains("http://localhost:8000/api"));
    }
}
