use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Configuration ")
        .borders(Borders::ALL);

    let c = &app.config;
    let mut lines = Vec::new();

    section_header(&mut lines, "API");
    kv(&mut lines, "Backend", &app.backend);
    kv(&mut lines, "Base URL", &c.api.base_url);
    kv(&mut lines, "Timeout", &format!("{}s", c.api.timeout_secs));

    section_header(&mut lines, "UI");
    kv(
        &mut lines,
        "Search Debounce",
        &format!("{} ms", c.ui.search_debounce_ms),
    );
    kv(
        &mut lines,
        "Re-check Delay",
        &format!("{} ms", c.ui.recheck_delay_ms),
    );
    kv(&mut lines, "Tick", &format!("{} ms", c.ui.tick_ms));

    section_header(&mut lines, "Log");
    kv(&mut lines, "Level", &c.log.level);
    kv(&mut lines, "Format", &c.log.format);
    kv(
        &mut lines,
        "File",
        &c.log
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "disabled".into()),
    );

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn section_header(lines: &mut Vec<Line<'static>>, name: &str) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  [{name}]"),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
}

fn kv(lines: &mut Vec<Line<'static>>, key: &str, value: &str) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("    {key:<18}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value.to_string()),
    ]));
}
