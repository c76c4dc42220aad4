use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_title(f, app, rows[0]);

    if app.widget.is_open() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);
        render_outline(f, app, columns[0]);
        render_chat(f, app, columns[1]);
    } else {
        render_outline(f, app, rows[1]);
    }

    render_status(f, app, rows[2]);
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!("📖 {}", app.book.title),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if !app.book.tagline.is_empty() {
        spans.push(Span::styled(
            format!(" · {}", app.book.tagline),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let title = Line::from(spans);
    f.render_widget(Paragraph::new(title), area);
}

fn render_outline(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .nav
        .render_lines()
        .into_iter()
        .map(|line| {
            if line.starts_with(' ') {
                Line::from(line)
            } else {
                Line::from(Span::styled(
                    line,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            }
        })
        .collect();

    let outline = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Modules"))
        .scroll((app.outline_offset, 0));
    f.render_widget(outline, area);
}

fn render_chat(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let transcript_block = Block::default()
        .borders(Borders::ALL)
        .title("🤖 Ask AI");
    let inner = transcript_block.inner(chunks[0]);
    app.update_scroll_position(inner.height, inner.width);

    let transcript = Paragraph::new(app.build_display_lines())
        .block(transcript_block)
        .wrap(Wrap { trim: true })
        .scroll((app.scroll_offset, 0));
    f.render_widget(transcript, chunks[0]);

    let mode = app.widget.mode();
    let mut input_title = format!("Ask a question… [{}] Tab: switch mode", mode.label());
    if app.widget.is_waiting() {
        input_title.push_str(&format!(" {}", pulse_symbol(app)));
    }

    // Keep the tail of long input visible
    let inner_width = chunks[1].width.saturating_sub(2) as usize;
    let input = app.widget.input();
    let mut visible = input;
    while visible.width() >= inner_width && !visible.is_empty() {
        let mut chars = visible.chars();
        chars.next();
        visible = chars.as_str();
    }

    let input_widget = Paragraph::new(visible)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input_widget, chunks[1]);

    let cursor_x = chunks[1].x + 1 + visible.width() as u16;
    f.set_cursor_position((cursor_x, chunks[1].y + 1));
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let hint = if app.widget.is_open() {
        "Ctrl+O close chat • /help • Ctrl+C quit"
    } else {
        "🤖 Ask AI: Ctrl+O • ↑/↓ scroll • Ctrl+C quit"
    };
    let text = match &app.status {
        Some(status) => format!("{status}  |  Logging: {}", app.get_logging_status()),
        None => format!("{hint}  |  Logging: {}", app.get_logging_status()),
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn pulse_symbol(app: &App) -> &'static str {
    let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
    let pulse_phase = (elapsed * 2.0) % 2.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    if pulse_intensity < 0.33 {
        "○"
    } else if pulse_intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}
