//! Render adapter: maps the client state to ratatui widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::client::{Connectivity, Entry, Message, Role};

use super::app::App;

/// Draw one frame.
pub fn render(app: &App, frame: &mut Frame) {
    let [status_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    render_status(app, frame, status_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
}

/// Status indicator plus any transient local notice.
fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let (label, color) = match app.connectivity {
        Connectivity::Connecting => ("Connecting...", Color::Yellow),
        Connectivity::Online => ("Connected", Color::Green),
        Connectivity::Offline => ("Offline", Color::Red),
    };

    let mut spans = vec![
        Span::styled(" Manray Assistant ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("[{label}]"), Style::default().fg(color)),
    ];
    if let Some(notice) = &app.notice {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The conversation list, stuck to the bottom.
fn render_chat(app: &App, frame: &mut Frame, area: Rect) {
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .title(" Conversation ");

    let mut lines: Vec<Line> = Vec::new();
    if app.conversation.is_empty() {
        lines.push(Line::from(Span::styled(
            "Say hello to start the conversation...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for entry in app.conversation.entries() {
        match entry {
            Entry::Message(message) => push_message_lines(&mut lines, message),
            Entry::Pending(_) => {
                lines.push(Line::from(Span::styled(
                    "Manray:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                let dots = ".".repeat(usize::from(app.animation_frame) + 1);
                lines.push(Line::from(Span::styled(
                    format!("Thinking{dots}"),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
                lines.push(Line::default());
            }
        }
    }

    // Keep the latest entries visible; unwrapped line count is a close
    // enough scroll estimate for single-line status/meta lines.
    let inner_height = area.height.saturating_sub(2);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let scroll = total.saturating_sub(inner_height);

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));
    frame.render_widget(chat, area);
}

/// One settled message: role header, content lines, blank separator.
fn push_message_lines(lines: &mut Vec<Line<'_>>, message: &Message) {
    let (label, color) = match message.role {
        Role::User => ("You:", Color::Cyan),
        Role::Assistant => ("Manray:", Color::Yellow),
    };
    let time = message.created_at.format("%H:%M");
    lines.push(Line::from(vec![
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {time}"),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    let content_style = if message.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    for line in message.content.lines() {
        lines.push(Line::from(Span::styled(line.to_string(), content_style)));
    }
    lines.push(Line::default());
}

/// Input box; Enter sends, Ctrl+N resets, Esc quits.
fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" Message (Enter to send, Ctrl+N new session, Esc to quit) ");
    let input = Paragraph::new(app.input.as_str()).block(input_block);
    frame.render_widget(input, area);

    // Cursor after the typed text.
    let x = area.x + 1 + u16::try_from(app.input.chars().count()).unwrap_or(0);
    let x = x.min(area.x + area.width.saturating_sub(2));
    frame.set_cursor_position((x, area.y + 1));
}
