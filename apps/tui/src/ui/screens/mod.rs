pub mod overview;
pub mod progress;

use crate::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use study_radar_tui::controller::EditPhase;
use throbber_widgets_tui::Throbber;

pub fn render_title(f: &mut Frame<'_>, area: Rect, subtitle: &str) {
    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Study Radar ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(subtitle, Style::default().fg(Color::White)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, area);
}

/// Status line with a spinner while anything is on the wire, plus key hints.
pub fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect, shortcuts: &str) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(rows[0]);
    f.render_widget(block, rows[0]);

    if app.dashboard.is_busy() {
        let label = if app.dashboard.is_loading() {
            "Loading..."
        } else {
            "Saving..."
        };
        let throbber = Throbber::default()
            .label(label)
            .style(Style::default().fg(Color::Cyan));
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, inner, &mut state);
    } else {
        let (text, color) = match app.dashboard.phase() {
            EditPhase::Failed { message } => (format!("Error: {message}"), Color::Red),
            EditPhase::Idle | EditPhase::Submitting => (app.status_message.clone(), Color::Green),
        };
        f.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(color))),
            inner,
        );
    }

    f.render_widget(
        Paragraph::new(Span::styled(shortcuts, Style::default().fg(Color::Gray)))
            .alignment(Alignment::Center),
        rows[1],
    );
}
