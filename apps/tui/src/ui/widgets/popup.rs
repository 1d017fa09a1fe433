use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Widget, Wrap};
use ratatui::Frame;
use study_radar_tui::dashboard::Notice;
use study_radar_tui::nav::ChooserMenu;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ratatui::layout::Constraint::Percentage(percent_y),
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ratatui::layout::Constraint::Percentage(percent_x),
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

fn popup_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn hint(text: &str) -> TextLine<'_> {
    TextLine::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

/// Blocking error message; stays until dismissed.
pub fn render_notice(f: &mut Frame<'_>, notice: &Notice) {
    let area = centered_rect(60, 30, f.area());
    f.render_widget(ClearWidget, area);

    let text = Text::from(vec![
        TextLine::from(notice.message.as_str()),
        TextLine::from(""),
        hint("Press Enter to dismiss"),
    ]);
    let paragraph = Paragraph::new(text)
        .block(popup_block(&notice.title, Color::Red))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

pub fn render_prompt(f: &mut Frame<'_>, title: &str, buffer: &str) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(ClearWidget, area);

    let text = Text::from(vec![
        TextLine::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::raw(buffer),
            Span::styled("_", Style::default().fg(Color::Green)),
        ]),
        TextLine::from(""),
        hint("Enter to save, Esc to cancel"),
    ]);
    let paragraph = Paragraph::new(text).block(popup_block(title, Color::Green));
    f.render_widget(paragraph, area);
}

pub fn render_confirm(f: &mut Frame<'_>, prompt: &str) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(ClearWidget, area);

    let text = Text::from(vec![
        TextLine::from(prompt),
        TextLine::from(""),
        hint("y to confirm, n to cancel"),
    ]);
    let paragraph = Paragraph::new(text)
        .block(popup_block("Confirm", Color::Yellow))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Module picker for overlapping radar points, drawn next to the click.
pub fn render_chooser(f: &mut Frame<'_>, menu: &ChooserMenu) {
    let area = menu.rect(f.area());
    f.render_widget(ClearWidget, area);

    let items = menu
        .entries()
        .iter()
        .map(|entry| ListItem::new(entry.as_str()))
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(popup_block("Module", Color::Cyan))
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(0, 0, 238))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default().with_selected(Some(menu.highlighted()));
    f.render_stateful_widget(list, area, &mut state);
}
