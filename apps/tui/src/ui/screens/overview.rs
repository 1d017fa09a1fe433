use crate::app::App;
use crate::ui::screens::{render_status_section, render_title};
use crate::ui::widgets::radar::render_study_radar;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

const SHORTCUTS: &str =
    "<-/-> select | Enter open | click point | p all subjects | n new | r rename | d delete | q quit";

pub fn render_overview(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    let last_reset = app
        .dashboard
        .cache()
        .snapshot()
        .and_then(|snapshot| snapshot.last_reset())
        .map_or_else(String::new, |day| format!("(reset {day})"));
    render_title(f, layout[0], &format!("overview {last_reset}"));

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(layout[1]);
    render_radar_panel(app, f, body[0]);
    render_module_list(app, f, body[1]);

    render_status_section(app, f, layout[2], SHORTCUTS);
}

fn render_radar_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Historical points")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.dashboard.session().radar() {
        Some(spec) => {
            let canvas = render_study_radar(f, inner, spec, app.dashboard.selection());
            app.radar_area.set(canvas);
        }
        None => {
            let paragraph = Paragraph::new("Nothing loaded yet")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
            f.render_widget(paragraph, inner);
        }
    }
}

fn render_module_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Modules")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(spec) = app.dashboard.session().radar() else {
        f.render_widget(block, area);
        return;
    };
    let selected = app.dashboard.selection().axis();

    let items = spec
        .real_axes()
        .map(|(index, axis)| {
            let points = axis.value.points().unwrap_or_default();
            let style = if selected == Some(index) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(TextLine::from(vec![
                Span::styled(axis.label.clone(), style),
                Span::styled(format!("  {points}"), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect::<Vec<_>>();

    f.render_widget(List::new(items).block(block), area);
}
